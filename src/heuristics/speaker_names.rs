use std::sync::LazyLock;

use regex::Regex;

/// Longest name kept after cleaning, in words
pub const MAX_NAME_WORDS: usize = 5;

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

/// Words that end a name when scanning backwards from the colon
/// (ministry and office descriptions)
const ROLE_WORDS: &[&str] = &[
    "במשרד",
    "בממשלה",
    "ביטחון",
    "בראש",
    "לביטחון",
    "למשטרה",
    "לחקלאות",
    "פנים",
    "לתעשייה",
    "והמסחר",
    "לסביבה",
    "לאוצר",
    "לתחבורה",
    "לתקשורת",
    "מודיעין",
    "בדרכים",
    "לתשתיות",
    "ללאומיות",
    "לעלייה",
    "ולקליטה",
    "לענייני",
    "כלכלה",
    "וחברה",
    "למנכ\"לית",
    "למנכ\"ל",
];

/// Honorifics and ranks that precede a name
const TITLES: &[&str] = &[
    "ח\"כ", "ד\"ר", "פרופ'", "עו\"ד", "רב", "ניצב", "היו\"ר", "יו\"ר", "נצ\"מ", "סא\"ל", "רס\"ן", "תא\"ל",
    "אלוף", "מר", "גב'", "גב\"'",
];

/// Given names that start with ה and must not be taken for a title
const NAMES_STARTING_WITH_HE: &[&str] = &[
    "האנה", "האני", "הארי", "הגר", "הדס", "הדסה", "הדר", "הדרה", "הוגו", "הוד", "הודיה", "הולי",
    "הורדוס", "היידי", "היילי", "הילאי", "הילדה", "הילה", "הילור", "הילי", "הילית", "הילל",
    "הילרי", "הינדל", "הלגה", "הלל", "הללי", "הלן", "הלנה", "הלני", "הני", "הניה", "הנרי",
    "הנריטה", "הנרייטה", "הענדל", "העני", "הקטור", "הראל", "הראלה", "הרברט", "הרולד",
    "הרמיוני", "הרן", "הרצל", "הרשל",
];

/// Map typographic quote marks to their ASCII equivalents.
///
/// Every substitution is one char for one char, so char offsets computed on
/// the normalized text are valid for the original.
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{05F4}' => '"',
            '\u{2018}' | '\u{2019}' | '`' | '\u{00B4}' | '\u{02BC}' | '\u{201B}' | '\u{05F3}' => '\'',
            other => other,
        })
        .collect()
}

/// Reduce a label such as `שר האוצר (הליכוד) משה כהן` to the speaker's name.
///
/// Scans words from the end, stopping at a title, a role word, or a
/// definite-article word once two name words have been collected. Falls back
/// to the whole label if nothing survives.
pub fn clean_speaker_name(label: &str) -> String {
    let without_parens = PARENTHESIZED.replace_all(label, "");
    let trimmed = without_parens
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim();

    let mut name_words: Vec<&str> = Vec::new();
    for word in trimmed.split_whitespace().rev() {
        if ROLE_WORDS.contains(&word) || TITLES.contains(&word) || word.starts_with("וה") {
            break;
        }
        if name_words.len() >= 2
            && word.starts_with('ה')
            && !NAMES_STARTING_WITH_HE.contains(&word)
        {
            break;
        }
        name_words.push(word);
        if name_words.len() >= MAX_NAME_WORDS {
            break;
        }
    }
    name_words.reverse();

    let name = name_words.join(" ");
    let name = name.trim_end_matches(':').trim_matches('-').trim();
    if name.is_empty() {
        trimmed.to_string()
    } else {
        name.to_string()
    }
}
