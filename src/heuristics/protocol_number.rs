use std::sync::LazyLock;

use regex::Regex;

use crate::models::Document;

/// `פרוטוקול מס' 12` / `פרוטוקול מספר 12`, optionally wrapped in `<...>`
static NUMBERED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<?פרוטוקול\s+(?:מס['׳"]?|מספר)\s*(\d+)>?"#).expect("valid regex")
});

/// `הישיבה המאה-ושלושים-ושתיים של הכנסת`
static SESSION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^הישיבה\s+([א-ת-]+)\s+של").expect("valid regex"));

static NOT_NUMBER_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d\x{0590}-\x{05FF}\s\-]").expect("valid regex"));

/// Value of a single Hebrew cardinal or ordinal number word
pub fn number_word_value(word: &str) -> Option<u32> {
    let value = match word {
        "אחד" | "אחת" | "ראשון" | "ראשונה" => 1,
        "שניים" | "שני" | "שתיים" | "שתי" | "שניה" | "שנייה" => 2,
        "שלושה" | "שלוש" | "שלישי" | "שלישית" => 3,
        "ארבעה" | "ארבע" | "רביעי" | "רביעית" => 4,
        "חמישה" | "חמש" | "חמישי" | "חמישית" => 5,
        "שישה" | "שש" | "שישי" | "שישית" => 6,
        "שבעה" | "שבע" | "שביעי" | "שביעית" => 7,
        "שמונה" | "שמיני" | "שמינית" => 8,
        "תשעה" | "תשע" | "תשיעי" | "תשיעית" => 9,
        "עשרה" | "עשר" | "עשירי" | "עשירית" => 10,
        "עשרים" => 20,
        "שלושים" => 30,
        "ארבעים" => 40,
        "חמישים" => 50,
        "שישים" => 60,
        "שבעים" => 70,
        "שמונים" => 80,
        "תשעים" => 90,
        "מאה" | "מאות" => 100,
        "מאתיים" => 200,
        "אלף" => 1000,
        _ => return None,
    };
    Some(value)
}

/// Sum a sequence of number words; `מאות` multiplies the preceding unit.
///
/// Stops at the first word that isn't a number word.
pub fn words_to_number(words: &[&str]) -> Option<u32> {
    let mut total: u32 = 0;
    let mut current: u32 = 0;

    for word in words {
        let Some(value) = number_word_value(word) else {
            break;
        };
        if *word == "מאות" {
            total = total
                .saturating_sub(current)
                .saturating_add(current.saturating_mul(100));
        } else {
            current = value;
            total = total.saturating_add(current);
        }
    }

    (total > 0).then_some(total)
}

/// Parse a number written either as digits or as hyphenated Hebrew words
pub fn parse_number_phrase(phrase: &str) -> Option<u32> {
    let cleaned = NOT_NUMBER_TEXT.replace_all(phrase.trim(), "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        return cleaned.parse().ok();
    }

    let mut words = Vec::new();
    for word in cleaned.split(|c: char| c.is_whitespace() || c == '-') {
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        // conjunction and definite-article prefixes
        let base = word.trim_start_matches(['ו', 'ה']);
        if number_word_value(base).is_none() {
            break;
        }
        words.push(base);
    }

    words_to_number(&words)
}

/// Find the session number in the protocol header paragraphs
pub fn extract_protocol_number(document: &Document) -> Option<u32> {
    document.texts().find_map(|text| {
        [&*NUMBERED_HEADER, &*SESSION_HEADER]
            .iter()
            .filter_map(|pattern| pattern.captures(text.trim()))
            .find_map(|caps| parse_number_phrase(&caps[1]))
    })
}
