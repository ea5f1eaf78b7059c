use std::sync::LazyLock;

use regex::Regex;

/// Words (with an optional inner quote, as in `ח"כ`), numbers, and single
/// punctuation marks
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\w+["']?\w*|\d+|[".,;:!?()\[\]{}\-%&@#$*+=/<>~`|\\]"#).expect("valid regex")
});

static DIGITS_OR_OTHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+|\D+").expect("valid regex"));

static HEBREW_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{0590}-\x{05FF}]").expect("valid regex"));

static LATIN_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("valid regex"));

/// `--`, `- -` and longer: marks an interrupted sentence
static DASH_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-\s*){2,}").expect("valid regex"));

/// Replace hyphen, figure dash, en/em dash, bar and minus with `-`
pub fn normalize_dashes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            other => other,
        })
        .collect()
}

/// A corpus sentence must be Hebrew, contain no Latin script and not be cut
/// off mid-way
pub fn is_valid_sentence(sentence: &str) -> bool {
    HEBREW_LETTER.is_match(sentence)
        && !LATIN_LETTER.is_match(sentence)
        && !DASH_SEQUENCE.is_match(sentence)
}

/// Split a sentence into word, number and punctuation tokens
pub fn tokenize_sentence(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for m in TOKEN.find_iter(sentence) {
        let token = m.as_str();
        if token.chars().count() > 1 && token.ends_with('"') {
            tokens.push(token[..token.len() - 1].to_string());
            tokens.push("\"".to_string());
        } else {
            tokens.extend(split_mixed_token(token));
        }
    }

    tokens
}

/// `5א` → `5`, `א`
fn split_mixed_token(token: &str) -> Vec<String> {
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    let has_alpha = token.chars().any(char::is_alphabetic);
    if has_digit && has_alpha {
        DIGITS_OR_OTHER
            .find_iter(token)
            .map(|m| m.as_str().to_string())
            .collect()
    } else {
        vec![token.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dashes() {
        assert_eq!(normalize_dashes("א–ב—ג−ד"), "א-ב-ג-ד");
    }

    #[test]
    fn test_is_valid_sentence() {
        assert!(is_valid_sentence("אני מודה לכם מאוד."));
        assert!(!is_valid_sentence("Thank you very much."));
        assert!(!is_valid_sentence("אני מודה ל-Google."));
        assert!(!is_valid_sentence("אני רוצה לומר --"));
        assert!(!is_valid_sentence("123."));
    }

    #[test]
    fn test_tokenize_sentence() {
        assert_eq!(
            tokenize_sentence("ח\"כ כהן אמר: \"לא נכון\", בשנת 2020."),
            vec!["ח\"כ", "כהן", "אמר", ":", "\"", "לא", "נכון", "\"", ",", "בשנת", "2020", "."]
        );
    }

    #[test]
    fn test_tokenize_splits_digits_from_letters() {
        assert_eq!(tokenize_sentence("סעיף 5א"), vec!["סעיף", "5", "א"]);
    }
}
