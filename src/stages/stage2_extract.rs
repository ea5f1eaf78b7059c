use tracing::debug;

use crate::error::{ProtocolError, Result};
use crate::heuristics::{default_abbreviations, is_valid_sentence, normalize_dashes, tokenize_sentence};
use crate::models::Utterance;

/// Configuration for Stage 2 sentence extraction
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Lowercase abbreviations, without the trailing period
    pub abbreviations: Vec<String>,
    /// Filter and tokenize sentences for the research corpus format
    pub corpus_mode: bool,
    /// Minimum tokens a corpus sentence must have
    pub min_corpus_tokens: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            abbreviations: default_abbreviations(),
            corpus_mode: false,
            min_corpus_tokens: 4,
        }
    }
}

/// Perform Stage 2: split one utterance into sentences.
///
/// Returns sentences in order with surrounding whitespace trimmed; nothing
/// but whitespace is lost between them unless corpus mode filters a
/// sentence out.
pub fn extract_sentences(utterance: &Utterance, config: &ExtractorConfig) -> Result<Vec<String>> {
    let text = utterance.text();
    check_decodable(&text, &utterance.speaker)?;

    if !config.corpus_mode {
        return Ok(split_sentences(&text, &config.abbreviations));
    }

    let text = normalize_dashes(&text);
    let sentences: Vec<String> = split_sentences(&text, &config.abbreviations)
        .into_iter()
        .filter(|sentence| is_valid_sentence(sentence))
        .map(|sentence| tokenize_sentence(&sentence))
        .filter(|tokens| tokens.len() >= config.min_corpus_tokens)
        .map(|tokens| tokens.join(" "))
        .collect();

    debug!(
        "Speaker {:?}: {} corpus sentences",
        utterance.speaker,
        sentences.len()
    );
    Ok(sentences)
}

/// Replacement and NUL characters mean the text was decoded lossily
fn check_decodable(text: &str, speaker: &str) -> Result<()> {
    if let Some(bad) = text.chars().find(|c| matches!(c, '\u{FFFD}' | '\0')) {
        return Err(ProtocolError::SegmentationFailure {
            speaker: speaker.to_string(),
            reason: format!("text contains undecodable character U+{:04X}", bad as u32),
        });
    }
    Ok(())
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '”' | '’' | '»' | '״')
}

/// Split text at sentence-final punctuation followed by whitespace.
///
/// A lone period does not end a sentence after an abbreviation, a single
/// letter initial, or an enumeration number opening the sentence.
pub fn split_sentences(text: &str, abbreviations: &[String]) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |(b, _)| *b);

    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if !is_terminal(chars[i].1) {
            i += 1;
            continue;
        }

        let run_start = i;
        while i < chars.len() && is_terminal(chars[i].1) {
            i += 1;
        }
        let single_period = i - run_start == 1 && chars[run_start].1 == '.';
        while i < chars.len() && is_closer(chars[i].1) {
            i += 1;
        }

        if i >= chars.len() || !chars[i].1.is_whitespace() {
            continue;
        }
        if single_period && !period_ends_sentence(&text[start..byte_at(run_start)], abbreviations) {
            continue;
        }

        let end = byte_at(i);
        push_sentence(&mut sentences, &text[start..end]);
        start = end;
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let sentence = candidate.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}

/// Decide whether a period closes the sentence, given the text before it
fn period_ends_sentence(before: &str, abbreviations: &[String]) -> bool {
    let mut words = before.split_whitespace();
    let Some(last) = words.next_back() else {
        return true;
    };
    let word = last.trim_start_matches(['(', '[', '"', '\'', '“', '„']);

    let mut letters = word.chars();
    if let (Some(c), None) = (letters.next(), letters.next()) {
        if c.is_alphabetic() {
            return false;
        }
    }

    let lower = word.to_lowercase();
    if abbreviations.iter().any(|a| *a == lower) {
        return false;
    }

    let opens_sentence = words.next().is_none();
    !(opens_sentence && !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        split_sentences(text, &default_abbreviations())
    }

    fn utterance(speaker: &str, paragraphs: &[&str]) -> Utterance {
        let mut utterance = Utterance::new(speaker, 0);
        for p in paragraphs {
            utterance.push(p);
        }
        utterance
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(split("Hello there. How are you?"), vec!["Hello there.", "How are you?"]);
        assert_eq!(split("I am fine."), vec!["I am fine."]);
    }

    #[test]
    fn test_hebrew_split() {
        assert_eq!(
            split("אני פותח את הישיבה. האם יש הערות? לא!"),
            vec!["אני פותח את הישיבה.", "האם יש הערות?", "לא!"]
        );
    }

    #[test]
    fn test_mixed_terminal_runs_and_closers() {
        assert_eq!(
            split("הוא אמר \"די!\" ויצא. באמת?! כן... בסדר"),
            vec!["הוא אמר \"די!\"", "ויצא.", "באמת?!", "כן...", "בסדר"]
        );
    }

    #[test]
    fn test_no_split_inside_numbers() {
        assert_eq!(split("התקציב גדל ב-3.5 אחוזים. נמשיך."), vec!["התקציב גדל ב-3.5 אחוזים.", "נמשיך."]);
    }

    #[test]
    fn test_abbreviations_and_initials() {
        assert_eq!(
            split("Mr. Smith met Dr. Jones at 5 p.m. today. Then J. Doe left."),
            vec!["Mr. Smith met Dr. Jones at 5 p.m. today.", "Then J. Doe left."]
        );
        assert_eq!(
            split("ראו עמ. 5 בדוח. א. בן גוריון אמר זאת."),
            vec!["ראו עמ. 5 בדוח.", "א. בן גוריון אמר זאת."]
        );
    }

    #[test]
    fn test_enumeration_number() {
        assert_eq!(
            split("1. הצעת חוק התקציב. 2. שונות."),
            vec!["1. הצעת חוק התקציב.", "2. שונות."]
        );
    }

    #[test]
    fn test_whitespace_only() {
        assert!(split("   ").is_empty());
        assert!(split("").is_empty());
    }

    #[test]
    fn test_extract_joins_paragraphs() {
        let utt = utterance("John", &["Hello there.", "How are you?"]);
        let sentences = extract_sentences(&utt, &ExtractorConfig::default()).unwrap();
        assert_eq!(sentences, vec!["Hello there.", "How are you?"]);
    }

    #[test]
    fn test_paragraph_without_terminal_merges_with_next() {
        let utt = utterance("דוד", &["אדוני היושב ראש", "חברי הכנסת, תודה."]);
        let sentences = extract_sentences(&utt, &ExtractorConfig::default()).unwrap();
        assert_eq!(sentences, vec!["אדוני היושב ראש חברי הכנסת, תודה."]);
    }

    #[test]
    fn test_no_characters_lost() {
        let text = "אני פותח את הישיבה.  Mr. Cohen, please: 3.5% (so?) \"yes!\" ok";
        let utt = utterance("x", &[text]);
        let joined: String = extract_sentences(&utt, &ExtractorConfig::default())
            .unwrap()
            .concat()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let original: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(joined, original);
    }

    #[test]
    fn test_replacement_char_fails() {
        let utt = utterance("John", &["Broken \u{FFFD} text."]);
        let result = extract_sentences(&utt, &ExtractorConfig::default());
        assert!(matches!(
            result,
            Err(ProtocolError::SegmentationFailure { speaker, .. }) if speaker == "John"
        ));
    }

    #[test]
    fn test_corpus_mode() {
        let config = ExtractorConfig {
            corpus_mode: true,
            ..Default::default()
        };
        let utt = utterance(
            "דוד",
            &["אני מודה לחברי הכנסת, באמת. תודה. I agree with Google. זה לא -- אני רוצה לומר שהחוק חשוב."],
        );

        let sentences = extract_sentences(&utt, &config).unwrap();
        assert_eq!(sentences, vec!["אני מודה לחברי הכנסת , באמת ."]);
    }

    #[test]
    fn test_corpus_mode_normalizes_dashes() {
        let config = ExtractorConfig {
            corpus_mode: true,
            ..Default::default()
        };
        let utt = utterance("דוד", &["הדיון נקבע ל–10 בחודש הבא."]);

        let sentences = extract_sentences(&utt, &config).unwrap();
        assert_eq!(sentences, vec!["הדיון נקבע ל - 10 בחודש הבא ."]);
    }
}
