use regex::Regex;
use tracing::{debug, info};

use crate::error::{ProtocolError, Result};
use crate::heuristics::{CHAIR_MARKER, clean_speaker_name, normalize_quotes};
use crate::models::{Document, Paragraph, Utterance};

/// Default label shape: optional `<`, a name, a colon, optional `>`, then
/// whitespace or the end of the paragraph
pub const DEFAULT_LABEL_PATTERN: &str = r"^<*(?P<name>[^:]+?)\s*:>*(?:\s+|$)";

/// Labels whose colon sits further into the paragraph than this are prose
pub const DEFAULT_MAX_LABEL_PREFIX_CHARS: usize = 60;

/// Configuration for Stage 1 speaker segmentation
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Regex recognizing a speaker label; must define a `name` group
    pub label_pattern: String,
    /// The label's colon must be among this many leading chars
    pub max_label_prefix_chars: usize,
    /// Maximum words in the text before the colon
    pub max_label_words: usize,
    /// Speaker for text before the first label
    pub unknown_speaker: String,
    /// Only accept labels on underlined paragraphs
    pub require_underline: bool,
    /// Speakers whose utterances are dropped
    pub ignored_speakers: Vec<String>,
    /// Treat labels as text until the chair's label appears
    pub wait_for_chair: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            label_pattern: DEFAULT_LABEL_PATTERN.to_string(),
            max_label_prefix_chars: DEFAULT_MAX_LABEL_PREFIX_CHARS,
            max_label_words: 10,
            unknown_speaker: "unknown".to_string(),
            require_underline: false,
            ignored_speakers: Vec::new(),
            wait_for_chair: false,
        }
    }
}

/// Result of Stage 1 segmentation
#[derive(Debug, Clone, Default)]
pub struct SegmentationResult {
    /// Non-empty utterances in document order
    pub utterances: Vec<Utterance>,
    /// Utterances dropped because no text followed the label
    pub dropped_empty: usize,
    /// Utterances dropped because the speaker is ignored
    pub dropped_ignored: usize,
    /// Number of paragraphs recognized as labels
    pub labels: usize,
}

impl SegmentationResult {
    pub fn dropped(&self) -> usize {
        self.dropped_empty + self.dropped_ignored
    }
}

/// A recognized speaker label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLabel {
    /// Cleaned speaker name
    pub speaker: String,
    /// Text following the label on the same paragraph
    pub rest: String,
    /// Whether the label carries the chair's title
    pub chair: bool,
}

/// Splits a document into per-speaker utterances
#[derive(Debug, Clone)]
pub struct SpeakerSegmenter {
    label: Regex,
    config: SegmenterConfig,
}

impl SpeakerSegmenter {
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        let label = Regex::new(&config.label_pattern)
            .map_err(|e| ProtocolError::InvalidLabelPattern(e.to_string()))?;
        if !label.capture_names().any(|name| name == Some("name")) {
            return Err(ProtocolError::InvalidLabelPattern(format!(
                "pattern {:?} has no `name` group",
                config.label_pattern
            )));
        }

        Ok(Self { label, config })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Recognize a paragraph as a speaker label.
    ///
    /// Matching runs on quote-normalized text; since normalization maps
    /// chars one to one, the remainder is cut from the original text at the
    /// same char offset.
    pub fn parse_label(&self, paragraph: &Paragraph) -> Option<SpeakerLabel> {
        if self.config.require_underline && !paragraph.underlined {
            return None;
        }

        let normalized = normalize_quotes(&paragraph.text);
        let caps = self.label.captures(&normalized)?;
        let name = caps.name("name")?;
        let whole = caps.get(0)?;

        let colon_offset = match normalized[name.end()..whole.end()].find(':') {
            Some(pos) => normalized[..name.end() + pos].chars().count(),
            None => normalized[..name.end()].chars().count(),
        };
        if colon_offset >= self.config.max_label_prefix_chars {
            return None;
        }

        let raw_name = name.as_str().trim();
        if !is_plausible_name(raw_name, self.config.max_label_words) {
            return None;
        }

        let rest_offset = normalized[..whole.end()].chars().count();
        let rest: String = paragraph.text.chars().skip(rest_offset).collect();

        Some(SpeakerLabel {
            speaker: clean_speaker_name(raw_name),
            rest: rest.trim().to_string(),
            chair: raw_name.contains(CHAIR_MARKER),
        })
    }

    /// Perform Stage 1: attribute every paragraph to a speaker.
    ///
    /// Text before the first label goes to the unknown speaker. Utterances
    /// left without text are dropped. With `wait_for_chair`, labels before
    /// the chair's first label count as text.
    pub fn segment(&self, document: &Document) -> SegmentationResult {
        let mut result = SegmentationResult::default();
        let mut current = Utterance::new(&self.config.unknown_speaker, 0);
        let mut label_seen = false;

        for paragraph in &document.paragraphs {
            let label = self
                .parse_label(paragraph)
                .filter(|label| label_seen || label.chair || !self.config.wait_for_chair);
            match label {
                Some(label) => {
                    result.labels += 1;
                    debug!(
                        "Paragraph {}: label for {:?}",
                        paragraph.index, label.speaker
                    );
                    let next = Utterance::new(label.speaker, paragraph.index);
                    let previous = std::mem::replace(&mut current, next);
                    self.close(previous, label_seen, &mut result);
                    label_seen = true;
                    current.push(&label.rest);
                }
                None => current.push(&paragraph.text),
            }
        }
        self.close(current, label_seen, &mut result);

        info!(
            "Segmented {} paragraphs into {} utterances ({} labels, {} dropped)",
            document.len(),
            result.utterances.len(),
            result.labels,
            result.dropped()
        );

        result
    }

    fn close(&self, utterance: Utterance, labelled: bool, result: &mut SegmentationResult) {
        if utterance.is_empty() {
            // an empty leading unknown block is not an utterance at all
            if labelled {
                result.dropped_empty += 1;
            }
            return;
        }
        if self
            .config
            .ignored_speakers
            .iter()
            .any(|s| *s == utterance.speaker)
        {
            result.dropped_ignored += 1;
            return;
        }
        result.utterances.push(utterance);
    }
}

/// Reject label candidates that look like prose
fn is_plausible_name(name: &str, max_words: usize) -> bool {
    !name.is_empty()
        && name.chars().any(char::is_alphabetic)
        && !name.contains(['.', '!', '?'])
        && name.split_whitespace().count() <= max_words
}

/// Segment with a one-off segmenter
pub fn segment(document: &Document, config: &SegmenterConfig) -> Result<SegmentationResult> {
    Ok(SpeakerSegmenter::new(config.clone())?.segment(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> SpeakerSegmenter {
        SpeakerSegmenter::new(SegmenterConfig::default()).unwrap()
    }

    fn speakers(result: &SegmentationResult) -> Vec<&str> {
        result.utterances.iter().map(|u| u.speaker.as_str()).collect()
    }

    #[test]
    fn test_inline_labels() {
        let doc = Document::from_texts(["John: Hello there. How are you?", "Jane: I am fine."]);
        let result = segmenter().segment(&doc);

        assert_eq!(speakers(&result), vec!["John", "Jane"]);
        assert_eq!(result.utterances[0].paragraphs, vec!["Hello there. How are you?"]);
        assert_eq!(result.utterances[1].paragraphs, vec!["I am fine."]);
        assert_eq!(result.utterances[1].start_paragraph, 1);
        assert_eq!(result.dropped(), 0);
    }

    #[test]
    fn test_label_on_own_paragraph() {
        let doc = Document::from_texts(["היו\"ר יולי אדלשטיין:", "אני פותח את הישיבה.", "תודה."]);
        let result = segmenter().segment(&doc);

        assert_eq!(speakers(&result), vec!["יולי אדלשטיין"]);
        assert_eq!(
            result.utterances[0].paragraphs,
            vec!["אני פותח את הישיבה.", "תודה."]
        );
    }

    #[test]
    fn test_text_before_first_label_is_unknown() {
        let doc = Document::from_texts(["Opening remarks.", "John: Hi."]);
        let result = segmenter().segment(&doc);

        assert_eq!(speakers(&result), vec!["unknown", "John"]);
        assert_eq!(result.dropped(), 0);
    }

    #[test]
    fn test_no_labels_all_unknown() {
        let doc = Document::from_texts(["First paragraph.", "Second paragraph."]);
        let result = segmenter().segment(&doc);

        assert_eq!(speakers(&result), vec!["unknown"]);
        assert_eq!(result.utterances[0].paragraphs.len(), 2);
        assert_eq!(result.labels, 0);
    }

    #[test]
    fn test_consecutive_labels_drop_empty_utterance() {
        let doc = Document::from_texts(["John:", "Jane:", "I am fine."]);
        let result = segmenter().segment(&doc);

        assert_eq!(speakers(&result), vec!["Jane"]);
        assert_eq!(result.dropped_empty, 1);
    }

    #[test]
    fn test_trailing_label_dropped() {
        let doc = Document::from_texts(["John: Bye.", "Jane:"]);
        let result = segmenter().segment(&doc);

        assert_eq!(speakers(&result), vec!["John"]);
        assert_eq!(result.dropped_empty, 1);
    }

    #[test]
    fn test_late_colon_is_not_a_label() {
        let long = format!("{}: not a label", "word ".repeat(14).trim());
        let doc = Document::from_texts([long.as_str()]);
        let config = SegmenterConfig {
            max_label_words: 50,
            ..Default::default()
        };
        let result = SpeakerSegmenter::new(config).unwrap().segment(&doc);

        assert_eq!(speakers(&result), vec!["unknown"]);
    }

    #[test]
    fn test_prefix_limit_is_configurable() {
        let doc = Document::from_texts(["Chairman of the committee: We begin."]);

        let strict = SegmenterConfig {
            max_label_prefix_chars: 10,
            ..Default::default()
        };
        let result = SpeakerSegmenter::new(strict).unwrap().segment(&doc);
        assert_eq!(speakers(&result), vec!["unknown"]);

        let result = segmenter().segment(&doc);
        assert_eq!(speakers(&result), vec!["Chairman of the committee"]);
    }

    #[test]
    fn test_prefix_limit_measures_the_colon() {
        let seg = |limit| {
            SpeakerSegmenter::new(SegmenterConfig {
                max_label_prefix_chars: limit,
                ..Default::default()
            })
            .unwrap()
        };
        let paragraph = Paragraph {
            index: 0,
            text: "Jane   : Hi.".to_string(),
            underlined: false,
        };

        // colon is the 8th char
        assert!(seg(8).parse_label(&paragraph).is_some());
        assert!(seg(7).parse_label(&paragraph).is_none());
    }

    #[test]
    fn test_wait_for_chair() {
        let doc = Document::from_texts([
            "פרוטוקול מס' 12",
            "סדר היום:",
            "הצעת חוק התקציב.",
            "חברי הכנסת: משה כהן, דוד לוי.",
            "היו\"ר דוד ביטן:",
            "אני פותח את הישיבה.",
            "משה כהן: תודה.",
        ]);
        let config = SegmenterConfig {
            wait_for_chair: true,
            ..Default::default()
        };
        let result = SpeakerSegmenter::new(config).unwrap().segment(&doc);

        assert_eq!(speakers(&result), vec!["unknown", "דוד ביטן", "משה כהן"]);
        assert_eq!(
            result.utterances[0].paragraphs,
            vec![
                "פרוטוקול מס' 12",
                "סדר היום:",
                "הצעת חוק התקציב.",
                "חברי הכנסת: משה כהן, דוד לוי.",
            ]
        );
        assert_eq!(result.labels, 2);

        let result = segmenter().segment(&doc);
        assert!(speakers(&result).contains(&"סדר היום"));
    }

    #[test]
    fn test_chair_label_with_gershayim() {
        let paragraph = Paragraph {
            index: 0,
            text: "היו״ר דוד ביטן:".to_string(),
            underlined: false,
        };
        let label = segmenter().parse_label(&paragraph).unwrap();

        assert!(label.chair);
        assert_eq!(label.speaker, "דוד ביטן");
    }

    #[test]
    fn test_prose_colons_are_not_labels() {
        let seg = segmenter();
        let paragraph = |text: &str| Paragraph {
            index: 0,
            text: text.to_string(),
            underlined: false,
        };

        assert!(seg.parse_label(&paragraph("The vote is at 10:30 today.")).is_none());
        assert!(seg.parse_label(&paragraph("Finally. The list: one, two")).is_none());
        assert!(seg.parse_label(&paragraph("2020: a year")).is_none());
        assert!(seg.parse_label(&paragraph("Jane:")).is_some());
    }

    #[test]
    fn test_label_with_party_and_angle_brackets() {
        let doc = Document::from_texts(["<משה כהן (הליכוד):>", "דברים."]);
        let result = segmenter().segment(&doc);

        assert_eq!(speakers(&result), vec!["משה כהן"]);
    }

    #[test]
    fn test_rest_keeps_original_quotes() {
        let doc = Document::from_texts(["ח״כ דוד: אמרתי ״כן״."]);
        let result = segmenter().segment(&doc);

        assert_eq!(result.utterances[0].paragraphs, vec!["אמרתי ״כן״."]);
    }

    #[test]
    fn test_require_underline() {
        let mut doc = Document::from_texts(["John:", "Hello.", "Jane:", "Hi."]);
        doc.paragraphs[2].underlined = true;
        let config = SegmenterConfig {
            require_underline: true,
            ..Default::default()
        };
        let result = SpeakerSegmenter::new(config).unwrap().segment(&doc);

        assert_eq!(speakers(&result), vec!["unknown", "Jane"]);
        assert_eq!(result.utterances[0].paragraphs, vec!["John:", "Hello."]);
    }

    #[test]
    fn test_ignored_speakers() {
        let doc = Document::from_texts(["דוד: שלום.", "קריאות:", "בושה!", "דוד: נמשיך."]);
        let config = SegmenterConfig {
            ignored_speakers: vec!["קריאות".to_string()],
            ..Default::default()
        };
        let result = SpeakerSegmenter::new(config).unwrap().segment(&doc);

        assert_eq!(speakers(&result), vec!["דוד", "דוד"]);
        assert_eq!(result.dropped_ignored, 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let config = SegmenterConfig {
            label_pattern: "(unclosed".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SpeakerSegmenter::new(config),
            Err(ProtocolError::InvalidLabelPattern(_))
        ));

        let config = SegmenterConfig {
            label_pattern: r"^([^:]+):".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SpeakerSegmenter::new(config),
            Err(ProtocolError::InvalidLabelPattern(_))
        ));
    }
}
