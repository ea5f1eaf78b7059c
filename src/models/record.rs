use serde::Serialize;

use super::ProtocolInfo;

/// One output line: a sentence attributed to a speaker.
///
/// Records are written one at a time, so they borrow from the utterance
/// being processed instead of owning copies.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceRecord<'a> {
    pub speaker: &'a str,
    pub sentence: &'a str,
    /// Sequence number within the document, starting at 0
    pub index: u64,
    /// Protocol metadata, written after `index` when present
    #[serde(flatten)]
    pub protocol: Option<&'a ProtocolInfo>,
}

/// Totals reported by the emitter for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitSummary {
    /// Number of JSONL lines written
    pub records_written: u64,
    /// Utterances that reached the extractor
    pub utterances: usize,
    /// Utterances dropped by the segmenter (empty or ignored speaker)
    pub dropped_utterances: usize,
    /// Distinct speakers with at least one record, in first-appearance order
    pub speakers: Vec<String>,
}

impl EmitSummary {
    pub(crate) fn note_speaker(&mut self, speaker: &str) {
        if !self.speakers.iter().any(|s| s == speaker) {
            self.speakers.push(speaker.to_string());
        }
    }
}
