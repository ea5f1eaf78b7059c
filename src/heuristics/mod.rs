//! Knesset-specific text rules used by the pipeline stages.

pub mod corpus;
pub mod protocol_number;
pub mod speaker_names;

pub use corpus::*;
pub use protocol_number::*;
pub use speaker_names::*;

/// Pseudo speakers for shouted interjections from the floor
pub const INTERJECTION_SPEAKERS: &[&str] = &["קריאה", "קריאות"];

/// Title marking the session chair's label, after quote normalization
pub const CHAIR_MARKER: &str = "יו\"ר";

/// Abbreviations after which a period does not end a sentence
pub fn default_abbreviations() -> Vec<String> {
    [
        // Hebrew
        "מס", "עמ", "סע", "פס", "רח", "טל", "וכו", "וכד", "לדוג",
        // Latin
        "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "e.g", "i.e", "a.m", "p.m",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
