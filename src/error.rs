use thiserror::Error;

/// Errors raised while turning a protocol document into sentence records
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The input is not a readable word-processor document
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The document parsed but has no extractable text
    #[error("document contains no text")]
    EmptyDocument,

    /// Sentence splitting could not handle an utterance
    #[error("sentence segmentation failed for speaker {speaker:?}: {reason}")]
    SegmentationFailure { speaker: String, reason: String },

    #[error("invalid speaker label pattern: {0}")]
    InvalidLabelPattern(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
