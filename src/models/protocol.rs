use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kind of session recorded in a protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    /// Plenary session (`ptm` file code)
    Plenary,
    /// Committee session (`ptv` file code)
    Committee,
    Unknown,
}

impl ProtocolType {
    /// Map a Knesset file-name code to a protocol type
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "ptm" => Self::Plenary,
            "ptv" => Self::Committee,
            _ => Self::Unknown,
        }
    }
}

/// Metadata identifying the protocol a sentence came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolInfo {
    /// File name of the source document
    pub protocol_name: String,
    /// Knesset number parsed from the file name
    pub knesset_number: Option<u32>,
    pub protocol_type: ProtocolType,
    /// Session number found in the document text
    pub protocol_number: Option<u32>,
}

impl ProtocolInfo {
    /// Parse `<knesset>_<code>_<rest>.docx` style file names.
    ///
    /// Names that don't follow the convention still produce a record with
    /// the file name and unknown fields.
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        let mut parts = stem.split('_');

        let knesset_number = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
        let protocol_type = parts
            .next()
            .map(ProtocolType::from_code)
            .unwrap_or(ProtocolType::Unknown);

        Self {
            protocol_name: file_name.to_string(),
            knesset_number,
            protocol_type,
            protocol_number: None,
        }
    }
}
