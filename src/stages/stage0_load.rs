use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::error::{ProtocolError, Result};
use crate::io::{RawParagraph, read_docx_bytes, read_docx_file};
use crate::models::{Document, Paragraph};

/// `<< דובר >>`-style markup left by the Knesset export
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<<.*?>>").expect("valid regex"));

/// Load a `.docx` file into a cleaned document
pub fn load_document_file(path: &Path) -> Result<Document> {
    let raw = read_docx_file(path)?;
    load_document(raw)
}

/// Load an in-memory `.docx` (e.g. an upload) into a cleaned document
pub fn load_document_bytes(bytes: &[u8]) -> Result<Document> {
    let raw = read_docx_bytes(bytes)?;
    load_document(raw)
}

/// Perform Stage 0: turn raw body paragraphs into a document.
///
/// Markup tags are removed, whitespace collapsed, and paragraphs left empty
/// are dropped. Fails with `EmptyDocument` when nothing remains.
pub fn load_document(raw: Vec<RawParagraph>) -> Result<Document> {
    let total = raw.len();

    let paragraphs: Vec<Paragraph> = raw
        .into_iter()
        .filter_map(|p| {
            let text = clean_paragraph_text(&p.text);
            (!text.is_empty()).then_some((text, p.underlined))
        })
        .enumerate()
        .map(|(index, (text, underlined))| Paragraph {
            index,
            text,
            underlined,
        })
        .collect();

    if paragraphs.is_empty() {
        return Err(ProtocolError::EmptyDocument);
    }

    info!(
        "Loaded {} non-empty paragraphs ({} in body)",
        paragraphs.len(),
        total
    );

    Ok(Document { paragraphs })
}

/// Strip markup tags and collapse whitespace runs
pub fn clean_paragraph_text(text: &str) -> String {
    let without_tags = MARKUP_TAG.replace_all(text, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}
