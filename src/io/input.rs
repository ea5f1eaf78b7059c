use std::path::Path;

use docx_rs::{
    BasedOn, DocumentChild, Paragraph, ParagraphChild, Run, RunChild, RunProperty, Style, Styles,
    Underline,
};
use tracing::debug;

use crate::error::{ProtocolError, Result};

/// A body paragraph as it appears in the `.docx`, before any cleaning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParagraph {
    /// Concatenated run text; tabs and breaks become spaces
    pub text: String,
    /// Whether the paragraph style or a run with visible text is underlined
    pub underlined: bool,
}

/// Read the body paragraphs of a `.docx` file
pub fn read_docx_file(path: &Path) -> Result<Vec<RawParagraph>> {
    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes from {:?}", bytes.len(), path);
    read_docx_bytes(&bytes)
}

/// Read the body paragraphs of an in-memory `.docx` document
pub fn read_docx_bytes(bytes: &[u8]) -> Result<Vec<RawParagraph>> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ProtocolError::UnsupportedFormat(e.to_string()))?;

    let styles = &docx.styles;
    let paragraphs: Vec<RawParagraph> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(raw_paragraph(paragraph, styles)),
            _ => None,
        })
        .collect();

    debug!("Document body has {} paragraphs", paragraphs.len());
    Ok(paragraphs)
}

fn raw_paragraph(paragraph: &Paragraph, styles: &Styles) -> RawParagraph {
    let mut raw = RawParagraph::default();
    collect_children(&paragraph.children, styles, &mut raw);

    if let Some(style) = &paragraph.property.style {
        raw.underlined |= style_underlined(styles, &style.val);
    }
    raw
}

fn collect_children(children: &[ParagraphChild], styles: &Styles, raw: &mut RawParagraph) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => collect_run(run, styles, raw),
            ParagraphChild::Hyperlink(link) => collect_children(&link.children, styles, raw),
            _ => {}
        }
    }
}

fn collect_run(run: &Run, styles: &Styles, raw: &mut RawParagraph) {
    let start = raw.text.len();
    for child in &run.children {
        match child {
            RunChild::Text(text) => raw.text.push_str(&text.text),
            RunChild::Tab(_) | RunChild::Break(_) => raw.text.push(' '),
            _ => {}
        }
    }

    if !raw.text[start..].trim().is_empty() && run_underlined(&run.run_property, styles) {
        raw.underlined = true;
    }
}

/// Direct run formatting first, then the run's character style
fn run_underlined(property: &RunProperty, styles: &Styles) -> bool {
    is_underlined(property)
        || property
            .style
            .as_ref()
            .is_some_and(|style| style_underlined(styles, &style.val))
}

fn is_underlined(property: &RunProperty) -> bool {
    property
        .underline
        .as_ref()
        .is_some_and(|underline| *underline != Underline::new("none"))
}

/// Follow a style and its `basedOn` chain looking for underline formatting
fn style_underlined(styles: &Styles, style_id: &str) -> bool {
    let mut visited: Vec<&str> = Vec::new();
    let mut next = styles.find_style_by_id(style_id);

    while let Some(style) = next {
        if visited.contains(&style.style_id.as_str()) {
            break;
        }
        if is_underlined(&style.run_property) {
            return true;
        }
        visited.push(&style.style_id);
        next = base_style_id(style).and_then(|id| styles.find_style_by_id(&id));
    }
    false
}

fn base_style_id(style: &Style) -> Option<String> {
    // the id is only reachable through the element's serialized form
    style.based_on.as_ref().and_then(|base: &BasedOn| {
        serde_json::to_value(base)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
    })
}
