use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::models::{EmitSummary, ProtocolInfo};

/// Write a file so that it either appears complete or not at all.
///
/// The content goes to a temporary file next to `path`, which is renamed
/// into place only if `write` succeeds.
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    let value = {
        let mut writer = BufWriter::new(temp.as_file());
        let value = write(&mut writer)?;
        writer
            .into_inner()
            .map_err(|e| e.into_error())
            .context("Failed to flush output")?;
        value
    };

    temp.persist(path)
        .with_context(|| format!("Failed to write output file: {:?}", path))?;
    Ok(value)
}

/// Per-document entry of the run summary
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub protocol: ProtocolInfo,
    pub paragraphs: usize,
    #[serde(flatten)]
    pub emit: EmitSummary,
}

/// Summary of one CLI run, written as a JSON sidecar
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// RFC 3339 time the run finished
    pub processed_at: String,
    pub output: String,
    pub total_records: u64,
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn new(output: &Path, files: Vec<FileReport>) -> Self {
        Self {
            processed_at: chrono::Utc::now().to_rfc3339(),
            output: output.display().to_string(),
            total_records: files.iter().map(|f| f.emit.records_written).sum(),
            files,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Format `speaker: sentence` preview lines, wrapping long sentences
pub fn format_preview(sentences: &[(String, String)], limit: usize, width: usize) -> String {
    let mut output = String::new();

    for (speaker, sentence) in sentences.iter().take(limit) {
        output.push_str(&format!("{}:\n", speaker));
        for line in wrap_text(sentence, width).lines() {
            output.push_str("    ");
            output.push_str(line);
            output.push('\n');
        }
    }

    output
}

/// Wrap text at approximately the given width (in chars)
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len + word_len + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word_len;
    }

    result
}
