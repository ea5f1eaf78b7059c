use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::error::Result;
use crate::heuristics::extract_protocol_number;
use crate::io::{FileReport, RunSummary, write_atomically};
use crate::models::{Document, EmitSummary, ProtocolInfo};
use crate::stages::{
    EmitterConfig, ExtractorConfig, RecordWriter, SegmenterConfig, SpeakerSegmenter, emit_records,
    load_document_bytes, load_document_file,
};

/// Configuration for the whole pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub segmenter: SegmenterConfig,
    pub extractor: ExtractorConfig,
    pub emitter: EmitterConfig,
}

/// Run stages 1 to 3 over a loaded document, writing JSONL to `writer`.
///
/// Indices start at 0 for every call.
pub fn run_pipeline<W: Write>(
    document: &Document,
    protocol: Option<&ProtocolInfo>,
    config: &PipelineConfig,
    writer: W,
) -> Result<EmitSummary> {
    let segmenter = SpeakerSegmenter::new(config.segmenter.clone())?;
    let segmentation = segmenter.segment(document);

    let mut records = RecordWriter::new(writer);
    if let Some(info) = protocol.filter(|_| config.emitter.with_metadata) {
        records = records.with_protocol(info.clone());
    }
    if let Some(speaker) = &config.emitter.speaker_filter {
        records = records.with_speaker_filter(speaker.clone());
    }

    let mut summary = emit_records(&segmentation.utterances, &config.extractor, &mut records)?;
    summary.dropped_utterances = segmentation.dropped();
    records.into_inner()?;

    Ok(summary)
}

/// Identify the protocol a document belongs to
pub fn detect_protocol(name: &str, document: &Document) -> ProtocolInfo {
    ProtocolInfo {
        protocol_number: extract_protocol_number(document),
        ..ProtocolInfo::from_file_name(name)
    }
}

/// Process an uploaded document held in memory.
///
/// Nothing reaches `writer` unless loading succeeds; callers wanting
/// all-or-nothing output should pass a buffer or a temporary file.
pub fn process_bytes<W: Write>(
    name: &str,
    bytes: &[u8],
    config: &PipelineConfig,
    writer: W,
) -> Result<FileReport> {
    let document = load_document_bytes(bytes)?;
    report_for(name, &document, config, writer)
}

/// Process one `.docx` file on disk
pub fn process_file<W: Write>(path: &Path, config: &PipelineConfig, writer: W) -> Result<FileReport> {
    let document = load_document_file(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    report_for(&name, &document, config, writer)
}

fn report_for<W: Write>(
    name: &str,
    document: &Document,
    config: &PipelineConfig,
    writer: W,
) -> Result<FileReport> {
    let protocol = detect_protocol(name, document);
    let emit = run_pipeline(document, Some(&protocol), config, writer)?;
    Ok(FileReport {
        protocol,
        paragraphs: document.len(),
        emit,
    })
}

/// Process every input into a single JSONL file.
///
/// The output file only appears if all inputs succeed.
pub fn process_files(
    inputs: &[PathBuf],
    output: &Path,
    config: &PipelineConfig,
) -> anyhow::Result<RunSummary> {
    let reports = write_atomically(output, |writer| {
        let mut reports = Vec::with_capacity(inputs.len());
        for input in inputs {
            info!("Processing {:?}", input);
            let report = process_file(input, config, &mut *writer)
                .with_context(|| format!("Failed to process {:?}", input))?;
            reports.push(report);
        }
        Ok(reports)
    })?;

    Ok(RunSummary::new(output, reports))
}
