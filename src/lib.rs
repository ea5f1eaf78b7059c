pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use error::{ProtocolError, Result};
pub use io::{FileReport, RunSummary, format_preview, read_docx_bytes, read_docx_file};
pub use models::{Document, EmitSummary, Paragraph, ProtocolInfo, ProtocolType, SentenceRecord, Utterance};
pub use pipeline::{
    PipelineConfig, detect_protocol, process_bytes, process_file, process_files, run_pipeline,
};
pub use stages::{
    EmitterConfig, ExtractorConfig, RecordWriter, SegmentationResult, SegmenterConfig,
    SpeakerSegmenter, emit_records, extract_sentences, load_document, load_document_bytes,
    load_document_file, segment, split_sentences,
};
