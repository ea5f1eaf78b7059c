use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use knesset_protocols::heuristics::INTERJECTION_SPEAKERS;
use knesset_protocols::{
    EmitterConfig, ExtractorConfig, PipelineConfig, SegmenterConfig, SpeakerSegmenter,
    detect_protocol, extract_sentences, format_preview, load_document_file, process_files,
};

#[derive(Parser)]
#[command(name = "knesset-protocols")]
#[command(author, version, about = "Speaker-attributed sentences from Knesset protocols", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract sentences from protocol documents into a JSONL file
    Process {
        /// Input protocol documents (.docx)
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Output file (JSONL, one record per line)
        #[arg(short, long)]
        output: PathBuf,

        /// Write a JSON run summary to this file
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Only emit sentences of this speaker
        #[arg(long)]
        speaker: Option<String>,

        /// Add protocol name, Knesset number, type and session number to each record
        #[arg(long)]
        with_metadata: bool,

        #[command(flatten)]
        options: PipelineArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show speakers, counts and sample sentences without writing output
    Analyze {
        /// Input protocol documents (.docx)
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Number of sentences to preview
        #[arg(long, default_value = "30")]
        preview: usize,

        #[command(flatten)]
        options: PipelineArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Segmentation and extraction options shared by both commands
#[derive(clap::Args)]
struct PipelineArgs {
    /// Maximum characters before a speaker label's colon
    #[arg(long, default_value = "60")]
    max_label_prefix: usize,

    /// Custom speaker label regex (must define a `name` group)
    #[arg(long)]
    label_pattern: Option<String>,

    /// Speaker name for text before the first label
    #[arg(long, default_value = "unknown")]
    unknown_speaker: String,

    /// Only accept underlined paragraphs as speaker labels
    #[arg(long)]
    require_underline: bool,

    /// Treat labels as text until the chair (יו"ר) first speaks
    #[arg(long)]
    wait_for_chair: bool,

    /// Drop interjections from the floor (קריאה / קריאות)
    #[arg(long)]
    drop_interjections: bool,

    /// Emit filtered, tokenized Hebrew sentences for corpus building
    #[arg(long)]
    corpus_mode: bool,
}

impl PipelineArgs {
    fn into_config(self, emitter: EmitterConfig) -> PipelineConfig {
        let defaults = SegmenterConfig::default();
        let ignored_speakers = if self.drop_interjections {
            INTERJECTION_SPEAKERS.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        PipelineConfig {
            segmenter: SegmenterConfig {
                label_pattern: self.label_pattern.unwrap_or(defaults.label_pattern),
                max_label_prefix_chars: self.max_label_prefix,
                unknown_speaker: self.unknown_speaker,
                require_underline: self.require_underline,
                ignored_speakers,
                wait_for_chair: self.wait_for_chair,
                ..defaults
            },
            extractor: ExtractorConfig {
                corpus_mode: self.corpus_mode,
                ..Default::default()
            },
            emitter,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            summary,
            speaker,
            with_metadata,
            options,
            verbose,
        } => {
            setup_logging(verbose);
            let config = options.into_config(EmitterConfig {
                speaker_filter: speaker,
                with_metadata,
            });
            process(input, output, summary, &config)
        }
        Commands::Analyze {
            input,
            preview,
            options,
            verbose,
        } => {
            setup_logging(verbose);
            let config = options.into_config(EmitterConfig::default());
            analyze(input, preview, &config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn process(
    input: Vec<PathBuf>,
    output: PathBuf,
    summary_path: Option<PathBuf>,
    config: &PipelineConfig,
) -> Result<()> {
    info!("Processing {} document(s) into {:?}", input.len(), output);
    let summary = process_files(&input, &output, config)?;

    for file in &summary.files {
        info!(
            "{}: {} paragraphs, {} records, {} speakers, {} utterances dropped",
            file.protocol.protocol_name,
            file.paragraphs,
            file.emit.records_written,
            file.emit.speakers.len(),
            file.emit.dropped_utterances
        );
    }

    if let Some(path) = summary_path {
        summary.write_json(&path)?;
        info!("Summary written to {:?}", path);
    }

    info!(
        "Complete: {} records written to {:?}",
        summary.total_records, output
    );
    Ok(())
}

fn analyze(input: Vec<PathBuf>, preview: usize, config: &PipelineConfig) -> Result<()> {
    let segmenter = SpeakerSegmenter::new(config.segmenter.clone())?;

    for path in &input {
        info!("Analyzing {:?}", path);
        let document = load_document_file(path)
            .with_context(|| format!("Failed to load {:?}", path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let protocol = detect_protocol(&name, &document);
        let segmentation = segmenter.segment(&document);

        let mut sentences: Vec<(String, String)> = Vec::new();
        for utterance in &segmentation.utterances {
            for sentence in extract_sentences(utterance, &config.extractor)? {
                sentences.push((utterance.speaker.clone(), sentence));
            }
        }

        let mut per_speaker: BTreeMap<&str, usize> = BTreeMap::new();
        for (speaker, _) in &sentences {
            *per_speaker.entry(speaker.as_str()).or_insert(0) += 1;
        }

        println!("Protocol Analysis: {}", protocol.protocol_name);
        println!("==================");
        println!(
            "Knesset: {}",
            protocol
                .knesset_number
                .map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );
        println!("Type: {:?}", protocol.protocol_type);
        println!(
            "Session number: {}",
            protocol
                .protocol_number
                .map_or_else(|| "unknown".to_string(), |n| n.to_string())
        );
        println!("Paragraphs: {}", document.len());
        println!("Speaker labels: {}", segmentation.labels);
        println!(
            "Utterances: {} ({} empty dropped, {} ignored dropped)",
            segmentation.utterances.len(),
            segmentation.dropped_empty,
            segmentation.dropped_ignored
        );
        println!("Sentences: {}", sentences.len());
        println!();

        println!("Speakers");
        println!("--------");
        for (speaker, count) in &per_speaker {
            println!("{}: {} sentences", speaker, count);
        }
        println!();

        if preview > 0 {
            println!("Example sentences");
            println!("-----------------");
            print!("{}", format_preview(&sentences, preview, 80));
            println!();
        }
    }

    Ok(())
}
