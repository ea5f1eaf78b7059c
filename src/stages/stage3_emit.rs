use std::io::Write;

use tracing::info;

use crate::error::Result;
use crate::models::{EmitSummary, ProtocolInfo, SentenceRecord, Utterance};

use super::{ExtractorConfig, extract_sentences};

/// Configuration for Stage 3 record emission
#[derive(Debug, Clone, Default)]
pub struct EmitterConfig {
    /// Only emit records for this speaker
    pub speaker_filter: Option<String>,
    /// Append protocol metadata fields to every record
    pub with_metadata: bool,
}

/// Streams sentence records as JSON lines.
///
/// Each record is serialized straight to the writer, so memory use does not
/// grow with the number of records.
pub struct RecordWriter<W: Write> {
    writer: W,
    next_index: u64,
    protocol: Option<ProtocolInfo>,
    speaker_filter: Option<String>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_index: 0,
            protocol: None,
            speaker_filter: None,
        }
    }

    /// Attach protocol metadata to every record
    pub fn with_protocol(mut self, protocol: ProtocolInfo) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Skip records of every other speaker
    pub fn with_speaker_filter(mut self, speaker: impl Into<String>) -> Self {
        self.speaker_filter = Some(speaker.into());
        self
    }

    /// Write one record; returns false when the speaker filter skipped it
    pub fn write(&mut self, speaker: &str, sentence: &str) -> Result<bool> {
        if self
            .speaker_filter
            .as_deref()
            .is_some_and(|wanted| wanted != speaker)
        {
            return Ok(false);
        }

        let record = SentenceRecord {
            speaker,
            sentence,
            index: self.next_index,
            protocol: self.protocol.as_ref(),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.next_index += 1;
        Ok(true)
    }

    pub fn records_written(&self) -> u64 {
        self.next_index
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Perform Stage 3: extract and write every utterance's sentences in order.
///
/// Fails on the first utterance that cannot be segmented; whatever was
/// already written must then be discarded by the caller.
pub fn emit_records<W: Write>(
    utterances: &[Utterance],
    extractor: &ExtractorConfig,
    writer: &mut RecordWriter<W>,
) -> Result<EmitSummary> {
    let mut summary = EmitSummary {
        utterances: utterances.len(),
        ..Default::default()
    };

    for utterance in utterances {
        for sentence in extract_sentences(utterance, extractor)? {
            if writer.write(&utterance.speaker, &sentence)? {
                summary.records_written += 1;
                summary.note_speaker(&utterance.speaker);
            }
        }
    }

    info!(
        "Wrote {} records for {} speakers",
        summary.records_written,
        summary.speakers.len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(speaker: &str, text: &str) -> Utterance {
        let mut utterance = Utterance::new(speaker, 0);
        utterance.push(text);
        utterance
    }

    fn lines(bytes: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_emit_scenario() {
        let utterances = vec![
            utterance("John", "Hello there. How are you?"),
            utterance("Jane", "I am fine."),
        ];
        let mut writer = RecordWriter::new(Vec::new());

        let summary = emit_records(&utterances, &ExtractorConfig::default(), &mut writer).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            output,
            concat!(
                "{\"speaker\":\"John\",\"sentence\":\"Hello there.\",\"index\":0}\n",
                "{\"speaker\":\"John\",\"sentence\":\"How are you?\",\"index\":1}\n",
                "{\"speaker\":\"Jane\",\"sentence\":\"I am fine.\",\"index\":2}\n",
            )
        );
        assert_eq!(summary.records_written, 3);
        assert_eq!(summary.speakers, vec!["John", "Jane"]);
    }

    #[test]
    fn test_hebrew_written_verbatim() {
        let mut writer = RecordWriter::new(Vec::new());
        writer.write("דוד", "שלום לכולם.").unwrap();

        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(output.contains("שלום לכולם."));
    }

    #[test]
    fn test_speaker_filter_keeps_indices_contiguous() {
        let utterances = vec![
            utterance("John", "One. Two."),
            utterance("Jane", "Three."),
            utterance("John", "Four."),
        ];
        let mut writer = RecordWriter::new(Vec::new()).with_speaker_filter("John");

        let summary = emit_records(&utterances, &ExtractorConfig::default(), &mut writer).unwrap();
        let records = lines(&writer.into_inner().unwrap());

        assert_eq!(summary.records_written, 3);
        assert_eq!(summary.speakers, vec!["John"]);
        let indices: Vec<u64> = records.iter().map(|r| r["index"].as_u64().unwrap()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(records[2]["sentence"], "Four.");
    }

    #[test]
    fn test_protocol_metadata_appended() {
        let info = ProtocolInfo::from_file_name("25_ptv_77.docx");
        let mut writer = RecordWriter::new(Vec::new()).with_protocol(info);
        writer.write("דוד", "שלום.").unwrap();

        let records = lines(&writer.into_inner().unwrap());
        assert_eq!(records[0]["knesset_number"], 25);
        assert_eq!(records[0]["protocol_type"], "committee");
        assert_eq!(records[0]["protocol_name"], "25_ptv_77.docx");
        assert!(records[0]["protocol_number"].is_null());
    }
}
