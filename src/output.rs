use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{self, Write};

use crate::chunker::Chunk;

/// A chunk handed to the downstream indexing pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Stable identifier derived from source, position and content
    pub id: String,
    /// Display name of the source document
    pub source: String,
    pub index: usize,
    /// Byte offset of the chunk in the source document
    pub start_offset: usize,
    pub size: usize,
    pub text: String,
}

impl ChunkRecord {
    pub fn new(source: &str, chunk: Chunk) -> Self {
        Self {
            id: record_id(source, chunk.metadata.index, &chunk.text),
            source: source.to_string(),
            index: chunk.metadata.index,
            start_offset: chunk.metadata.start_offset,
            size: chunk.metadata.size,
            text: chunk.text,
        }
    }
}

/// SHA256 over source name, index and text, hex-encoded
pub fn record_id(source: &str, index: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update([0u8]);
    hasher.update(index.to_le_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// How records are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Human-readable listing
    Text,
}

/// Streams records to any writer
pub struct RecordWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            written: 0,
        }
    }

    pub fn write(&mut self, record: &ChunkRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut self.writer, record)?;
                self.writer.write_all(b"\n")?;
            }
            OutputFormat::Text => {
                writeln!(
                    self.writer,
                    "--- {} #{} (size {}, offset {}) ---",
                    record.source, record.index, record.size, record.start_offset
                )?;
                writeln!(self.writer, "{}", record.text)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
