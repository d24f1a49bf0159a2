// Public API exports
pub mod chunker;
pub mod error;
pub mod length;
pub mod merger;
pub mod output;
pub mod settings;
pub mod source;
pub mod splitter;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use chunker::{
    CharacterChunker, Chunk, ChunkIndex, ChunkMetadata, ChunkStrategy, Chunker, ChunkerConfig,
    ChunkerConfigBuilder, RecursiveChunker, TextChunker, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS,
};
pub use error::ChunkError;

pub use length::{ByteCount, CharCount, GraphemeCount, LengthMeasure, LengthUnit, TokenEstimate};
pub use merger::{ChunkMerger, MergedChunk};
pub use splitter::{split, Fragment, KeepSeparator, Separator};

pub use output::{ChunkRecord, OutputFormat, RecordWriter};
pub use settings::{ChunkingSettings, Settings, SettingsError};
pub use source::{collect_sources, FileSource, SourceError, StdinSource, StringSource, TextSource};
