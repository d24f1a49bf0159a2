mod character;
mod config;
mod recursive;


pub use character::CharacterChunker;
pub use config::{ChunkerConfig, ChunkerConfigBuilder};
pub use recursive::RecursiveChunker;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::length::LengthMeasure;
use crate::merger::MergedChunk;

/// Position of a chunk in its document's chunk sequence
pub type ChunkIndex = usize;

/// Default target chunk size (in length-measure units)
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between neighbouring chunks
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Paragraphs, then lines, then words, then single characters
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// A chunk of text ready for embedding/indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text content of this chunk
    pub text: String,
    /// Metadata about the chunk
    pub metadata: ChunkMetadata,
}

/// Metadata for a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Position in the chunk sequence
    pub index: ChunkIndex,
    /// Size according to the chunker's length measure
    pub size: usize,
    /// Byte offset of the chunk's first character in the source text
    pub start_offset: usize,
}

/// Capability shared by every chunking strategy
pub trait TextChunker: Send + Sync {
    /// Split `text` into ordered, possibly overlapping chunks with index,
    /// size and source offset attached
    fn chunk_with_metadata(&self, text: &str) -> Vec<Chunk>;

    /// The measure used for every size comparison
    fn measure(&self) -> &dyn LengthMeasure;

    /// Just the chunk texts
    fn chunk(&self, text: &str) -> Vec<String> {
        self.chunk_with_metadata(text)
            .into_iter()
            .map(|chunk| chunk.text)
            .collect()
    }
}

/// Which strategy a [`Chunker`] is built with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Split once on the first separator
    Character,
    /// Walk the separator tiers, recursing into oversized fragments
    #[default]
    Recursive,
}

/// A chunker selected at construction time
#[derive(Clone)]
pub enum Chunker {
    Character(CharacterChunker),
    Recursive(RecursiveChunker),
}

impl Chunker {
    pub fn new(strategy: ChunkStrategy, config: ChunkerConfig) -> Self {
        match strategy {
            ChunkStrategy::Character => Chunker::Character(CharacterChunker::new(config)),
            ChunkStrategy::Recursive => Chunker::Recursive(RecursiveChunker::new(config)),
        }
    }

    pub fn with_measure(
        strategy: ChunkStrategy,
        config: ChunkerConfig,
        measure: Arc<dyn LengthMeasure>,
    ) -> Self {
        match strategy {
            ChunkStrategy::Character => {
                Chunker::Character(CharacterChunker::with_measure(config, measure))
            }
            ChunkStrategy::Recursive => {
                Chunker::Recursive(RecursiveChunker::with_measure(config, measure))
            }
        }
    }

    pub fn strategy(&self) -> ChunkStrategy {
        match self {
            Chunker::Character(_) => ChunkStrategy::Character,
            Chunker::Recursive(_) => ChunkStrategy::Recursive,
        }
    }

    pub fn config(&self) -> &ChunkerConfig {
        match self {
            Chunker::Character(chunker) => chunker.config(),
            Chunker::Recursive(chunker) => chunker.config(),
        }
    }

    /// Chunk independent documents in parallel, keeping input order
    pub fn chunk_many<T>(&self, texts: &[T]) -> Vec<Vec<Chunk>>
    where
        T: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.chunk_with_metadata(text.as_ref()))
            .collect()
    }
}

impl TextChunker for Chunker {
    fn chunk_with_metadata(&self, text: &str) -> Vec<Chunk> {
        match self {
            Chunker::Character(chunker) => chunker.chunk_with_metadata(text),
            Chunker::Recursive(chunker) => chunker.chunk_with_metadata(text),
        }
    }

    fn measure(&self) -> &dyn LengthMeasure {
        match self {
            Chunker::Character(chunker) => chunker.measure(),
            Chunker::Recursive(chunker) => chunker.measure(),
        }
    }
}

/// Number the merged chunks and measure them
fn annotate(chunks: Vec<MergedChunk>, measure: &dyn LengthMeasure) -> Vec<Chunk> {
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| Chunk {
            metadata: ChunkMetadata {
                index,
                size: measure.size(&chunk.text),
                start_offset: chunk.start,
            },
            text: chunk.text,
        })
        .collect()
}
