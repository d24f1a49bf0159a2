use std::sync::Arc;
use tracing::debug;

use super::{annotate, Chunk, ChunkerConfig, TextChunker};
use crate::length::{CharCount, LengthMeasure};
use crate::merger::ChunkMerger;
use crate::splitter;

/// Splits once on the first configured separator and merges the pieces.
///
/// Fragments larger than the chunk size are never broken down further.
/// Separators are kept with the same policy as [`super::RecursiveChunker`],
/// so unlike some character splitters the trailing span is never repeated.
#[derive(Clone)]
pub struct CharacterChunker {
    config: ChunkerConfig,
    measure: Arc<dyn LengthMeasure>,
}

impl CharacterChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self::with_measure(config, Arc::new(CharCount))
    }

    pub fn with_measure(config: ChunkerConfig, measure: Arc<dyn LengthMeasure>) -> Self {
        Self { config, measure }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }
}

impl TextChunker for CharacterChunker {
    fn chunk_with_metadata(&self, text: &str) -> Vec<Chunk> {
        // a built config always has at least one tier
        let separator = &self.config.separators()[0];

        let keep = self.config.keep_separator();
        let fragments = splitter::split(text, separator, keep);
        let merge_separator = if keep.keeps() { "" } else { separator.as_str() };

        let merger = ChunkMerger::new(&self.config, &*self.measure);
        let chunks = merger.merge(text, &fragments, merge_separator);

        debug!(
            bytes = text.len(),
            fragments = fragments.len(),
            chunks = chunks.len(),
            "character chunking complete"
        );
        annotate(chunks, &*self.measure)
    }

    fn measure(&self) -> &dyn LengthMeasure {
        &*self.measure
    }
}
