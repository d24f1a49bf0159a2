use std::sync::Arc;
use tracing::debug;

use super::{annotate, Chunk, ChunkerConfig, TextChunker};
use crate::length::{CharCount, LengthMeasure};
use crate::merger::{ChunkMerger, MergedChunk};
use crate::splitter::{self, Separator};

/// Splits on the highest-priority separator present in the text, then
/// recurses into any fragment that is still too large using the remaining,
/// lower-priority separators.
#[derive(Clone)]
pub struct RecursiveChunker {
    config: ChunkerConfig,
    measure: Arc<dyn LengthMeasure>,
}

impl RecursiveChunker {
    /// Create a chunker that measures size in characters
    pub fn new(config: ChunkerConfig) -> Self {
        Self::with_measure(config, Arc::new(CharCount))
    }

    pub fn with_measure(config: ChunkerConfig, measure: Arc<dyn LengthMeasure>) -> Self {
        Self { config, measure }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// `text` is always a slice of `source`, the whole document
    fn split_recursive(
        &self,
        source: &str,
        text: &str,
        tiers: &[Separator],
        chunks: &mut Vec<MergedChunk>,
    ) {
        let Some((separator, next_tiers)) = select_tier(text, tiers) else {
            return;
        };

        let keep = self.config.keep_separator();
        let fragments = splitter::split(text, separator, keep);
        let merge_separator = if keep.keeps() { "" } else { separator.as_str() };
        let merger = ChunkMerger::new(&self.config, &*self.measure);

        let mut good: Vec<&str> = Vec::new();
        for fragment in fragments {
            if self.measure.size(fragment) < self.config.chunk_size() {
                good.push(fragment);
                continue;
            }

            if !good.is_empty() {
                chunks.extend(merger.merge(source, &good, merge_separator));
                good.clear();
            }

            if next_tiers.is_empty() {
                chunks.extend(merger.oversized(source, fragment));
            } else {
                self.split_recursive(source, fragment, next_tiers, chunks);
            }
        }

        if !good.is_empty() {
            chunks.extend(merger.merge(source, &good, merge_separator));
        }
    }
}

impl TextChunker for RecursiveChunker {
    fn chunk_with_metadata(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        self.split_recursive(text, text, self.config.separators(), &mut chunks);

        debug!(
            bytes = text.len(),
            chunks = chunks.len(),
            "recursive chunking complete"
        );
        annotate(chunks, &*self.measure)
    }

    fn measure(&self) -> &dyn LengthMeasure {
        &*self.measure
    }
}

/// Pick the first tier that occurs in `text`, along with the tiers left for
/// recursion. The empty tier always applies and ends the search; when nothing
/// matches the last tier is used with nothing left to recurse into.
fn select_tier<'t>(
    text: &str,
    tiers: &'t [Separator],
) -> Option<(&'t Separator, &'t [Separator])> {
    for (i, separator) in tiers.iter().enumerate() {
        if separator.is_empty() {
            return Some((separator, &[][..]));
        }
        if separator.occurs_in(text) {
            return Some((separator, &tiers[i + 1..]));
        }
    }

    tiers.last().map(|last| (last, &[][..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers(list: &[&str]) -> Vec<Separator> {
        list.iter().map(|s| Separator::literal(*s)).collect()
    }

    #[test]
    fn test_select_first_present_tier() {
        let tiers = tiers(&["\n\n", "\n", " ", ""]);
        let (separator, rest) = select_tier("a\nb c", &tiers).unwrap();
        assert_eq!(separator.as_str(), "\n");
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_select_empty_tier_leaves_nothing() {
        let tiers = tiers(&["\n\n", "", " "]);
        let (separator, rest) = select_tier("a b", &tiers).unwrap();
        assert!(separator.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_select_falls_back_to_last_tier() {
        let tiers = tiers(&["\n\n", "|"]);
        let (separator, rest) = select_tier("plain", &tiers).unwrap();
        assert_eq!(separator.as_str(), "|");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_select_without_tiers() {
        assert!(select_tier("text", &[]).is_none());
    }
}
