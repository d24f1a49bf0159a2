#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use tracing::warn;

use crate::chunker::ChunkerConfig;
use crate::length::LengthMeasure;
use crate::splitter::offset_in;

/// A merged chunk and where it starts in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedChunk {
    pub text: String,
    /// Byte offset of the chunk's first character in the source
    pub start: usize,
}

/// Greedy sliding-window packer.
///
/// Fragments are appended to a window until the next one would push the
/// window past `chunk_size`. The window is then emitted as a chunk and
/// trimmed from the front until what is left fits inside `chunk_overlap`,
/// so the tail of one chunk opens the next.
pub struct ChunkMerger<'a> {
    chunk_size: usize,
    chunk_overlap: usize,
    strip_whitespace: bool,
    measure: &'a dyn LengthMeasure,
}

impl<'a> ChunkMerger<'a> {
    pub fn new(config: &ChunkerConfig, measure: &'a dyn LengthMeasure) -> Self {
        Self {
            chunk_size: config.chunk_size(),
            chunk_overlap: config.chunk_overlap(),
            strip_whitespace: config.strip_whitespace(),
            measure,
        }
    }

    /// Pack `fragments` into chunks, re-inserting `separator` between them.
    ///
    /// Every fragment must be a slice of `source`; chunk offsets are taken
    /// from the fragments themselves.
    pub fn merge(&self, source: &str, fragments: &[&str], separator: &str) -> Vec<MergedChunk> {
        let separator_len = self.measure.size(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for &fragment in fragments {
            let len = self.measure.size(fragment);

            // Size of the window if `fragment` were appended right now
            let grown = |window: &VecDeque<&str>, total: usize| {
                total + len + if window.is_empty() { 0 } else { separator_len }
            };

            if grown(&window, total) > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = self.flush(source, &window, separator, total) {
                    chunks.push(chunk);
                }

                while let Some(&front) = window.front() {
                    let over_overlap = total > self.chunk_overlap;
                    let still_overflows = grown(&window, total) > self.chunk_size && total > 0;
                    if !over_overlap && !still_overflows {
                        break;
                    }

                    let joint = if window.len() > 1 { separator_len } else { 0 };
                    total = total.saturating_sub(self.measure.size(front) + joint);
                    window.pop_front();
                }
            }

            total += len + if window.is_empty() { 0 } else { separator_len };
            window.push_back(fragment);
        }

        if let Some(chunk) = self.flush(source, &window, separator, total) {
            chunks.push(chunk);
        }

        chunks
    }

    /// Emit a fragment that could not be split any further
    pub(crate) fn oversized(&self, source: &str, fragment: &str) -> Option<MergedChunk> {
        let size = self.measure.size(fragment);
        if size > self.chunk_size {
            warn!(
                component = "recursive_chunker",
                chunk_size = self.chunk_size,
                actual = size,
                "emitting unsplittable fragment larger than the chunk size"
            );
        }
        let start = self.first_content(source, [fragment])?;
        self.finish(fragment.to_string(), start)
    }

    fn flush(
        &self,
        source: &str,
        window: &VecDeque<&str>,
        separator: &str,
        total: usize,
    ) -> Option<MergedChunk> {
        let front = *window.front()?;

        if total > self.chunk_size {
            warn!(
                component = "chunk_merger",
                chunk_size = self.chunk_size,
                actual = total,
                "created a chunk larger than the chunk size"
            );
        }

        let mut text = String::new();
        for (i, fragment) in window.iter().enumerate() {
            if i > 0 {
                text.push_str(separator);
            }
            text.push_str(fragment);
        }

        // whitespace-only fragments can still be joined by a visible separator,
        // which then sits right after the first fragment
        let start = self
            .first_content(source, window.iter().copied())
            .unwrap_or_else(|| offset_in(source, front) + front.len());
        self.finish(text, start)
    }

    /// Offset of the first character that survives stripping.
    ///
    /// `None` when nothing survives, in which case the chunk is dropped.
    fn first_content<'f>(
        &self,
        source: &str,
        fragments: impl IntoIterator<Item = &'f str>,
    ) -> Option<usize> {
        fragments.into_iter().find_map(|fragment| {
            let body = if self.strip_whitespace {
                fragment.trim_start()
            } else {
                fragment
            };
            (!body.is_empty()).then(|| offset_in(source, body))
        })
    }

    /// Apply whitespace stripping; empty chunks are dropped
    fn finish(&self, text: String, start: usize) -> Option<MergedChunk> {
        let text = if self.strip_whitespace {
            let trimmed = text.trim();
            if trimmed.len() == text.len() {
                text
            } else {
                trimmed.to_string()
            }
        } else {
            text
        };

        if text.is_empty() {
            None
        } else {
            Some(MergedChunk { text, start })
        }
    }
}
