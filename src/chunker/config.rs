use crate::error::ChunkError;
use crate::splitter::{KeepSeparator, Separator};

use super::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS};

/// Immutable chunking parameters, validated at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    chunk_size: usize,
    chunk_overlap: usize,
    keep_separator: KeepSeparator,
    strip_whitespace: bool,
    separators: Vec<Separator>,
}

impl ChunkerConfig {
    pub fn builder() -> ChunkerConfigBuilder {
        ChunkerConfigBuilder::new()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn keep_separator(&self) -> KeepSeparator {
        self.keep_separator
    }

    pub fn strip_whitespace(&self) -> bool {
        self.strip_whitespace
    }

    /// Separator tiers, highest priority first
    pub fn separators(&self) -> &[Separator] {
        &self.separators
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            keep_separator: KeepSeparator::default(),
            strip_whitespace: true,
            separators: DEFAULT_SEPARATORS
                .iter()
                .map(|s| Separator::literal(*s))
                .collect(),
        }
    }
}

/// Mutable builder for a [`ChunkerConfig`]
#[derive(Debug, Clone)]
pub struct ChunkerConfigBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    keep_separator: KeepSeparator,
    strip_whitespace: bool,
    separators: Vec<String>,
    is_pattern: bool,
}

impl ChunkerConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            keep_separator: KeepSeparator::default(),
            strip_whitespace: true,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            is_pattern: false,
        }
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    pub fn keep_separator(mut self, keep: KeepSeparator) -> Self {
        self.keep_separator = keep;
        self
    }

    pub fn strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    /// Replace the tier list with a single separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separators = vec![separator.into()];
        self
    }

    /// Replace the tier list, highest priority first
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Treat every separator as a regular expression
    pub fn is_pattern(mut self, is_pattern: bool) -> Self {
        self.is_pattern = is_pattern;
        self
    }

    /// Validate and build the immutable config
    pub fn build(self) -> Result<ChunkerConfig, ChunkError> {
        if self.chunk_size == 0 {
            return Err(ChunkError::ZeroChunkSize);
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                size: self.chunk_size,
            });
        }

        if self.separators.is_empty() {
            return Err(ChunkError::NoSeparators);
        }

        let is_pattern = self.is_pattern;
        let separators = self
            .separators
            .into_iter()
            .map(|s| {
                if is_pattern {
                    Separator::pattern(s)
                } else {
                    Ok(Separator::literal(s))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChunkerConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            keep_separator: self.keep_separator,
            strip_whitespace: self.strip_whitespace,
            separators,
        })
    }
}

impl Default for ChunkerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
