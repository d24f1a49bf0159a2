use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::chunker::{
    ChunkStrategy, Chunker, ChunkerConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
    DEFAULT_SEPARATORS,
};
use crate::error::ChunkError;
use crate::length::LengthUnit;
use crate::splitter::KeepSeparator;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid chunking settings: {0}")]
    Invalid(#[from] ChunkError),
}

/// Top-level settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub chunking: ChunkingSettings,
}

/// The `[chunking]` table. Missing keys fall back to library defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub strategy: ChunkStrategy,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub keep_separator: KeepSeparator,
    pub strip_whitespace: bool,
    pub separators: Vec<String>,
    pub is_pattern: bool,
    pub length_unit: LengthUnit,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            strategy: ChunkStrategy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            keep_separator: KeepSeparator::default(),
            strip_whitespace: true,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            is_pattern: false,
            length_unit: LengthUnit::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(toml_str)?;
        // surface bad sizes and patterns at load time, not on first use
        settings.chunking.config()?;
        Ok(settings)
    }

    /// Load settings from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Validate the chunking table and build the configured chunker
    pub fn build_chunker(&self) -> Result<Chunker, SettingsError> {
        let config = self.chunking.config()?;
        Ok(Chunker::with_measure(
            self.chunking.strategy,
            config,
            self.chunking.length_unit.measure(),
        ))
    }
}

impl ChunkingSettings {
    pub fn config(&self) -> Result<ChunkerConfig, ChunkError> {
        ChunkerConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .keep_separator(self.keep_separator)
            .strip_whitespace(self.strip_whitespace)
            .separators(self.separators.iter().cloned())
            .is_pattern(self.is_pattern)
            .build()
    }
}
