use thiserror::Error;

/// Errors raised while building a chunker configuration.
///
/// Chunking itself never fails; every check happens once, up front.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("Chunk overlap {overlap} must be smaller than chunk size {size}")]
    OverlapTooLarge { overlap: usize, size: usize },

    #[error("At least one separator is required")]
    NoSeparators,

    #[error("Invalid separator pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
