use serde::{Deserialize, Serialize};
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Measures the "size" of a piece of text.
///
/// Every size comparison in the chunker goes through this trait, so chunk
/// budgets can be expressed in characters, bytes, tokens or anything else.
/// Implementations must be pure: the merger calls them repeatedly on the
/// same fragment.
pub trait LengthMeasure: Send + Sync {
    fn size(&self, text: &str) -> usize;
}

impl<F> LengthMeasure for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn size(&self, text: &str) -> usize {
        self(text)
    }
}

/// Unicode scalar values. The default measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCount;

impl LengthMeasure for CharCount {
    fn size(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// UTF-8 encoded length
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCount;

impl LengthMeasure for ByteCount {
    fn size(&self, text: &str) -> usize {
        text.len()
    }
}

/// Extended grapheme clusters (what a reader would call characters)
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemeCount;

impl LengthMeasure for GraphemeCount {
    fn size(&self, text: &str) -> usize {
        text.graphemes(true).count()
    }
}

/// Rough token estimate: ~4 bytes per token, rounded up.
///
/// Empty text measures zero so an empty join separator costs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEstimate;

impl LengthMeasure for TokenEstimate {
    fn size(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }
}

/// Serializable selector for the built-in measures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Chars,
    Bytes,
    Graphemes,
    Tokens,
}

impl LengthUnit {
    pub fn measure(self) -> Arc<dyn LengthMeasure> {
        match self {
            LengthUnit::Chars => Arc::new(CharCount),
            LengthUnit::Bytes => Arc::new(ByteCount),
            LengthUnit::Graphemes => Arc::new(GraphemeCount),
            LengthUnit::Tokens => Arc::new(TokenEstimate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_counts_codepoints() {
        assert_eq!(CharCount.size(""), 0);
        assert_eq!(CharCount.size("hello"), 5);
        assert_eq!(CharCount.size("héllo"), 5);
        assert_eq!(CharCount.size("日本語"), 3);
    }

    #[test]
    fn test_byte_count() {
        assert_eq!(ByteCount.size("héllo"), 6);
        assert_eq!(ByteCount.size("日本語"), 9);
    }

    #[test]
    fn test_grapheme_count_merges_combining_marks() {
        // "e" + combining acute accent is one grapheme but two codepoints
        let text = "e\u{301}";
        assert_eq!(CharCount.size(text), 2);
        assert_eq!(GraphemeCount.size(text), 1);
    }

    #[test]
    fn test_token_estimation() {
        assert_eq!(TokenEstimate.size(""), 0);
        assert_eq!(TokenEstimate.size("test"), 1);
        assert_eq!(TokenEstimate.size("test test"), 3);
        assert_eq!(TokenEstimate.size(&"x".repeat(8000)), 2000);
    }

    #[test]
    fn test_closure_measure() {
        let words = |text: &str| text.split_whitespace().count();
        assert_eq!(words.size("one two three"), 3);
    }

    #[test]
    fn test_length_unit_selects_measure() {
        let text = "e\u{301}x";
        assert_eq!(LengthUnit::Chars.measure().size(text), 3);
        assert_eq!(LengthUnit::Bytes.measure().size(text), 4);
        assert_eq!(LengthUnit::Graphemes.measure().size(text), 2);
        assert_eq!(LengthUnit::Tokens.measure().size(text), 1);
    }
}
