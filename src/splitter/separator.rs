use regex::Regex;

use crate::error::ChunkError;

/// One separator tier: either a literal string or a compiled pattern.
///
/// The empty separator is the character-level fallback and always applies.
#[derive(Debug, Clone)]
pub struct Separator {
    text: String,
    pattern: Option<Regex>,
}

impl Separator {
    /// Literal separator matched by plain substring search
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pattern: None,
        }
    }

    /// Regular-expression separator, compiled once here
    pub fn pattern(text: impl Into<String>) -> Result<Self, ChunkError> {
        let text = text.into();
        if text.is_empty() {
            return Ok(Self::literal(text));
        }

        let regex = Regex::new(&text).map_err(|source| ChunkError::InvalidPattern {
            pattern: text.clone(),
            source,
        })?;

        Ok(Self {
            text,
            pattern: Some(regex),
        })
    }

    /// The separator as declared (pattern source for patterns)
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// Whether this tier can split `text` at all
    pub fn occurs_in(&self, text: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        match &self.pattern {
            Some(regex) => regex.is_match(text),
            None => text.contains(self.text.as_str()),
        }
    }

    /// Byte ranges of every non-overlapping, leftmost-first occurrence
    pub(crate) fn find_all(&self, text: &str) -> Vec<(usize, usize)> {
        match &self.pattern {
            Some(regex) => regex.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            None => text
                .match_indices(self.text.as_str())
                .map(|(start, matched)| (start, start + matched.len()))
                .collect(),
        }
    }
}

impl PartialEq for Separator {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.is_pattern() == other.is_pattern()
    }
}

impl Eq for Separator {}
