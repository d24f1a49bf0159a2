mod separator;


pub use separator::Separator;

use serde::{Deserialize, Serialize};

/// A piece of the original text produced by one boundary split.
/// Always borrowed from the input, never copied.
pub type Fragment<'a> = &'a str;

/// Where matched separator text goes after a split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepSeparator {
    /// Drop the separator
    #[serde(rename = "none")]
    None,
    /// Append the separator to the fragment before it
    #[serde(rename = "end", alias = "attach_to_previous")]
    AttachToPrevious,
    /// Prepend the separator to the fragment after it
    #[default]
    #[serde(rename = "start", alias = "attach_to_next")]
    AttachToNext,
}

impl KeepSeparator {
    pub fn keeps(self) -> bool {
        !matches!(self, KeepSeparator::None)
    }
}

/// Byte offset of `fragment` within `source`.
///
/// `fragment` must be a slice of `source`, which every fragment produced by
/// [`split`] is.
pub(crate) fn offset_in(source: &str, fragment: &str) -> usize {
    let offset = (fragment.as_ptr() as usize).saturating_sub(source.as_ptr() as usize);
    debug_assert!(
        offset + fragment.len() <= source.len(),
        "fragment is not a slice of the source"
    );
    offset
}

/// Split `text` on every occurrence of `separator`.
///
/// An empty separator yields one fragment per character. Empty fragments are
/// never returned, so separators at the very start or end of the text do not
/// leave holes behind.
pub fn split<'a>(text: &'a str, separator: &Separator, keep: KeepSeparator) -> Vec<Fragment<'a>> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let matches = separator.find_all(text);
    let mut fragments = Vec::with_capacity(matches.len() + 1);
    let mut cursor = 0;

    // Each policy only differs in which end of a match becomes a cut point
    for (start, end) in matches {
        match keep {
            KeepSeparator::None => {
                fragments.push(&text[cursor..start]);
                cursor = end;
            }
            KeepSeparator::AttachToNext => {
                fragments.push(&text[cursor..start]);
                cursor = start;
            }
            KeepSeparator::AttachToPrevious => {
                fragments.push(&text[cursor..end]);
                cursor = end;
            }
        }
    }
    fragments.push(&text[cursor..]);

    fragments.retain(|fragment| !fragment.is_empty());
    fragments
}
