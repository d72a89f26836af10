//! Tag input parsing and reconciliation.
//!
//! The edit form holds tags as free text. Saving compares the parsed names
//! with the entry's current tags and issues one add or remove request per
//! differing name.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::Tag;

/// Add/remove lists that turn one tag set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Names present in the new set only, sorted
    pub to_add: Vec<String>,
    /// Names present in the original set only, sorted
    pub to_remove: Vec<String>,
}

impl TagDiff {
    /// Compute `new - original` and `original - new`.
    pub fn between(original: &BTreeSet<String>, new: &BTreeSet<String>) -> Self {
        Self {
            to_add: new.difference(original).cloned().collect(),
            to_remove: original.difference(new).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Apply the diff to `original` as a set operation.
    pub fn apply(&self, original: &BTreeSet<String>) -> BTreeSet<String> {
        let mut result = original.clone();
        for name in &self.to_remove {
            result.remove(name);
        }
        result.extend(self.to_add.iter().cloned());
        result
    }
}

/// Split tag text on runs of whitespace and commas, dropping empty pieces.
///
/// # Examples
///
/// ```
/// use vault_core::tags::parse_tag_input;
///
/// let tags = parse_tag_input("family, vacation  beach,,");
/// assert_eq!(tags.len(), 3);
/// assert!(tags.contains("vacation"));
/// ```
pub fn parse_tag_input(text: &str) -> BTreeSet<String> {
    separator()
        .split(text)
        .filter(|piece| !piece.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Diff an entry's tags against edited tag text.
pub fn diff_tags(original: &[Tag], edited_text: &str) -> TagDiff {
    let original: BTreeSet<String> = original.iter().map(|tag| tag.name.clone()).collect();
    TagDiff::between(&original, &parse_tag_input(edited_text))
}

/// Render tags the way the edit form pre-fills them: `family, work`.
pub fn format_tag_input(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[\s,]+").expect("Invalid regex"))
}
