//! Tag model

use serde::{Deserialize, Serialize};

/// A tag attached to an entry
///
/// Names are case-sensitive and unique per entry; edits are reconciled by
/// name, never by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Server-assigned identifier
    #[serde(default)]
    pub id: u64,
    /// Tag name, stored as typed
    pub name: String,
}

impl Tag {
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_keeps_case() {
        let tag = Tag::new(1, "Family");
        assert_eq!(tag.name, "Family");
    }

    #[test]
    fn tag_id_defaults_when_absent() {
        let tag: Tag = serde_json::from_str(r#"{"name": "work"}"#).unwrap();
        assert_eq!(tag.id, 0);
    }
}
