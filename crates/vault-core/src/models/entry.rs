//! Entry model

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::tag::Tag;
use super::timestamp::parse_timestamp_in;

/// Server-assigned numeric identifier of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// One memory record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique identifier
    pub id: EntryId,
    /// Short title
    #[serde(default)]
    pub title: String,
    /// Free text body
    #[serde(default)]
    pub content: String,
    /// Creation timestamp, as sent by the server
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp, as sent by the server
    #[serde(default)]
    pub updated_at: String,
    /// Mood label detected by the backend, if any
    #[serde(default)]
    pub ai_detected_mood: Option<String>,
    /// Location of the attached photo
    #[serde(default)]
    pub media_url: Option<String>,
    /// Kind of attached media (e.g. `IMAGE`)
    #[serde(default)]
    pub media_type: Option<String>,
    /// Associated tags; order carries no meaning
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Entry {
    /// Create a bare entry with the given identity and text
    #[must_use]
    pub fn new(
        id: impl Into<EntryId>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        let created_at = created_at.into();
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            updated_at: created_at.clone(),
            created_at,
            ai_detected_mood: None,
            media_url: None,
            media_type: None,
            tags: Vec::new(),
        }
    }

    /// Names of the attached tags as a set
    #[must_use]
    pub fn tag_names(&self) -> BTreeSet<String> {
        self.tags.iter().map(|tag| tag.name.clone()).collect()
    }

    /// Creation time converted into `tz`, when the server value parses
    pub fn created_at_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        parse_timestamp_in(&self.created_at, tz)
    }

    /// Whether a photo is attached
    #[must_use]
    pub fn has_media(&self) -> bool {
        self.media_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

/// Kind of media accepted by the upload endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    Image,
}

impl MediaKind {
    /// Wire value sent as the `mediaType` form field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
        }
    }
}
