//! Month-based album grouping for gallery display.

use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use serde::Serialize;

use super::entry::Entry;

/// Label of the bucket holding entries whose creation time cannot be parsed.
pub const UNDATED_ALBUM: &str = "Undated";

/// Entries sharing a creation month, derived on demand from the entry list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Month and year label, e.g. `January 2024`
    pub name: String,
    /// Calendar date of the first entry in the album
    pub date: Option<NaiveDate>,
    /// Number of entries in the album
    pub photo_count: usize,
    /// Media of the first entry, used as the album cover
    pub cover_image: Option<String>,
    /// Entries in input order
    pub entries: Vec<Entry>,
    #[serde(skip)]
    last_date: Option<NaiveDate>,
}

impl Album {
    fn open(name: String, date: Option<NaiveDate>, first: &Entry) -> Self {
        Self {
            name,
            date,
            photo_count: 0,
            cover_image: first.media_url.clone(),
            entries: Vec::new(),
            last_date: date,
        }
    }

    fn push(&mut self, entry: &Entry, date: Option<NaiveDate>) {
        self.entries.push(entry.clone());
        self.photo_count = self.entries.len();
        self.last_date = date;
    }

    /// `Jan 5, 2024 - Jan 20, 2024`, spanning the first and last entry.
    pub fn date_range_label(&self) -> Option<String> {
        let first = self.date?;
        let last = self.last_date.unwrap_or(first);
        Some(format!("{} - {}", short_date(first), short_date(last)))
    }

    /// Distinct tag names in first-seen order, capped at `limit`.
    pub fn tag_names(&self, limit: usize) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for tag in self.entries.iter().flat_map(|entry| entry.tags.iter()) {
            if names.len() == limit {
                break;
            }
            if !names.contains(&tag.name) {
                names.push(tag.name.clone());
            }
        }
        names
    }
}

/// Group entries into albums by their local creation month.
pub fn group_into_albums(entries: &[Entry]) -> Vec<Album> {
    group_into_albums_in(entries, &Local)
}

/// Group entries into albums by creation month in `tz`.
///
/// Album order follows the first appearance of each month in `entries`, and
/// every entry lands in exactly one album.
pub fn group_into_albums_in<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> Vec<Album> {
    let mut albums: Vec<Album> = Vec::new();
    let mut index_by_month: HashMap<Option<(i32, u32)>, usize> = HashMap::new();

    for entry in entries {
        let date = entry.created_at_in(tz).map(|created| created.date_naive());
        let key = date.map(|date| (date.year(), date.month()));

        let index = *index_by_month.entry(key).or_insert_with(|| {
            albums.push(Album::open(month_label(date), date, entry));
            albums.len() - 1
        });
        albums[index].push(entry, date);
    }

    albums
}

fn month_label(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || UNDATED_ALBUM.to_string(),
        |date| date.format("%B %Y").to_string(),
    )
}

fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
