use chrono::{Local, Utc};
use serde::Serialize;
use vault_core::insights::{score_label, Dashboard};
use vault_core::models::Album;
use vault_core::{Entry, EntryId};

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: u64,
    pub title: String,
    pub preview: String,
    pub created_at: String,
    pub relative_time: String,
    pub mood: Option<String>,
    pub media_url: Option<String>,
    pub tags: Vec<String>,
}

pub fn entry_to_list_item(entry: &Entry) -> EntryListItem {
    EntryListItem {
        id: entry.id.get(),
        title: entry.title.clone(),
        preview: entry_preview(entry, 80),
        created_at: entry.created_at.clone(),
        relative_time: relative_time(entry),
        mood: entry.ai_detected_mood.clone(),
        media_url: entry.media_url.clone(),
        tags: entry.tag_names().into_iter().collect(),
    }
}

pub fn format_entry_lines(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let id = entry.id.to_string();
            let preview = entry_preview(entry, 40);
            let date = format_entry_date(entry);
            let tags = render_tags(entry);
            let photo = if entry.has_media() { "[photo]" } else { "" };

            if tags.is_empty() {
                format!("{id:<6}  {date:<12}  {preview:<40}  {photo}")
                    .trim_end()
                    .to_string()
            } else {
                format!("{id:<6}  {date:<12}  {preview:<40}  {photo:<7}  {tags}")
            }
        })
        .collect()
}

pub fn format_entry_detail(entry: &Entry) -> Vec<String> {
    let mut lines = vec![
        format!("#{}  {}", entry.id, entry.title),
        format!("Date:  {}", format_entry_timestamp(entry)),
    ];
    if let Some(mood) = entry.ai_detected_mood.as_deref() {
        lines.push(format!("Mood:  {mood}"));
    }
    if let Some(url) = entry.media_url.as_deref().filter(|_| entry.has_media()) {
        lines.push(format!("Photo: {url}"));
    }
    let tags = render_tags(entry);
    if !tags.is_empty() {
        lines.push(format!("Tags:  {tags}"));
    }
    lines.push(String::new());
    lines.extend(entry.content.lines().map(ToString::to_string));
    lines
}

pub fn format_album_lines(albums: &[Album]) -> Vec<String> {
    albums
        .iter()
        .enumerate()
        .map(|(index, album)| {
            let count = if album.photo_count == 1 {
                "1 memory".to_string()
            } else {
                format!("{} memories", album.photo_count)
            };
            let range = album.date_range_label().unwrap_or_default();
            format!("{:>3}. {:<16}  {count:<12}  {range}", index + 1, album.name)
                .trim_end()
                .to_string()
        })
        .collect()
}

pub fn format_album_header(album: &Album) -> Vec<String> {
    let mut lines = vec![album.name.clone()];
    if let Some(range) = album.date_range_label() {
        lines.push(range);
    }
    let chips = album.tag_names(4);
    if !chips.is_empty() {
        lines.push(
            chips
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    if let Some(cover) = album.cover_image.as_deref() {
        lines.push(format!("Cover: {cover}"));
    }
    lines
}

/// One bar per mood sample, then the insight text.
pub fn format_dashboard(dashboard: &Dashboard) -> Vec<String> {
    let mut lines = vec!["Mood history".to_string()];
    if dashboard.mood_history.is_empty() {
        lines.push("  (no moods detected yet)".to_string());
    }
    for sample in &dashboard.mood_history {
        let bar = "#".repeat(usize::from(sample.value));
        let label = score_label(sample.value).unwrap_or("Unknown");
        lines.push(format!("  {:<12} {bar:<3}  {label}", sample.date));
    }
    lines.push(String::new());
    lines.push("Insight".to_string());
    if dashboard.insight.trim().is_empty() {
        lines.push("  (no insight yet)".to_string());
    } else {
        lines.push(format!("  {}", dashboard.insight.trim()));
    }
    lines
}

/// Title, or the first content line for untitled entries.
pub fn entry_preview(entry: &Entry, max_chars: usize) -> String {
    let source = if entry.title.trim().is_empty() {
        entry.content.lines().next().unwrap_or("")
    } else {
        entry.title.as_str()
    };
    let collapsed = source.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn render_tags(entry: &Entry) -> String {
    entry
        .tag_names()
        .into_iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_entry_date(entry: &Entry) -> String {
    entry.created_at_in(&Local).map_or_else(
        || "undated".to_string(),
        |created| created.format("%b %-d, %Y").to_string(),
    )
}

fn format_entry_timestamp(entry: &Entry) -> String {
    entry.created_at_in(&Local).map_or_else(
        || entry.created_at.clone(),
        |created| created.format("%b %-d, %Y %H:%M").to_string(),
    )
}

fn relative_time(entry: &Entry) -> String {
    entry.created_at_in(&Utc).map_or_else(String::new, |created| {
        format_relative_time(created.timestamp_millis(), Utc::now().timestamp_millis())
    })
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_entry_id(id: &str) -> Result<EntryId, CliError> {
    let trimmed = id.trim().trim_start_matches('#');
    if trimmed.is_empty() {
        return Err(CliError::EmptyEntryId);
    }
    trimmed
        .parse::<EntryId>()
        .map_err(|_| CliError::InvalidEntryId(trimmed.to_string()))
}

/// Find an album by name, ignoring case and surrounding whitespace.
pub fn find_album<'a>(albums: &'a [Album], label: &str) -> Result<&'a Album, CliError> {
    let wanted = label.trim();
    albums
        .iter()
        .find(|album| album.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CliError::AlbumNotFound(wanted.to_string()))
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub fn print_entries(entries: &[Entry], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if entries.is_empty() {
        println!("No memories found.");
    } else {
        print_lines(&format_entry_lines(entries));
    }
    Ok(())
}
