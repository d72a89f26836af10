use std::io::Cursor;
use std::path::Path;

use pretty_assertions::assert_eq;
use vault_core::insights::{Dashboard, MoodPoint, MoodSample};
use vault_core::models::{group_into_albums, Tag};
use vault_core::navigator::Screen;
use vault_core::session::SessionToken;
use vault_core::testing::FakeApi;
use vault_core::{Entry, EntryId};

use crate::commands::browse::{parse_browse_command, BrowseCommand, Browser};
use crate::commands::common::{
    entry_preview, find_album, format_album_lines, format_dashboard, format_entry_detail,
    format_entry_lines, format_relative_time, normalize_search_query, parse_entry_id,
};
use crate::commands::edit::{build_edit_draft, EditArgs};
use crate::error::CliError;
use crate::settings::{session_path_for, AppContext};

fn sample_api() -> FakeApi {
    let api = FakeApi::with_entries(sample_entries());
    api.set_mood_history(vec![MoodPoint {
        date: "2024-01-05".to_string(),
        mood: "POSITIVE".to_string(),
    }]);
    api.set_insight("Mostly sunny.");
    api
}

fn sample_entries() -> Vec<Entry> {
    let mut beach = Entry::new(1_u64, "Beach day", "Sun and waves", "2024-01-15T10:00:00");
    beach.tags = vec![Tag::new(1, "family"), Tag::new(2, "work")];
    beach.media_url = Some("https://cdn.example.com/beach.jpg".to_string());
    let hike = Entry::new(2_u64, "Hike", "Windy ridge", "2024-01-20T08:30:00");
    let snow = Entry::new(3_u64, "Snow", "First snow", "2024-02-10T18:00:00");
    vec![beach, hike, snow]
}

async fn browse(api: &FakeApi, script: &str) -> (Screen, String, Vec<Entry>) {
    let mut browser = Browser::new(
        api,
        SessionToken::new("stub-token"),
        Some(5),
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
    );
    browser.run().await.unwrap();
    let screen = browser.navigator().screen().clone();
    let displayed = browser.store().displayed().to_vec();
    let output = String::from_utf8(browser.into_output()).unwrap();
    (screen, output, displayed)
}

#[test]
fn parse_entry_id_accepts_numbers_and_hash_prefix() {
    assert_eq!(parse_entry_id(" 42 ").unwrap(), EntryId::new(42));
    assert_eq!(parse_entry_id("#7").unwrap(), EntryId::new(7));
    assert!(matches!(parse_entry_id("  "), Err(CliError::EmptyEntryId)));
    assert!(matches!(
        parse_entry_id("abc"),
        Err(CliError::InvalidEntryId(_))
    ));
}

#[test]
fn normalize_search_query_rejects_empty() {
    assert!(normalize_search_query(" \n\t ").is_err());
    assert_eq!(
        normalize_search_query("  exact phrase  ").unwrap(),
        "exact phrase"
    );
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(
        format_relative_time(now - 3 * 24 * 60 * 60_000, now),
        "3d ago"
    );
}

#[test]
fn entry_preview_truncates_with_ellipsis() {
    let entry = Entry::new(
        1_u64,
        "This is a very long title that should be shortened",
        "",
        "2024-01-05",
    );
    assert_eq!(entry_preview(&entry, 20), "This is a very lo...");
}

#[test]
fn entry_preview_falls_back_to_content() {
    let entry = Entry::new(1_u64, " ", "first line\nsecond line", "2024-01-05");
    assert_eq!(entry_preview(&entry, 40), "first line");
}

#[test]
fn entry_lines_show_id_date_and_sorted_tags() {
    let lines = format_entry_lines(&sample_entries());
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1 "));
    assert!(lines[0].contains("Jan 15, 2024"));
    assert!(lines[0].contains("[photo]"));
    assert!(lines[0].ends_with("#family #work"));
    assert!(!lines[1].contains('#'));
}

#[test]
fn entry_detail_lists_fields_then_content() {
    let mut entry = sample_entries().remove(0);
    entry.ai_detected_mood = Some("POSITIVE".to_string());
    let lines = format_entry_detail(&entry);

    assert_eq!(lines[0], "#1  Beach day");
    assert!(lines.contains(&"Mood:  POSITIVE".to_string()));
    assert!(lines.contains(&"Tags:  #family #work".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("Sun and waves"));
}

#[test]
fn album_lines_number_albums_in_first_seen_order() {
    let albums = group_into_albums(&sample_entries());
    let lines = format_album_lines(&albums);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("  1. January 2024"));
    assert!(lines[0].contains("2 memories"));
    assert!(lines[1].contains("February 2024"));
    assert!(lines[1].contains("1 memory"));
}

#[test]
fn find_album_ignores_case() {
    let albums = group_into_albums(&sample_entries());
    assert_eq!(
        find_album(&albums, " february 2024 ").unwrap().photo_count,
        1
    );
    assert!(matches!(
        find_album(&albums, "March 2024"),
        Err(CliError::AlbumNotFound(_))
    ));
}

#[test]
fn dashboard_renders_bars_and_insight() {
    let dashboard = Dashboard {
        mood_history: vec![
            MoodSample {
                date: "2024-01-01".to_string(),
                value: 3,
            },
            MoodSample {
                date: "2024-01-02".to_string(),
                value: 0,
            },
        ],
        insight: "Keep walking.".to_string(),
    };

    let lines = format_dashboard(&dashboard);
    assert_eq!(lines[1], "  2024-01-01   ###  Positive");
    assert_eq!(lines[2], "  2024-01-02        Unknown");
    assert_eq!(lines.last().map(String::as_str), Some("  Keep walking."));
}

#[test]
fn browse_commands_parse_with_arguments() {
    assert_eq!(parse_browse_command("  ").unwrap(), None);
    assert_eq!(
        parse_browse_command("album January 2024").unwrap(),
        Some(BrowseCommand::Album("January 2024".to_string()))
    );
    assert_eq!(
        parse_browse_command("OPEN 3").unwrap(),
        Some(BrowseCommand::Open("3".to_string()))
    );
    assert_eq!(parse_browse_command("q").unwrap(), Some(BrowseCommand::Quit));
    assert!(parse_browse_command("search").is_err());
    assert!(parse_browse_command("dance").is_err());
}

#[test]
fn edit_draft_keeps_unspecified_fields() {
    let entry = sample_entries().remove(0);
    let args = EditArgs {
        title: Some("Beach evening"),
        ..EditArgs::default()
    };

    let draft = build_edit_draft(&entry, &args).unwrap();
    assert_eq!(draft.title, "Beach evening");
    assert_eq!(draft.content, "Sun and waves");
    assert_eq!(draft.tags, "family, work");
    assert!(draft.photo.is_none());
}

#[test]
fn edit_draft_requires_a_change() {
    let entry = sample_entries().remove(0);
    assert!(matches!(
        build_edit_draft(&entry, &EditArgs::default()),
        Err(CliError::NothingToEdit)
    ));
}

#[test]
fn session_file_sits_next_to_config() {
    assert_eq!(
        session_path_for(Path::new("/tmp/vault/config.json")),
        Path::new("/tmp/vault/session.json")
    );
}

#[test]
fn app_context_reads_settings_and_reports_missing_session() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{"version": 1, "api_base_url": "https://vault.example.com/", "request_timeout_secs": 5}"#,
    )
    .unwrap();

    let ctx = AppContext::load(Some(&config_path), Some("http://localhost:9090")).unwrap();
    let resolved = ctx.resolved().unwrap();

    assert_eq!(resolved.api_base_url, "http://localhost:9090");
    assert_eq!(resolved.request_timeout.as_secs(), 5);
    assert_eq!(ctx.tokens.path(), dir.path().join("session.json"));
    assert!(matches!(
        ctx.token(),
        Err(CliError::Core(vault_core::Error::NotAuthenticated))
    ));
}

#[test]
fn app_context_loads_with_bad_url_and_fails_only_on_client() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"version": 1, "user_id": 8}"#).unwrap();

    let mut ctx = AppContext::load(Some(&config_path), Some("ftp://not-http")).unwrap();
    assert_eq!(ctx.settings.user_id, Some(8));
    assert!(matches!(
        ctx.client(),
        Err(CliError::Core(vault_core::Error::Config(_)))
    ));

    ctx.settings.set_api_base_url("https://vault.example.com/").unwrap();
    ctx.save_settings().unwrap();
    let saved = std::fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("https://vault.example.com"));
}

#[test]
fn rejected_session_is_flagged_for_relogin() {
    let rejected = CliError::Core(vault_core::Error::Api {
        status: 401,
        message: "expired".to_string(),
    });
    let missing = CliError::Core(vault_core::Error::NotFound("4".to_string()));

    assert!(rejected.is_unauthorized());
    assert!(!missing.is_unauthorized());
    assert!(!CliError::EmptySearchQuery.is_unauthorized());
}

#[tokio::test]
async fn browse_walks_album_and_detail_with_back() {
    let api = sample_api();

    let (screen, output, _) = browse(&api, "album 1\nopen 2\nback\n").await;

    assert_eq!(screen, Screen::Album("January 2024".to_string()));
    assert!(output.contains("Memories (3)"));
    assert!(output.contains("#2  Hike"));
    assert!(output.contains("#family #work"));
}

#[tokio::test]
async fn browse_reports_illegal_transition_and_stays_put() {
    let api = sample_api();

    let (screen, output, _) = browse(&api, "edit\nquit\n").await;

    assert_eq!(screen, Screen::Feed);
    assert!(output.contains("Error: Cannot edit from the feed screen"));
}

#[tokio::test]
async fn browse_edit_saves_and_syncs_tags() {
    let api = sample_api();

    let (screen, output, displayed) = browse(
        &api,
        "open 1\nedit\nBeach evening\n\nfamily, vacation\n\nquit\n",
    )
    .await;

    assert_eq!(screen, Screen::Detail(EntryId::new(1)));
    assert!(output.contains("Saved memory #1"));
    assert_eq!(
        api.calls()[1..].to_vec(),
        vec![
            "update_entry:1".to_string(),
            "remove_tag:1:work".to_string(),
            "add_tag:1:vacation".to_string(),
            "get_entry:1".to_string(),
        ]
    );
    assert_eq!(displayed[0].title, "Beach evening");
    assert_eq!(displayed[0].content, "Sun and waves");
}

#[tokio::test]
async fn browse_add_creates_and_refetches() {
    let api = sample_api();

    let (screen, output, displayed) =
        browse(&api, "add\nPicnic\nBread and cheese\nfood\n\nquit\n").await;

    assert_eq!(screen, Screen::Feed);
    assert!(output.contains("Created memory #4"));
    assert_eq!(displayed.len(), 4);
    assert!(api.calls().contains(&"create_entry:5".to_string()));
    assert!(api.calls().contains(&"add_tag:4:food".to_string()));
}

#[tokio::test]
async fn browse_delete_requires_confirmation() {
    let api = sample_api();

    let (screen, output, displayed) = browse(&api, "open 3\ndelete\nn\ndelete\ny\n").await;

    assert_eq!(screen, Screen::Feed);
    assert!(output.contains("Kept."));
    assert!(output.contains("Deleted memory #3"));
    assert_eq!(displayed.len(), 2);
    assert_eq!(
        api.calls()
            .iter()
            .filter(|call| call.starts_with("delete_entry"))
            .count(),
        1
    );
}

#[tokio::test]
async fn browse_search_then_clear_restores_feed() {
    let api = sample_api();
    api.set_search_results(vec![sample_entries().remove(2)]);

    let (_, output, displayed) = browse(&api, "search snow\nclear\n").await;

    assert!(output.contains("Search results for 'snow' (1)"));
    assert_eq!(displayed.len(), 3);
    assert!(api.calls().contains(&"search:5:snow".to_string()));
    assert_eq!(
        api.calls()
            .iter()
            .filter(|call| *call == "list_entries")
            .count(),
        1
    );
}

#[tokio::test]
async fn browse_dashboard_overlays_and_back_hides_it() {
    let api = sample_api();

    let (screen, output, _) = browse(&api, "open 1\ndashboard\nback\n").await;

    assert_eq!(screen, Screen::Detail(EntryId::new(1)));
    assert!(output.contains("Mostly sunny."));
    assert!(output.contains("###  Positive"));
}

#[tokio::test]
async fn browse_refuses_hidden_screen_actions_under_dashboard() {
    let api = sample_api();

    let (screen, output, displayed) = browse(&api, "open 1\ndashboard\ndelete\ny\nedit\n").await;

    assert_eq!(screen, Screen::Detail(EntryId::new(1)));
    assert!(output.contains("Error: Close the dashboard with `back` first"));
    assert_eq!(displayed.len(), 3);
    assert_eq!(api.calls_to("delete_entry"), 0);
    assert_eq!(api.calls_to("update_entry"), 0);
}

#[tokio::test]
async fn browse_edit_dash_clears_all_tags() {
    let api = sample_api();

    let (_, output, displayed) = browse(&api, "open 1\nedit\n\n\n-\n\nquit\n").await;

    assert!(output.contains("Tags (- for none) [family, work]: "));
    assert_eq!(
        api.calls()[1..].to_vec(),
        vec![
            "update_entry:1".to_string(),
            "remove_tag:1:family".to_string(),
            "remove_tag:1:work".to_string(),
            "get_entry:1".to_string(),
        ]
    );
    assert!(displayed[0].tags.is_empty());
    assert_eq!(displayed[0].title, "Beach day");
}
