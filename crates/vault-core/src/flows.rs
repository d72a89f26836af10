//! Multi-step create, update and delete of memories.
//!
//! Each flow is a fixed sequence of independent requests. A failing step
//! stops the sequence; effects of earlier steps stay on the server. The
//! caller gets one generic message while the error keeps the failed step for
//! logging.

use std::fmt;

use thiserror::Error;

use crate::api::{EntryFields, MediaUpload, VaultApi};
use crate::models::{Entry, EntryId};
use crate::session::SessionToken;
use crate::store::EntryStore;
use crate::tags::{diff_tags, format_tag_input, parse_tag_input};
use crate::Error;

const VALIDATION_MESSAGE: &str = "Title and content are required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Step at which a flow stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    Validate,
    SaveEntry,
    UploadMedia,
    RemoveTag(String),
    AddTag(String),
    Reload,
    DeleteEntry,
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validate => f.write_str("validation"),
            Self::SaveEntry => f.write_str("saving the entry"),
            Self::UploadMedia => f.write_str("uploading the photo"),
            Self::RemoveTag(name) => write!(f, "removing tag '{name}'"),
            Self::AddTag(name) => write!(f, "adding tag '{name}'"),
            Self::Reload => f.write_str("reloading the entry"),
            Self::DeleteEntry => f.write_str("deleting the entry"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Memory {kind} failed while {step}: {source}")]
pub struct FlowError {
    pub kind: FlowKind,
    pub step: FlowStep,
    #[source]
    pub source: Error,
}

impl FlowError {
    fn new(kind: FlowKind, step: FlowStep, source: Error) -> Self {
        if !matches!(step, FlowStep::Validate | FlowStep::SaveEntry | FlowStep::DeleteEntry) {
            tracing::warn!("Memory {} partially applied, stopped while {}: {}", kind, step, source);
        }
        Self { kind, step, source }
    }

    /// Message shown to the user, independent of the failed step.
    pub const fn user_message(&self) -> &'static str {
        match (&self.step, self.kind) {
            (FlowStep::Validate, _) => VALIDATION_MESSAGE,
            (_, FlowKind::Create) => "Failed to create memory. Please try again.",
            (_, FlowKind::Update) => "Failed to update memory. Please try again.",
            (_, FlowKind::Delete) => "Failed to delete memory. Please try again.",
        }
    }
}

/// Form contents of the add and edit screens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDraft {
    pub title: String,
    pub content: String,
    /// Free tag text, e.g. `family, beach`
    pub tags: String,
    /// Newly chosen photo; `None` keeps the current one
    pub photo: Option<MediaUpload>,
}

impl MemoryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    #[must_use]
    pub fn with_photo(mut self, photo: MediaUpload) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Edit form prefilled from an existing entry.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            content: entry.content.clone(),
            tags: format_tag_input(&entry.tags),
            photo: None,
        }
    }

    fn fields(&self) -> Result<EntryFields, Error> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(Error::InvalidInput(VALIDATION_MESSAGE.to_string()));
        }
        Ok(EntryFields {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// Create an entry, attach the photo, add each tag, then refetch the store.
///
/// A failing refetch does not fail the create; the store keeps its error
/// message instead.
pub async fn create_memory<A>(
    api: &A,
    token: &SessionToken,
    user_id: u64,
    store: &mut EntryStore,
    draft: &MemoryDraft,
) -> Result<Entry, FlowError>
where
    A: VaultApi + ?Sized,
{
    let fail = |step, source| FlowError::new(FlowKind::Create, step, source);

    let fields = draft.fields().map_err(|error| fail(FlowStep::Validate, error))?;
    let created = api
        .create_entry(token, user_id, &fields)
        .await
        .map_err(|error| fail(FlowStep::SaveEntry, error))?;
    let id = created.id;

    if let Some(photo) = &draft.photo {
        api.upload_media(token, id, photo)
            .await
            .map_err(|error| fail(FlowStep::UploadMedia, error))?;
    }

    for name in parse_tag_input(&draft.tags) {
        api.add_tag(token, id, &name)
            .await
            .map_err(|error| fail(FlowStep::AddTag(name.clone()), error))?;
    }

    tracing::info!("Created memory {}", id);
    if store.fetch_all(api, token).await.is_err() {
        return Ok(created);
    }
    Ok(store.find(id).cloned().unwrap_or(created))
}

/// Save edited fields, replace the photo, reconcile tags and reload.
///
/// Tag removals run before additions. The reloaded entry replaces the stored
/// one.
pub async fn update_memory<A>(
    api: &A,
    token: &SessionToken,
    store: &mut EntryStore,
    original: &Entry,
    draft: &MemoryDraft,
) -> Result<Entry, FlowError>
where
    A: VaultApi + ?Sized,
{
    let fail = |step, source| FlowError::new(FlowKind::Update, step, source);
    let id = original.id;

    let fields = draft.fields().map_err(|error| fail(FlowStep::Validate, error))?;
    api.update_entry(token, id, &fields)
        .await
        .map_err(|error| fail(FlowStep::SaveEntry, error))?;

    if let Some(photo) = &draft.photo {
        api.upload_media(token, id, photo)
            .await
            .map_err(|error| fail(FlowStep::UploadMedia, error))?;
    }

    let diff = diff_tags(&original.tags, &draft.tags);
    for name in diff.to_remove {
        api.remove_tag(token, id, &name)
            .await
            .map_err(|error| fail(FlowStep::RemoveTag(name.clone()), error))?;
    }
    for name in diff.to_add {
        api.add_tag(token, id, &name)
            .await
            .map_err(|error| fail(FlowStep::AddTag(name.clone()), error))?;
    }

    let fresh = api
        .get_entry(token, id)
        .await
        .map_err(|error| fail(FlowStep::Reload, error))?;
    store.apply_updated(fresh.clone());
    tracing::info!("Updated memory {}", id);
    Ok(fresh)
}

/// Delete an entry and drop it from the store.
pub async fn delete_memory<A>(
    api: &A,
    token: &SessionToken,
    store: &mut EntryStore,
    id: EntryId,
) -> Result<(), FlowError>
where
    A: VaultApi + ?Sized,
{
    api.delete_entry(token, id)
        .await
        .map_err(|error| FlowError::new(FlowKind::Delete, FlowStep::DeleteEntry, error))?;
    store.apply_deleted(id);
    tracing::info!("Deleted memory {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{MediaKind, Tag};
    use crate::testing::FakeApi;

    fn token() -> SessionToken {
        SessionToken::new("token")
    }

    fn photo() -> MediaUpload {
        MediaUpload {
            file_name: "beach.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![1, 2, 3],
            kind: MediaKind::Image,
        }
    }

    fn tagged_entry() -> Entry {
        let mut entry = Entry::new(7_u64, "Trip", "Sun", "2024-03-02T09:00:00");
        entry.tags = vec![Tag::new(1, "family"), Tag::new(2, "work")];
        entry
    }

    #[tokio::test]
    async fn create_runs_every_step_in_order() {
        let api = FakeApi::default();
        let mut store = EntryStore::new();
        let draft = MemoryDraft::new("Beach", "Waves")
            .with_tags("sun, sea")
            .with_photo(photo());

        let created = create_memory(&api, &token(), 42, &mut store, &draft)
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                "create_entry:42".to_string(),
                "upload_media:1:beach.jpg".to_string(),
                "add_tag:1:sea".to_string(),
                "add_tag:1:sun".to_string(),
                "list_entries".to_string(),
            ]
        );
        assert_eq!(created.title, "Beach");
        assert_eq!(created.tag_names().len(), 2);
        assert_eq!(store.entries().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_without_requests() {
        let api = FakeApi::default();
        let mut store = EntryStore::new();

        let error = create_memory(&api, &token(), 1, &mut store, &MemoryDraft::new("  ", "x"))
            .await
            .unwrap_err();

        assert_eq!(error.step, FlowStep::Validate);
        assert_eq!(error.user_message(), VALIDATION_MESSAGE);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn create_failure_skips_later_steps() {
        let api = FakeApi::default();
        api.fail_on("create_entry");
        let mut store = EntryStore::new();
        let draft = MemoryDraft::new("Beach", "Waves")
            .with_tags("sun")
            .with_photo(photo());

        let error = create_memory(&api, &token(), 1, &mut store, &draft)
            .await
            .unwrap_err();

        assert_eq!(error.kind, FlowKind::Create);
        assert_eq!(error.step, FlowStep::SaveEntry);
        assert_eq!(
            error.user_message(),
            "Failed to create memory. Please try again."
        );
        assert_eq!(api.calls(), vec!["create_entry:1".to_string()]);
    }

    #[tokio::test]
    async fn media_failure_keeps_created_entry() {
        let api = FakeApi::default();
        api.fail_on("upload_media");
        let mut store = EntryStore::new();
        let draft = MemoryDraft::new("Beach", "Waves")
            .with_tags("sun")
            .with_photo(photo());

        let error = create_memory(&api, &token(), 1, &mut store, &draft)
            .await
            .unwrap_err();

        assert_eq!(error.step, FlowStep::UploadMedia);
        assert_eq!(api.calls_to("add_tag"), 0);
        assert!(api.entry(1).is_some());
    }

    #[tokio::test]
    async fn create_survives_failed_refetch() {
        let api = FakeApi::default();
        api.fail_on("list_entries");
        let mut store = EntryStore::new();

        let created = create_memory(&api, &token(), 1, &mut store, &MemoryDraft::new("A", "B"))
            .await
            .unwrap();

        assert_eq!(created.id, EntryId::new(1));
        assert!(store.error().is_some());
    }

    #[tokio::test]
    async fn update_removes_then_adds_then_reloads() {
        let original = tagged_entry();
        let api = FakeApi::with_entries(vec![original.clone()]);
        let mut store = EntryStore::new();
        store.replace_all(vec![original.clone()]);
        let draft = MemoryDraft::new("Trip!", "Sun and sand").with_tags("family, vacation");

        let fresh = update_memory(&api, &token(), &mut store, &original, &draft)
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                "update_entry:7".to_string(),
                "remove_tag:7:work".to_string(),
                "add_tag:7:vacation".to_string(),
                "get_entry:7".to_string(),
            ]
        );
        assert_eq!(fresh.title, "Trip!");
        assert_eq!(
            fresh.tag_names().into_iter().collect::<Vec<_>>(),
            vec!["family".to_string(), "vacation".to_string()]
        );
        assert_eq!(store.entries()[0], fresh);
    }

    #[tokio::test]
    async fn update_with_unchanged_tags_sends_no_tag_requests() {
        let original = tagged_entry();
        let api = FakeApi::with_entries(vec![original.clone()]);
        let mut store = EntryStore::new();
        let draft = MemoryDraft::from_entry(&original);
        assert_eq!(draft.tags, "family, work");

        update_memory(&api, &token(), &mut store, &original, &draft)
            .await
            .unwrap();

        assert_eq!(api.calls_to("add_tag") + api.calls_to("remove_tag"), 0);
    }

    #[tokio::test]
    async fn update_tag_failure_keeps_earlier_effects() {
        let original = tagged_entry();
        let api = FakeApi::with_entries(vec![original.clone()]);
        api.fail_on("add_tag");
        let mut store = EntryStore::new();
        store.replace_all(vec![original.clone()]);
        let draft = MemoryDraft::new("Renamed", "Sun").with_tags("family vacation");

        let error = update_memory(&api, &token(), &mut store, &original, &draft)
            .await
            .unwrap_err();

        assert_eq!(error.step, FlowStep::AddTag("vacation".to_string()));
        assert_eq!(
            error.user_message(),
            "Failed to update memory. Please try again."
        );
        let server = api.entry(7).unwrap();
        assert_eq!(server.title, "Renamed");
        assert!(!server.tag_names().contains("work"));
        assert_eq!(api.calls_to("get_entry"), 0);
        assert_eq!(store.entries()[0].title, "Trip");
    }

    #[tokio::test]
    async fn delete_drops_entry_from_store() {
        let original = tagged_entry();
        let api = FakeApi::with_entries(vec![original.clone()]);
        let mut store = EntryStore::new();
        store.replace_all(vec![original]);

        delete_memory(&api, &token(), &mut store, EntryId::new(7))
            .await
            .unwrap();

        assert!(store.entries().is_empty());
        assert!(api.entry(7).is_none());
    }

    #[tokio::test]
    async fn delete_failure_keeps_entry() {
        let original = tagged_entry();
        let api = FakeApi::with_entries(vec![original.clone()]);
        api.fail_on("delete_entry");
        let mut store = EntryStore::new();
        store.replace_all(vec![original]);

        let error = delete_memory(&api, &token(), &mut store, EntryId::new(7))
            .await
            .unwrap_err();

        assert_eq!(
            error.user_message(),
            "Failed to delete memory. Please try again."
        );
        assert_eq!(store.entries().len(), 1);
    }
}
