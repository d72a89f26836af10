//! Remote Memory Vault API.
//!
//! [`VaultApi`] is the seam between state orchestration and the network.
//! [`HttpVaultClient`] talks to the real server; tests substitute fakes.

mod http;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::insights::{Insight, MoodPoint};
use crate::models::{Entry, EntryId, MediaKind};
use crate::session::SessionToken;
use crate::{Error, Result};

pub use http::HttpVaultClient;

/// Login form payload
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Editable text fields of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFields {
    pub title: String,
    pub content: String,
}

/// File attached to an entry through the media endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub kind: MediaKind,
}

impl MediaUpload {
    /// Read an image from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Photo file is empty: {}",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self {
            content_type: guess_content_type(&file_name).to_string(),
            file_name,
            bytes,
            kind: MediaKind::Image,
        })
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Entries list body: either a bare array or a page wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EntriesPayload {
    List(Vec<Entry>),
    Page {
        #[serde(default)]
        content: Option<Vec<Entry>>,
    },
}

impl EntriesPayload {
    pub(crate) fn into_entries(self) -> Vec<Entry> {
        match self {
            Self::List(entries) => entries,
            Self::Page { content } => content.unwrap_or_default(),
        }
    }
}

/// Operations offered by the Memory Vault server.
#[async_trait]
pub trait VaultApi: Send + Sync {
    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken>;

    /// `GET /api/v1/entries`
    async fn list_entries(&self, token: &SessionToken) -> Result<Vec<Entry>>;

    /// `GET /api/v1/entries/{id}`
    async fn get_entry(&self, token: &SessionToken, id: EntryId) -> Result<Entry>;

    /// `POST /api/v1/entries/{userId}`
    async fn create_entry(
        &self,
        token: &SessionToken,
        user_id: u64,
        fields: &EntryFields,
    ) -> Result<Entry>;

    /// `PUT /api/v1/entries/{id}`
    async fn update_entry(
        &self,
        token: &SessionToken,
        id: EntryId,
        fields: &EntryFields,
    ) -> Result<()>;

    /// `DELETE /api/v1/entries/{id}`
    async fn delete_entry(&self, token: &SessionToken, id: EntryId) -> Result<()>;

    /// `POST /api/v1/entries/{id}/media`
    async fn upload_media(
        &self,
        token: &SessionToken,
        id: EntryId,
        upload: &MediaUpload,
    ) -> Result<()>;

    /// `POST /api/v1/entries/{id}/tags`
    async fn add_tag(&self, token: &SessionToken, id: EntryId, name: &str) -> Result<()>;

    /// `DELETE /api/v1/entries/{id}/tags/{name}`
    async fn remove_tag(&self, token: &SessionToken, id: EntryId, name: &str) -> Result<()>;

    /// `GET /api/v1/search?userId&query`
    async fn search(&self, token: &SessionToken, user_id: u64, query: &str) -> Result<Vec<Entry>>;

    /// `GET /api/v1/entries/user/{userId}/mood-history`
    async fn mood_history(&self, token: &SessionToken, user_id: u64) -> Result<Vec<MoodPoint>>;

    /// `GET /api/v1/users/{userId}/insights`
    async fn insight(&self, token: &SessionToken, user_id: u64) -> Result<Insight>;
}
