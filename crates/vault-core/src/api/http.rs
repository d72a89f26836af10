//! reqwest-backed client for the Memory Vault REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::{Credentials, EntriesPayload, EntryFields, MediaUpload, VaultApi};
use crate::insights::{Insight, MoodPoint};
use crate::models::{Entry, EntryId};
use crate::session::SessionToken;
use crate::util::{compact_text, normalize_base_url};
use crate::{Error, Result};

/// HTTP client for the Memory Vault server.
#[derive(Debug, Clone)]
pub struct HttpVaultClient {
    base_url: String,
    client: Client,
}

impl HttpVaultClient {
    /// Builds a client for an explicit API base URL.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref()).map_err(Error::Config)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    fn authorized(&self, request: RequestBuilder, token: &SessionToken) -> RequestBuilder {
        request
            .bearer_auth(token.as_str())
            .header("Accept", "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        tracing::debug!("{} -> {}", response.url().path(), response.status());
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: parse_api_error(status, &body),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    jwt: String,
}

#[async_trait]
impl VaultApi for HttpVaultClient {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        let request = self.client.post(self.url("/api/auth/login")).json(credentials);
        let payload = self.send(request).await?.json::<LoginResponse>().await?;
        let token = SessionToken::new(payload.jwt);
        if token.as_str().is_empty() {
            return Err(Error::Api {
                status: StatusCode::OK.as_u16(),
                message: "Login response did not include a token".to_string(),
            });
        }
        Ok(token)
    }

    async fn list_entries(&self, token: &SessionToken) -> Result<Vec<Entry>> {
        let request = self.authorized(self.client.get(self.url("/api/v1/entries")), token);
        let payload = self.send(request).await?.json::<EntriesPayload>().await?;
        Ok(payload.into_entries())
    }

    async fn get_entry(&self, token: &SessionToken, id: EntryId) -> Result<Entry> {
        let request = self.authorized(
            self.client.get(self.url(&format!("/api/v1/entries/{id}"))),
            token,
        );
        match self.send(request).await {
            Ok(response) => Ok(response.json::<Entry>().await?),
            Err(Error::Api { status: 404, .. }) => Err(Error::NotFound(id.to_string())),
            Err(error) => Err(error),
        }
    }

    async fn create_entry(
        &self,
        token: &SessionToken,
        user_id: u64,
        fields: &EntryFields,
    ) -> Result<Entry> {
        let request = self.authorized(
            self.client
                .post(self.url(&format!("/api/v1/entries/{user_id}")))
                .json(fields),
            token,
        );
        Ok(self.send(request).await?.json::<Entry>().await?)
    }

    async fn update_entry(
        &self,
        token: &SessionToken,
        id: EntryId,
        fields: &EntryFields,
    ) -> Result<()> {
        let request = self.authorized(
            self.client
                .put(self.url(&format!("/api/v1/entries/{id}")))
                .json(fields),
            token,
        );
        self.send(request).await?;
        Ok(())
    }

    async fn delete_entry(&self, token: &SessionToken, id: EntryId) -> Result<()> {
        let request = self.authorized(
            self.client.delete(self.url(&format!("/api/v1/entries/{id}"))),
            token,
        );
        self.send(request).await?;
        Ok(())
    }

    async fn upload_media(
        &self,
        token: &SessionToken,
        id: EntryId,
        upload: &MediaUpload,
    ) -> Result<()> {
        let file = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        let form = Form::new()
            .part("file", file)
            .text("mediaType", upload.kind.as_str());
        let request = self.authorized(
            self.client
                .post(self.url(&format!("/api/v1/entries/{id}/media")))
                .multipart(form),
            token,
        );
        self.send(request).await?;
        Ok(())
    }

    async fn add_tag(&self, token: &SessionToken, id: EntryId, name: &str) -> Result<()> {
        let request = self.authorized(
            self.client
                .post(self.url(&format!("/api/v1/entries/{id}/tags")))
                .json(&serde_json::json!({ "name": name })),
            token,
        );
        self.send(request).await?;
        Ok(())
    }

    async fn remove_tag(&self, token: &SessionToken, id: EntryId, name: &str) -> Result<()> {
        let encoded_name = urlencoding::encode(name);
        let request = self.authorized(
            self.client
                .delete(self.url(&format!("/api/v1/entries/{id}/tags/{encoded_name}"))),
            token,
        );
        self.send(request).await?;
        Ok(())
    }

    async fn search(&self, token: &SessionToken, user_id: u64, query: &str) -> Result<Vec<Entry>> {
        let request = self.authorized(
            self.client
                .get(self.url("/api/v1/search"))
                .query(&[("userId", user_id.to_string().as_str()), ("query", query)]),
            token,
        );
        let payload = self.send(request).await?.json::<Option<EntriesPayload>>().await?;
        Ok(payload.map(EntriesPayload::into_entries).unwrap_or_default())
    }

    async fn mood_history(&self, token: &SessionToken, user_id: u64) -> Result<Vec<MoodPoint>> {
        let request = self.authorized(
            self.client
                .get(self.url(&format!("/api/v1/entries/user/{user_id}/mood-history"))),
            token,
        );
        let payload = self.send(request).await?.json::<Option<Vec<MoodPoint>>>().await?;
        Ok(payload.unwrap_or_default())
    }

    async fn insight(&self, token: &SessionToken, user_id: u64) -> Result<Insight> {
        let request = self.authorized(
            self.client
                .get(self.url(&format!("/api/v1/users/{user_id}/insights"))),
            token,
        );
        Ok(self.send(request).await?.json::<Insight>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorResponse>(body) {
        if let Some(message) = payload
            .message
            .or(payload.error)
            .filter(|message| !message.trim().is_empty())
        {
            return compact_text(&message);
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed
    }
}
