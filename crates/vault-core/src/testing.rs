//! In-memory doubles for the API and the token store, shared by the
//! workspace's tests through the `test-support` feature.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{Credentials, EntryFields, MediaUpload, VaultApi};
use crate::insights::{Insight, MoodPoint};
use crate::models::{Entry, EntryId, Tag};
use crate::session::{SessionResult, SessionToken, TokenStore};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct FakeState {
    entries: Vec<Entry>,
    search_results: Vec<Entry>,
    mood_history: Vec<MoodPoint>,
    insight: Insight,
    failures: HashSet<String>,
    calls: Vec<String>,
    next_id: u64,
    next_tag_id: u64,
}

/// Server double that records calls and fails on request.
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let next_id = entries.iter().map(|entry| entry.id.get()).max().unwrap_or(0);
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.entries = entries;
            state.next_id = next_id;
        }
        api
    }

    pub fn fail_on(&self, operation: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation.to_string());
    }

    pub fn set_search_results(&self, results: Vec<Entry>) {
        self.state.lock().unwrap().search_results = results;
    }

    pub fn set_mood_history(&self, history: Vec<MoodPoint>) {
        self.state.lock().unwrap().mood_history = history;
    }

    pub fn set_insight(&self, text: &str) {
        self.state.lock().unwrap().insight = Insight {
            insight: text.to_string(),
        };
    }

    /// Every recorded call as `operation` or `operation:detail`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    pub fn entry(&self, id: u64) -> Option<Entry> {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .find(|entry| entry.id.get() == id)
            .cloned()
    }

    fn record(&self, operation: &str, detail: Option<String>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(match detail {
            Some(detail) => format!("{operation}:{detail}"),
            None => operation.to_string(),
        });
        if state.failures.contains(operation) {
            return Err(Error::Api {
                status: 500,
                message: format!("{operation} failed"),
            });
        }
        Ok(())
    }

    fn with_entry<T>(&self, id: EntryId, update: impl FnOnce(&mut Entry) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        state
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(update)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

#[async_trait]
impl VaultApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        self.record("login", Some(credentials.username.clone()))?;
        Ok(SessionToken::new(format!("token-for-{}", credentials.username)))
    }

    async fn list_entries(&self, _token: &SessionToken) -> Result<Vec<Entry>> {
        self.record("list_entries", None)?;
        Ok(self.state.lock().unwrap().entries.clone())
    }

    async fn get_entry(&self, _token: &SessionToken, id: EntryId) -> Result<Entry> {
        self.record("get_entry", Some(id.to_string()))?;
        self.with_entry(id, |entry| entry.clone())
    }

    async fn create_entry(
        &self,
        _token: &SessionToken,
        user_id: u64,
        fields: &EntryFields,
    ) -> Result<Entry> {
        self.record("create_entry", Some(user_id.to_string()))?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let entry = Entry::new(
            state.next_id,
            &fields.title,
            &fields.content,
            "2024-06-01T10:00:00",
        );
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        _token: &SessionToken,
        id: EntryId,
        fields: &EntryFields,
    ) -> Result<()> {
        self.record("update_entry", Some(id.to_string()))?;
        self.with_entry(id, |entry| {
            entry.title.clone_from(&fields.title);
            entry.content.clone_from(&fields.content);
        })
    }

    async fn delete_entry(&self, _token: &SessionToken, id: EntryId) -> Result<()> {
        self.record("delete_entry", Some(id.to_string()))?;
        self.state
            .lock()
            .unwrap()
            .entries
            .retain(|entry| entry.id != id);
        Ok(())
    }

    async fn upload_media(
        &self,
        _token: &SessionToken,
        id: EntryId,
        upload: &MediaUpload,
    ) -> Result<()> {
        self.record("upload_media", Some(format!("{id}:{}", upload.file_name)))?;
        self.with_entry(id, |entry| {
            entry.media_url = Some(format!("https://cdn.example.com/{}", upload.file_name));
            entry.media_type = Some(upload.kind.as_str().to_string());
        })
    }

    async fn add_tag(&self, _token: &SessionToken, id: EntryId, name: &str) -> Result<()> {
        self.record("add_tag", Some(format!("{id}:{name}")))?;
        let tag_id = {
            let mut state = self.state.lock().unwrap();
            state.next_tag_id += 1;
            state.next_tag_id
        };
        self.with_entry(id, |entry| entry.tags.push(Tag::new(tag_id, name)))
    }

    async fn remove_tag(&self, _token: &SessionToken, id: EntryId, name: &str) -> Result<()> {
        self.record("remove_tag", Some(format!("{id}:{name}")))?;
        self.with_entry(id, |entry| entry.tags.retain(|tag| tag.name != name))
    }

    async fn search(&self, _token: &SessionToken, user_id: u64, query: &str) -> Result<Vec<Entry>> {
        self.record("search", Some(format!("{user_id}:{query}")))?;
        Ok(self.state.lock().unwrap().search_results.clone())
    }

    async fn mood_history(&self, _token: &SessionToken, user_id: u64) -> Result<Vec<MoodPoint>> {
        self.record("mood_history", Some(user_id.to_string()))?;
        Ok(self.state.lock().unwrap().mood_history.clone())
    }

    async fn insight(&self, _token: &SessionToken, user_id: u64) -> Result<Insight> {
        self.record("insight", Some(user_id.to_string()))?;
        Ok(self.state.lock().unwrap().insight.clone())
    }
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> SessionResult<Option<SessionToken>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn save(&self, token: &SessionToken) -> SessionResult<()> {
        *self.token.lock().unwrap() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
