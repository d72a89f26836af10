//! In-memory entry collection with a search overlay.
//!
//! The displayed list is either the full fetched collection or the latest
//! search results, never a mix. Results live beside the base list, so
//! clearing a search restores the base list without a refetch.

use crate::api::VaultApi;
use crate::models::{group_into_albums, Album, Entry, EntryId};
use crate::session::SessionToken;
use crate::Result;

/// Active search and its server results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOverlay {
    pub query: String,
    pub results: Vec<Entry>,
}

/// Entry collection owned by the root view
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    search: Option<SearchOverlay>,
    error: Option<String>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last fetched collection, regardless of search mode.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// What the feed currently shows.
    pub fn displayed(&self) -> &[Entry] {
        self.search
            .as_ref()
            .map_or(self.entries.as_slice(), |overlay| overlay.results.as_slice())
    }

    pub fn search_overlay(&self) -> Option<&SearchOverlay> {
        self.search.as_ref()
    }

    pub const fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// User-visible message of the last failed fetch or search.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Look up an entry in the displayed list, then in the base list.
    pub fn find(&self, id: EntryId) -> Option<&Entry> {
        self.displayed()
            .iter()
            .chain(self.entries.iter())
            .find(|entry| entry.id == id)
    }

    /// Albums of the displayed list, recomputed on every call.
    pub fn albums(&self) -> Vec<Album> {
        group_into_albums(self.displayed())
    }

    /// Replace the base collection and leave search mode.
    #[cfg(test)]
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        self.search = None;
        self.error = None;
        self.entries = entries;
    }

    /// Refetch the complete collection.
    ///
    /// Search state is cleared up front. On failure the previous base list is
    /// kept and the error message is recorded.
    pub async fn fetch_all<A>(&mut self, api: &A, token: &SessionToken) -> Result<()>
    where
        A: VaultApi + ?Sized,
    {
        self.search = None;
        self.error = None;

        match api.list_entries(token).await {
            Ok(entries) => {
                tracing::debug!("Fetched {} entries", entries.len());
                self.entries = entries;
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Failed to fetch memories: {}", error);
                self.error = Some(format!("Failed to fetch memories: {error}"));
                Err(error)
            }
        }
    }

    /// Run a server search and show its results in place of the base list.
    ///
    /// Blank queries are ignored and return `Ok(false)`. On failure the
    /// displayed list is left as it was.
    pub async fn search<A>(
        &mut self,
        api: &A,
        token: &SessionToken,
        user_id: u64,
        query: &str,
    ) -> Result<bool>
    where
        A: VaultApi + ?Sized,
    {
        let query = query.trim();
        if query.is_empty() {
            return Ok(false);
        }
        self.error = None;

        match api.search(token, user_id, query).await {
            Ok(results) => {
                tracing::debug!("Search '{}' returned {} entries", query, results.len());
                self.search = Some(SearchOverlay {
                    query: query.to_string(),
                    results,
                });
                Ok(true)
            }
            Err(error) => {
                tracing::warn!("Search failed: {}", error);
                self.error = Some(format!("Search failed: {error}"));
                Err(error)
            }
        }
    }

    /// Leave search mode; the base list shows again as last fetched.
    pub fn clear_search(&mut self) {
        self.search = None;
    }

    /// Swap in a freshly saved entry wherever it is shown.
    pub fn apply_updated(&mut self, updated: Entry) {
        if let Some(overlay) = self.search.as_mut() {
            replace_by_id(&mut overlay.results, &updated);
        }
        replace_by_id(&mut self.entries, &updated);
    }

    /// Drop a deleted entry from every list.
    pub fn apply_deleted(&mut self, id: EntryId) {
        if let Some(overlay) = self.search.as_mut() {
            overlay.results.retain(|entry| entry.id != id);
        }
        self.entries.retain(|entry| entry.id != id);
    }
}

fn replace_by_id(entries: &mut [Entry], updated: &Entry) {
    for entry in entries.iter_mut().filter(|entry| entry.id == updated.id) {
        *entry = updated.clone();
    }
}
