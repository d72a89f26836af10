//! Session token persistence and the login gate.
//!
//! The only authentication state the client tracks is an opaque bearer token
//! stored under a fixed key. Its presence decides whether the login view or
//! the main view is shown.

mod jwt;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{Credentials, VaultApi};

pub use jwt::decode_user_id;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "jwt_token";

/// Inline message shown for any failed sign-in.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password. Please try again.";

/// Opaque bearer credential
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric user id carried in the token payload, if any.
    pub fn user_id(&self) -> Option<u64> {
        decode_user_id(&self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("SessionToken")
            .field(&"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse session storage: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Session storage error: {0}")]
    Storage(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Persistent home of the session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> SessionResult<Option<SessionToken>>;
    fn save(&self, token: &SessionToken) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// Top-level view selected by the presence of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelView {
    Login,
    Main,
}

/// Decide between the login and main views. Never touches the network.
pub fn initial_view(store: &dyn TokenStore) -> SessionResult<TopLevelView> {
    Ok(if store.load()?.is_some() {
        TopLevelView::Main
    } else {
        TopLevelView::Login
    })
}

/// Load the stored token or report "not logged in".
pub fn require_token(store: &dyn TokenStore) -> crate::Result<SessionToken> {
    match store.load() {
        Ok(Some(token)) => Ok(token),
        Ok(None) => Err(crate::Error::NotAuthenticated),
        Err(error) => Err(crate::Error::Config(error.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Invalid username or password. Please try again.")]
    Rejected(#[source] crate::Error),
    #[error(transparent)]
    Storage(#[from] SessionError),
}

/// Authenticate and persist the returned token.
pub async fn login<A>(
    api: &A,
    store: &dyn TokenStore,
    username: &str,
    password: &str,
) -> Result<SessionToken, LoginError>
where
    A: VaultApi + ?Sized,
{
    if username.trim().is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    let credentials = Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    let token = api.login(&credentials).await.map_err(|error| {
        tracing::warn!("Login rejected: {}", error);
        LoginError::Rejected(error)
    })?;

    store.save(&token)?;
    tracing::info!("Signed in as {}", credentials.username);
    Ok(token)
}

/// Forget the stored token.
pub fn logout(store: &dyn TokenStore) -> SessionResult<()> {
    store.clear()?;
    tracing::info!("Signed out");
    Ok(())
}

/// Resolve the user id for user-scoped endpoints.
///
/// The token payload wins; the configured id is the fallback for tokens that
/// carry no numeric identity claim.
pub fn resolve_user_id(token: &SessionToken, configured: Option<u64>) -> crate::Result<u64> {
    token.user_id().or(configured).ok_or_else(|| {
        crate::Error::Config(
            "Could not derive a user id from the session token. Set one with `vault config set-user-id`."
                .to_string(),
        )
    })
}

/// Token store backed by a JSON key/value file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> SessionResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> SessionResult<()> {
        if map.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> SessionResult<Option<SessionToken>> {
        Ok(self
            .read_map()?
            .remove(TOKEN_KEY)
            .map(SessionToken::new)
            .filter(|token| !token.as_str().is_empty()))
    }

    fn save(&self, token: &SessionToken) -> SessionResult<()> {
        let mut map = self.read_map()?;
        map.insert(TOKEN_KEY.to_string(), token.as_str().to_string());
        self.write_map(&map)
    }

    fn clear(&self) -> SessionResult<()> {
        let mut map = self.read_map()?;
        if map.remove(TOKEN_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryTokenStore;

    #[test]
    fn token_debug_is_redacted() {
        let token = SessionToken::new("secret-token");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn gate_shows_login_without_token() {
        let store = MemoryTokenStore::default();
        assert_eq!(initial_view(&store).unwrap(), TopLevelView::Login);
    }

    #[test]
    fn gate_shows_main_with_token() {
        let store = MemoryTokenStore::with_token(SessionToken::new("abc"));
        assert_eq!(initial_view(&store).unwrap(), TopLevelView::Main);
    }

    #[test]
    fn require_token_reports_not_logged_in() {
        let store = MemoryTokenStore::default();
        assert!(matches!(
            require_token(&store),
            Err(crate::Error::NotAuthenticated)
        ));
    }

    #[test]
    fn file_store_roundtrip_uses_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileTokenStore::new(&path);

        assert!(store.load().unwrap().is_none());
        store.save(&SessionToken::new("abc.def.ghi")).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get(TOKEN_KEY).map(String::as_str), Some("abc.def.ghi"));
        assert_eq!(
            store.load().unwrap(),
            Some(SessionToken::new("abc.def.ghi"))
        );

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn file_store_clear_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"jwt_token": "t", "theme": "dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.clear().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains(TOKEN_KEY));
    }

    #[test]
    fn file_store_ignores_blank_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"jwt_token": "  "}"#).unwrap();
        assert!(FileTokenStore::new(&path).load().unwrap().is_none());
    }

    #[tokio::test]
    async fn login_persists_token() {
        let api = crate::testing::FakeApi::default();
        let store = MemoryTokenStore::default();

        let token = login(&api, &store, " ana ", "pw").await.unwrap();

        assert_eq!(token.as_str(), "token-for-ana");
        assert_eq!(store.load().unwrap(), Some(token));
        assert_eq!(initial_view(&store).unwrap(), TopLevelView::Main);
    }

    #[tokio::test]
    async fn rejected_login_uses_generic_message_and_stores_nothing() {
        let api = crate::testing::FakeApi::default();
        api.fail_on("login");
        let store = MemoryTokenStore::default();

        let error = login(&api, &store, "ana", "bad").await.unwrap_err();

        assert_eq!(error.to_string(), LOGIN_FAILED_MESSAGE);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_credentials_skip_the_network() {
        let api = crate::testing::FakeApi::default();
        let store = MemoryTokenStore::default();

        assert!(matches!(
            login(&api, &store, "  ", "pw").await,
            Err(LoginError::MissingCredentials)
        ));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn logout_clears_token() {
        let store = MemoryTokenStore::with_token(SessionToken::new("abc"));
        logout(&store).unwrap();
        assert_eq!(initial_view(&store).unwrap(), TopLevelView::Login);
    }

    #[test]
    fn resolve_user_id_falls_back_to_configured() {
        let opaque = SessionToken::new("opaque");
        assert_eq!(resolve_user_id(&opaque, Some(9)).unwrap(), 9);
        assert!(resolve_user_id(&opaque, None).is_err());
    }
}
