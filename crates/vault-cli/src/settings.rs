//! Settings and session file locations for the CLI.

use std::path::{Path, PathBuf};

use vault_core::api::HttpVaultClient;
use vault_core::config::{ClientConfig, ResolvedConfig};
use vault_core::session::{require_token, resolve_user_id, FileTokenStore, SessionToken};

use crate::error::CliError;

const APP_DIR_NAME: &str = "memory-vault";
const CONFIG_FILE_NAME: &str = "config.json";
const SESSION_FILE_NAME: &str = "session.json";

pub fn app_config_dir() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve the user config directory".to_string()))
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    Ok(app_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Session file next to the settings file, so `--config` relocates both.
pub fn session_path_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map_or_else(|| PathBuf::from(SESSION_FILE_NAME), |dir| dir.join(SESSION_FILE_NAME))
}

/// Everything a command needs to reach the server
#[derive(Debug)]
pub struct AppContext {
    pub config_path: PathBuf,
    pub settings: ClientConfig,
    pub tokens: FileTokenStore,
    api_url_flag: Option<String>,
}

impl AppContext {
    pub fn load(config_flag: Option<&Path>, api_url_flag: Option<&str>) -> Result<Self, CliError> {
        let config_path = match config_flag {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        let settings = ClientConfig::load_from_path(&config_path)?;
        let tokens = FileTokenStore::new(session_path_for(&config_path));

        Ok(Self {
            config_path,
            settings,
            tokens,
            api_url_flag: api_url_flag.map(ToString::to_string),
        })
    }

    /// Flag, environment and file merged. Only commands that talk to the
    /// server fail on a bad value, so `config` can still repair it.
    pub fn resolved(&self) -> Result<ResolvedConfig, CliError> {
        Ok(self.settings.resolve(self.api_url_flag.as_deref())?)
    }

    pub fn client(&self) -> Result<HttpVaultClient, CliError> {
        let resolved = self.resolved()?;
        tracing::debug!(
            "Using {} with session file {}",
            resolved.api_base_url,
            self.tokens.path().display()
        );
        Ok(HttpVaultClient::new(
            &resolved.api_base_url,
            resolved.request_timeout,
        )?)
    }

    /// Stored token; fails before any request when nobody is signed in.
    pub fn token(&self) -> Result<SessionToken, CliError> {
        Ok(require_token(&self.tokens)?)
    }

    pub fn user_id(&self, token: &SessionToken) -> Result<u64, CliError> {
        Ok(resolve_user_id(token, self.resolved()?.user_id)?)
    }

    pub fn save_settings(&self) -> Result<(), CliError> {
        self.settings.save_to_path(&self.config_path)?;
        Ok(())
    }
}
