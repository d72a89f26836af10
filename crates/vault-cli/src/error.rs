use std::io;

use thiserror::Error;
use vault_core::flows::FlowError;
use vault_core::navigator::NavigationError;
use vault_core::session::{LoginError, SessionError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vault_core::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error("{}", .0.user_message())]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Memory ID cannot be empty")]
    EmptyEntryId,
    #[error("Memory ID must be a number: {0}")]
    InvalidEntryId(String),
    #[error("No album named '{0}'")]
    AlbumNotFound(String),
    #[error("Nothing to change. Pass --title, --content, --tags or --photo.")]
    NothingToEdit,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Close the dashboard with `back` first")]
    DashboardOpen,
}

impl CliError {
    /// Whether the server rejected the stored session token.
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Core(error) => error.is_unauthorized(),
            Self::Flow(error) => error.source.is_unauthorized(),
            _ => false,
        }
    }
}
