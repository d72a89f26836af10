//! vault-core - Core library for Memory Vault
//!
//! This crate holds the models, API client, entry store, navigation state and
//! editing flows used by the `vault` command-line client.

pub mod api;
pub mod config;
pub mod error;
pub mod flows;
pub mod insights;
pub mod models;
pub mod navigator;
pub mod session;
pub mod store;
pub mod tags;
pub mod util;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{Error, Result};
pub use models::{Entry, EntryId};
