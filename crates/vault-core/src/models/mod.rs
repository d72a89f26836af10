//! Data models for Memory Vault

mod album;
mod entry;
mod tag;
mod timestamp;

pub use album::{group_into_albums, group_into_albums_in, Album, UNDATED_ALBUM};
pub use entry::{Entry, EntryId, MediaKind};
pub use tag::Tag;
pub use timestamp::{parse_timestamp, parse_timestamp_in};
