use std::path::Path;

use vault_core::api::{MediaUpload, VaultApi};
use vault_core::flows::{update_memory, MemoryDraft};
use vault_core::store::EntryStore;
use vault_core::Entry;

use crate::commands::common::parse_entry_id;
use crate::error::CliError;
use crate::settings::AppContext;

/// Field overrides from the command line; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct EditArgs<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub tags: Option<&'a str>,
    pub photo: Option<&'a Path>,
}

impl EditArgs<'_> {
    const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.photo.is_none()
    }
}

pub fn build_edit_draft(current: &Entry, args: &EditArgs<'_>) -> Result<MemoryDraft, CliError> {
    if args.is_empty() {
        return Err(CliError::NothingToEdit);
    }

    let mut draft = MemoryDraft::from_entry(current);
    if let Some(title) = args.title {
        draft.title = title.to_string();
    }
    if let Some(content) = args.content {
        draft.content = content.to_string();
    }
    if let Some(tags) = args.tags {
        draft.tags = tags.to_string();
    }
    if let Some(path) = args.photo {
        draft.photo = Some(MediaUpload::from_path(path)?);
    }
    Ok(draft)
}

pub async fn run_edit(ctx: &AppContext, id: &str, args: &EditArgs<'_>) -> Result<(), CliError> {
    let id = parse_entry_id(id)?;
    if args.is_empty() {
        return Err(CliError::NothingToEdit);
    }
    let token = ctx.token()?;
    let client = ctx.client()?;

    let current = client.get_entry(&token, id).await?;
    let draft = build_edit_draft(&current, args)?;
    let updated = update_memory(&client, &token, &mut EntryStore::new(), &current, &draft).await?;
    println!("{}", updated.id);
    Ok(())
}
