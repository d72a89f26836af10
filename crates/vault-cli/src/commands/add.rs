use std::path::Path;

use vault_core::api::MediaUpload;
use vault_core::flows::{create_memory, MemoryDraft};
use vault_core::store::EntryStore;

use crate::error::CliError;
use crate::settings::AppContext;

pub async fn run_add(
    ctx: &AppContext,
    title: &str,
    content: &str,
    tags: Option<&str>,
    photo: Option<&Path>,
) -> Result<(), CliError> {
    let mut draft = MemoryDraft::new(title, content).with_tags(tags.unwrap_or_default());
    if let Some(path) = photo {
        draft = draft.with_photo(MediaUpload::from_path(path)?);
    }

    let token = ctx.token()?;
    let user_id = ctx.user_id(&token)?;
    let client = ctx.client()?;

    let created = create_memory(&client, &token, user_id, &mut EntryStore::new(), &draft).await?;
    println!("{}", created.id);
    Ok(())
}
