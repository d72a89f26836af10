use vault_core::flows::delete_memory;
use vault_core::store::EntryStore;

use crate::commands::common::parse_entry_id;
use crate::error::CliError;
use crate::settings::AppContext;

pub async fn run_delete(ctx: &AppContext, id: &str) -> Result<(), CliError> {
    let id = parse_entry_id(id)?;
    let token = ctx.token()?;
    let client = ctx.client()?;

    delete_memory(&client, &token, &mut EntryStore::new(), id).await?;
    println!("{id}");
    Ok(())
}
