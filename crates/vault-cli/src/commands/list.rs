use vault_core::store::EntryStore;

use crate::commands::common::print_entries;
use crate::error::CliError;
use crate::settings::AppContext;

pub async fn run_list(ctx: &AppContext, as_json: bool) -> Result<(), CliError> {
    let token = ctx.token()?;
    let client = ctx.client()?;
    let mut store = EntryStore::new();
    store.fetch_all(&client, &token).await?;

    print_entries(store.displayed(), as_json)
}
