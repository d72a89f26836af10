use vault_core::store::EntryStore;

use crate::commands::common::{normalize_search_query, print_entries};
use crate::error::CliError;
use crate::settings::AppContext;

pub async fn run_search(ctx: &AppContext, query: &str, as_json: bool) -> Result<(), CliError> {
    let normalized_query = normalize_search_query(query)?;
    let token = ctx.token()?;
    let user_id = ctx.user_id(&token)?;
    let client = ctx.client()?;

    let mut store = EntryStore::new();
    store
        .search(&client, &token, user_id, &normalized_query)
        .await?;

    print_entries(store.displayed(), as_json)
}
