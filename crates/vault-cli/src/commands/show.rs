use vault_core::api::VaultApi;

use crate::commands::common::{format_entry_detail, parse_entry_id, print_lines};
use crate::error::CliError;
use crate::settings::AppContext;

pub async fn run_show(ctx: &AppContext, id: &str, as_json: bool) -> Result<(), CliError> {
    let id = parse_entry_id(id)?;
    let token = ctx.token()?;
    let entry = ctx.client()?.get_entry(&token, id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        print_lines(&format_entry_detail(&entry));
    }
    Ok(())
}
