use vault_core::insights::load_dashboard;

use crate::commands::common::{format_dashboard, print_lines};
use crate::error::CliError;
use crate::settings::AppContext;

pub async fn run_dashboard(ctx: &AppContext, as_json: bool) -> Result<(), CliError> {
    let token = ctx.token()?;
    let user_id = ctx.user_id(&token)?;
    let dashboard = load_dashboard(&ctx.client()?, &token, user_id).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print_lines(&format_dashboard(&dashboard));
    }
    Ok(())
}
