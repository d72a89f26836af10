use vault_core::session::{initial_view, login, logout, TopLevelView};

use crate::error::CliError;
use crate::settings::AppContext;

pub async fn run_login(ctx: &AppContext, username: &str, password: &str) -> Result<(), CliError> {
    let client = ctx.client()?;
    let token = login(&client, &ctx.tokens, username, password).await?;

    match token.user_id().or(ctx.resolved()?.user_id) {
        Some(user_id) => println!("Signed in as {} (user {user_id})", username.trim()),
        None => println!(
            "Signed in as {}. Set your user id with `vault config set-user-id`.",
            username.trim()
        ),
    }
    Ok(())
}

pub fn run_logout(ctx: &AppContext) -> Result<(), CliError> {
    logout(&ctx.tokens)?;
    println!("Signed out");
    Ok(())
}

pub fn run_status(ctx: &AppContext) -> Result<(), CliError> {
    match initial_view(&ctx.tokens)? {
        TopLevelView::Login => println!("Not signed in. Run `vault login` to continue."),
        TopLevelView::Main => match ctx.resolved() {
            Ok(resolved) => println!(
                "Signed in (session at {}, API {})",
                ctx.tokens.path().display(),
                resolved.api_base_url
            ),
            Err(error) => println!(
                "Signed in (session at {}). {error}",
                ctx.tokens.path().display()
            ),
        },
    }
    Ok(())
}
