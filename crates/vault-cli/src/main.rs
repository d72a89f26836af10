//! Memory Vault CLI - browse, tag and search memories from the terminal

mod cli;
mod commands;
mod error;
mod settings;

#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::albums::{run_album, run_albums};
use crate::commands::auth_cmd::{run_login, run_logout, run_status};
use crate::commands::browse::run_browse;
use crate::commands::config::run_config;
use crate::commands::dashboard::run_dashboard;
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditArgs};
use crate::commands::list::run_list;
use crate::commands::search::run_search;
use crate::commands::show::run_show;
use crate::error::CliError;
use crate::settings::AppContext;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        if error.is_unauthorized() {
            eprintln!("Your session is no longer accepted. Run `vault login` again.");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["vault_cli=info", "vault_core=info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ctx = AppContext::load(cli.config.as_deref(), cli.api_url.as_deref())?;

    match cli.command {
        Commands::Login { username, password } => run_login(&ctx, &username, &password).await?,
        Commands::Logout => run_logout(&ctx)?,
        Commands::Status => run_status(&ctx)?,
        Commands::List { json } => run_list(&ctx, json).await?,
        Commands::Albums { json } => run_albums(&ctx, json).await?,
        Commands::Album { label, json } => run_album(&ctx, &label, json).await?,
        Commands::Show { id, json } => run_show(&ctx, &id, json).await?,
        Commands::Add {
            title,
            content,
            tags,
            photo,
        } => run_add(&ctx, &title, &content, tags.as_deref(), photo.as_deref()).await?,
        Commands::Edit {
            id,
            title,
            content,
            tags,
            photo,
        } => {
            let args = EditArgs {
                title: title.as_deref(),
                content: content.as_deref(),
                tags: tags.as_deref(),
                photo: photo.as_deref(),
            };
            run_edit(&ctx, &id, &args).await?;
        }
        Commands::Delete { id } => run_delete(&ctx, &id).await?,
        Commands::Search { query, json } => run_search(&ctx, &query, json).await?,
        Commands::Dashboard { json } => run_dashboard(&ctx, json).await?,
        Commands::Browse => run_browse(&ctx).await?,
        Commands::Config { command } => run_config(&mut ctx, command)?,
    }

    Ok(())
}
