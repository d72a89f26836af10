use vault_core::config::DEFAULT_API_BASE_URL;

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::settings::AppContext;

pub fn run_config(ctx: &mut AppContext, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            println!("config file:     {}", ctx.config_path.display());
            println!("session file:    {}", ctx.tokens.path().display());
            match ctx.resolved() {
                Ok(resolved) => {
                    println!("api base url:    {}", resolved.api_base_url);
                    println!("user id:         {}", user_id_label(resolved.user_id));
                    println!(
                        "request timeout: {}s",
                        resolved.request_timeout.as_secs()
                    );
                }
                Err(error) => {
                    println!(
                        "api base url:    {}",
                        ctx.settings
                            .api_base_url
                            .as_deref()
                            .unwrap_or(DEFAULT_API_BASE_URL)
                    );
                    println!("user id:         {}", user_id_label(ctx.settings.user_id));
                    println!("warning: {error}");
                }
            }
            Ok(())
        }
        ConfigCommands::SetUrl { url } => {
            ctx.settings.set_api_base_url(&url)?;
            ctx.save_settings()?;
            println!(
                "Saved API base URL {} to {}",
                ctx.settings.api_base_url.as_deref().unwrap_or_default(),
                ctx.config_path.display()
            );
            Ok(())
        }
        ConfigCommands::SetUserId { id } => {
            ctx.settings.user_id = Some(id);
            ctx.save_settings()?;
            println!("Saved user id {id} to {}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn user_id_label(user_id: Option<u64>) -> String {
    user_id.map_or_else(|| "(from session token)".to_string(), |id| id.to_string())
}
