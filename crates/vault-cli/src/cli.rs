use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Browse, tag and search your memories from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API base URL override (e.g. <http://localhost:8080>)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show whether a session token is stored
    Status,
    /// List all memories
    #[command(alias = "feed")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Group memories into monthly albums
    Albums {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the memories of one album
    Album {
        /// Album name, e.g. "January 2024"
        label: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one memory
    Show {
        /// Memory ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new memory
    #[command(alias = "new")]
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
        /// Tags separated by commas or spaces
        #[arg(long)]
        tags: Option<String>,
        /// Image to attach
        #[arg(long, value_name = "PATH")]
        photo: Option<PathBuf>,
    },
    /// Edit an existing memory; omitted fields keep their value
    Edit {
        /// Memory ID
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
        /// Replacement tag list, separated by commas or spaces
        #[arg(long)]
        tags: Option<String>,
        /// Image replacing the current one
        #[arg(long, value_name = "PATH")]
        photo: Option<PathBuf>,
    },
    /// Delete a memory
    Delete {
        /// Memory ID
        id: String,
    },
    /// Search memories on the server
    Search {
        /// Search query
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show mood history and the latest insight
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse interactively
    Browse,
    /// Manage persistent settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Store the API base URL
    SetUrl {
        /// Base URL including http:// or https://
        url: String,
    },
    /// Store the user id used when the token carries none
    SetUserId {
        id: u64,
    },
}
