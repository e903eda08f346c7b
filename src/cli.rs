use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slarc")]
#[command(about = "Import Slack export archives into a local, queryable store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colorized output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (human, json, yaml)
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the store database path
    #[arg(long, global = true, env = "SLARC_DB_PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a Slack export zip archive
    Import {
        /// Path to the export zip
        archive: PathBuf,

        /// Bearer token for authenticated asset fetches (routed through the
        /// proxy so the credential never hits the origin host directly)
        #[arg(long, env = "SLACK_TOKEN")]
        token: Option<String>,

        /// Asset proxy endpoint, used only when a token is configured
        #[arg(long, env = "SLARC_PROXY_URL", default_value = "http://localhost:3000/api/proxy")]
        proxy_url: String,

        /// Skip the asset-caching phase entirely
        #[arg(long)]
        skip_assets: bool,
    },
    /// Workspace commands
    Workspaces {
        #[command(subcommand)]
        command: WorkspacesCommands,
    },
    /// List channels in a workspace
    Channels {
        /// Workspace id (see `workspaces list`)
        #[arg(long)]
        workspace: i32,
    },
    /// List users in a workspace
    Users {
        #[arg(long)]
        workspace: i32,

        /// Include deactivated users
        #[arg(long)]
        include_deleted: bool,
    },
    /// Show a channel's messages, ordered by timestamp
    Messages {
        #[arg(long)]
        workspace: i32,

        /// Channel name (without the # prefix)
        #[arg(long)]
        channel: String,

        /// Maximum number of messages to show
        #[arg(long)]
        limit: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum WorkspacesCommands {
    /// List imported workspaces
    List,
    /// Delete a workspace and everything it owns
    Delete {
        /// Workspace id
        id: i32,
    },
}
