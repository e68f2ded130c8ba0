use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "github-repo-search")]
#[command(about = "Search GitHub repositories and view repository details from the terminal")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub API token for authenticated requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search repositories matching a query
    Search {
        /// Search query, e.g. "http server language:rust"
        query: String,
    },
    /// Show the detail view of a single repository
    Show {
        /// Repository in owner/name format
        full_name: String,
    },
}
