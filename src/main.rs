use anyhow::Context;
use clap::Parser;
use colored::*;
use github_repo_search::cli::{Cli, Command};
use github_repo_search::github::GitHubClient;
use github_repo_search::view::{run_repository_view, run_search_view};
use github_repo_search::view_model::{
    GitHubRepositoryLoader, RepositoryDetailViewModel, SearchViewModel,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .init();

    let cli = Cli::parse();

    if cli.token.is_none() {
        println!("{}", "No GITHUB_TOKEN set; using anonymous rate limits".yellow());
    }

    let client = GitHubClient::new(cli.token.clone())
        .context("Failed to build GitHub client")?;

    let failed = match cli.command {
        Command::Search { query } => {
            println!("{}", "GitHub Repository Search".bold().green());
            println!("{}\n", "=".repeat(50).dimmed());

            let view_model = SearchViewModel::new(client);
            let state = run_search_view(&view_model, &query).await;
            state.error.is_some()
        }
        Command::Show { full_name } => {
            let loader = GitHubRepositoryLoader::new(client, full_name);
            let view_model = RepositoryDetailViewModel::new(loader);
            let state = run_repository_view(&view_model).await;
            state.error.is_some()
        }
    };

    if failed {
        // The view already displayed the error verbatim.
        std::process::exit(1);
    }

    Ok(())
}
