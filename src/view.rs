use crate::error::RepoSearchError;
use crate::models::{Repository, SearchResult};
use crate::view_model::{
    RepositoryState, RepositorySearcher, RepositoryViewModel, SearchState, SearchViewModel,
};
use colored::*;

/// Abbreviates a count the way the detail screen tags display it:
/// `982`, `1.2k`, `56.8k`, `5.4M`.
pub fn format_count(count: u32) -> String {
    if count >= 1_000_000 {
        format_scaled(count as f64 / 1_000_000.0, "M")
    } else if count >= 1_000 {
        format_scaled(count as f64 / 1_000.0, "k")
    } else {
        count.to_string()
    }
}

fn format_scaled(value: f64, suffix: &str) -> String {
    let formatted = format!("{:.1}", value);
    let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
    format!("{}{}", trimmed, suffix)
}

pub fn render_error(error: &RepoSearchError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

/// The populated detail screen: owner, title, description, links, and the
/// star/fork/watch/open-issue tags.
pub fn render_repository(repository: &Repository) {
    println!();
    println!("{}", repository.owner.login.dimmed());
    if let Some(avatar_url) = &repository.owner.avatar_url {
        println!("{}", avatar_url.as_str().dimmed());
    }
    println!();
    println!("{}", repository.name.bold());

    if let Some(description) = &repository.description {
        println!();
        println!("{}", description);
    }

    if let Some(homepage) = &repository.homepage {
        println!();
        println!("🔗 {}", homepage.as_str().underline());
    }

    println!();
    if let Some(language) = &repository.language {
        println!("{} {}", "Language:".dimmed(), language.cyan());
    }
    println!(
        "★ {} Star   ⑂ {} Fork",
        format_count(repository.stargazers_count).bold(),
        format_count(repository.forks_count).bold(),
    );

    let watch = repository
        .watchers_count
        .map(format_count)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "👁 {} Watch   ◦ {} Open Issues",
        watch.bold(),
        format_count(repository.open_issues_count).bold(),
    );
}

/// The populated search screen. `total_count` may exceed the rows shown.
pub fn render_search_results(results: &SearchResult) {
    println!(
        "Found {} repositories",
        format_count(results.total_count).bold().green()
    );
    if (results.repositories.len() as u32) < results.total_count {
        println!(
            "{}",
            format!("Showing the top {}", results.repositories.len()).dimmed()
        );
    }
    println!();

    for (rank, repository) in results.repositories.iter().enumerate() {
        println!(
            "{:>3}. {}  {}  {} {}",
            rank + 1,
            repository.full_name.bold(),
            repository.language.as_deref().unwrap_or("-").cyan(),
            "★".yellow(),
            format_count(repository.stargazers_count),
        );
        if let Some(description) = &repository.description {
            println!("     {}", description.dimmed());
        }
    }
}

/// Drives the detail screen: requests a load, re-renders on every state
/// change, and returns the settled state.
pub async fn run_repository_view(view_model: &impl RepositoryViewModel) -> RepositoryState {
    let mut state_rx = view_model.subscribe();
    view_model.load_repository();

    loop {
        let state = state_rx.borrow_and_update().clone();

        if let Some(error) = &state.error {
            render_error(error);
            return state;
        }
        if !state.is_loading {
            if let Some(repository) = &state.repository {
                render_repository(repository);
                return state;
            }
        } else {
            println!("{}", "Loading repository...".dimmed());
        }

        if state_rx.changed().await.is_err() {
            // View-model torn down; nothing further to observe.
            return state;
        }
    }
}

/// Drives the search screen the same way.
pub async fn run_search_view<S: RepositorySearcher>(
    view_model: &SearchViewModel<S>,
    query: &str,
) -> SearchState {
    let mut state_rx = view_model.subscribe();
    view_model.search(query);

    loop {
        let state = state_rx.borrow_and_update().clone();

        if let Some(error) = &state.error {
            render_error(error);
            return state;
        }
        if !state.is_loading {
            if let Some(results) = &state.results {
                render_search_results(results);
                return state;
            }
        } else {
            println!("{}", "Searching...".dimmed());
        }

        if state_rx.changed().await.is_err() {
            return state;
        }
    }
}
