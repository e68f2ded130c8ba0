use crate::error::{RepoSearchError, Result};
use crate::github::GitHubClient;
use crate::models::{Repository, SearchResult};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Snapshot of the repository detail screen.
///
/// Idle: everything unset. Loading: `is_loading`. A settled load either
/// fills `repository` or fills `error`; a failed load clears any previous
/// repository rather than showing stale data next to an error.
#[derive(Debug, Clone, Default)]
pub struct RepositoryState {
    pub repository: Option<Repository>,
    pub is_loading: bool,
    pub error: Option<Arc<RepoSearchError>>,
}

/// Snapshot of the search screen, same lifecycle as [`RepositoryState`].
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub results: Option<SearchResult>,
    pub is_loading: bool,
    pub error: Option<Arc<RepoSearchError>>,
}

/// Fetches the one repository a detail view-model presents.
pub trait RepositoryLoader: Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = Result<Repository>> + Send;
}

/// Runs a repository search for a search view-model.
pub trait RepositorySearcher: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = Result<SearchResult>> + Send;
}

impl RepositorySearcher for GitHubClient {
    async fn search(&self, query: &str) -> Result<SearchResult> {
        self.search_repositories(query).await
    }
}

/// [`RepositoryLoader`] backed by the GitHub API, bound to one repository.
pub struct GitHubRepositoryLoader {
    client: GitHubClient,
    full_name: String,
}

impl GitHubRepositoryLoader {
    pub fn new(client: GitHubClient, full_name: impl Into<String>) -> Self {
        GitHubRepositoryLoader {
            client,
            full_name: full_name.into(),
        }
    }
}

impl RepositoryLoader for GitHubRepositoryLoader {
    async fn load(&self) -> Result<Repository> {
        self.client.get_repository_by_full_name(&self.full_name).await
    }
}

/// Observable surface a repository view binds to. Satisfied by the real
/// view-model and by test doubles alike.
pub trait RepositoryViewModel {
    /// Read-only handle on the state; updated on every transition.
    fn subscribe(&self) -> watch::Receiver<RepositoryState>;

    /// Requests a (re)load. Returns immediately; the outcome arrives
    /// through the subscription.
    fn load_repository(&self);
}

/// Owns the detail screen state and the load cycle that feeds it.
///
/// State is published through a `watch` channel, so a view observes exactly
/// the latest snapshot and a receiver dropped at teardown simply stops
/// observing. The in-flight load task is tied to this value's lifetime:
/// dropping the view-model aborts it, and a late completion is never
/// applied. A load issued while another is in flight aborts the older one.
pub struct RepositoryDetailViewModel<L: RepositoryLoader> {
    loader: Arc<L>,
    state_tx: Arc<watch::Sender<RepositoryState>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl<L: RepositoryLoader> RepositoryDetailViewModel<L> {
    pub fn new(loader: L) -> Self {
        let (state_tx, _) = watch::channel(RepositoryState::default());

        RepositoryDetailViewModel {
            loader: Arc::new(loader),
            state_tx: Arc::new(state_tx),
            in_flight: Mutex::new(None),
        }
    }

    /// The latest published snapshot.
    pub fn current(&self) -> RepositoryState {
        self.state_tx.borrow().clone()
    }
}

impl<L: RepositoryLoader> RepositoryViewModel for RepositoryDetailViewModel<L> {
    fn subscribe(&self) -> watch::Receiver<RepositoryState> {
        self.state_tx.subscribe()
    }

    fn load_repository(&self) {
        if let Some(previous) = self.in_flight.lock().unwrap().take() {
            debug!("superseding in-flight repository load");
            previous.abort();
        }

        // The previous repository stays visible while reloading; only a
        // settled failure clears it.
        let repository = self.state_tx.borrow().repository.clone();
        self.state_tx.send_replace(RepositoryState {
            repository,
            is_loading: true,
            error: None,
        });

        let loader = Arc::clone(&self.loader);
        let state_tx = Arc::clone(&self.state_tx);

        let handle = tokio::spawn(async move {
            match loader.load().await {
                Ok(repository) => {
                    debug!(repo_id = repository.id, "repository loaded");
                    state_tx.send_replace(RepositoryState {
                        repository: Some(repository),
                        is_loading: false,
                        error: None,
                    });
                }
                Err(error) => {
                    debug!(%error, "repository load failed");
                    state_tx.send_replace(RepositoryState {
                        repository: None,
                        is_loading: false,
                        error: Some(Arc::new(error)),
                    });
                }
            }
        });

        *self.in_flight.lock().unwrap() = Some(handle);
    }
}

impl<L: RepositoryLoader> Drop for RepositoryDetailViewModel<L> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.lock().unwrap().take() {
            task.abort();
        }
    }
}

/// Owns the search screen state; the same load cycle as the detail
/// view-model, parameterized by the query of each request.
pub struct SearchViewModel<S: RepositorySearcher> {
    searcher: Arc<S>,
    state_tx: Arc<watch::Sender<SearchState>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl<S: RepositorySearcher> SearchViewModel<S> {
    pub fn new(searcher: S) -> Self {
        let (state_tx, _) = watch::channel(SearchState::default());

        SearchViewModel {
            searcher: Arc::new(searcher),
            state_tx: Arc::new(state_tx),
            in_flight: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }

    /// The latest published snapshot.
    pub fn current(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    /// Requests a search. Returns immediately; the outcome arrives through
    /// the subscription. A search issued while another is in flight aborts
    /// the older one.
    pub fn search(&self, query: &str) {
        if let Some(previous) = self.in_flight.lock().unwrap().take() {
            debug!("superseding in-flight search");
            previous.abort();
        }

        let results = self.state_tx.borrow().results.clone();
        self.state_tx.send_replace(SearchState {
            results,
            is_loading: true,
            error: None,
        });

        let searcher = Arc::clone(&self.searcher);
        let state_tx = Arc::clone(&self.state_tx);
        let query = query.to_string();

        let handle = tokio::spawn(async move {
            match searcher.search(&query).await {
                Ok(results) => {
                    debug!(
                        total_count = results.total_count,
                        returned = results.repositories.len(),
                        "search completed"
                    );
                    state_tx.send_replace(SearchState {
                        results: Some(results),
                        is_loading: false,
                        error: None,
                    });
                }
                Err(error) => {
                    debug!(%error, "search failed");
                    state_tx.send_replace(SearchState {
                        results: None,
                        is_loading: false,
                        error: Some(Arc::new(error)),
                    });
                }
            }
        });

        *self.in_flight.lock().unwrap() = Some(handle);
    }
}

impl<S: RepositorySearcher> Drop for SearchViewModel<S> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.lock().unwrap().take() {
            task.abort();
        }
    }
}
