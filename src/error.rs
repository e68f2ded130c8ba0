use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoSearchError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid repository name: {0}")]
    InvalidRepoName(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RepoSearchError>;
