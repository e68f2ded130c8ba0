use github_repo_search::error::{RepoSearchError, Result};
use github_repo_search::models::SearchResult;
use std::error::Error;

#[test]
fn test_error_display() {
    let error = RepoSearchError::RateLimitExceeded("API rate limit exhausted".to_string());
    assert_eq!(format!("{}", error), "Rate limit exceeded: API rate limit exhausted");

    let error = RepoSearchError::NotFound("no such repository".to_string());
    assert_eq!(format!("{}", error), "Resource not found: no such repository");

    let error = RepoSearchError::ApiError("API failed".to_string());
    assert_eq!(format!("{}", error), "GitHub API error: API failed");

    let error = RepoSearchError::InvalidRepoName("bad".to_string());
    assert_eq!(format!("{}", error), "Invalid repository name: bad");
}

#[test]
fn test_error_source() {
    let error = RepoSearchError::ApiError("API failed".to_string());
    assert!(error.source().is_none());
}

#[test]
fn test_decode_error_conversion() {
    // A failed decode converts into the crate error and keeps serde's
    // field-identifying message.
    let decode_failure = serde_json::from_str::<SearchResult>("{}").unwrap_err();
    let error: RepoSearchError = decode_failure.into();

    assert!(matches!(error, RepoSearchError::DecodeError(_)));
    let message = error.to_string();
    assert!(message.starts_with("Malformed response"));
    assert!(message.contains("`total_count`"), "got: {}", message);
}

#[test]
fn test_result_type() {
    fn returns_result() -> Result<String> {
        Ok("success".to_string())
    }

    let result = returns_result();
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), "success");

    fn returns_error() -> Result<String> {
        Err(RepoSearchError::NotFound("Not found".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
