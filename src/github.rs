use crate::error::{RepoSearchError, Result};
use crate::models::{Repository, SearchResult};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const API_BASE_URL: &str = "https://api.github.com";
const PER_PAGE: u32 = 30;

pub struct GitHubClient {
    client: Client,
    token: Option<String>,
}

impl GitHubClient {
    /// Creates a client. A token is optional; unauthenticated requests get
    /// the lower anonymous rate limit.
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("github-repo-search/0.1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient { client, token })
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        debug!(url, "issuing GitHub API request");

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::NOT_FOUND => Err(RepoSearchError::NotFound(url.to_string())),
            StatusCode::FORBIDDEN => {
                let remaining = header_value::<u32>(&response, "X-RateLimit-Remaining");

                if remaining == Some(0) {
                    let reset = header_value::<i64>(&response, "X-RateLimit-Reset")
                        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

                    Err(RepoSearchError::RateLimitExceeded(match reset {
                        Some(reset) => format!("API rate limit exhausted. Resets at {}", reset),
                        None => "API rate limit exhausted".to_string(),
                    }))
                } else {
                    let error_text = response.text().await.unwrap_or_default();
                    Err(RepoSearchError::ApiError(format!("Forbidden: {}", error_text)))
                }
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(RepoSearchError::ApiError(
                    format!("API request failed with status {}: {}", status, error_text)
                ))
            }
        }
    }

    /// Fetches `url` and decodes the body, so decode failures carry
    /// serde's field and position information instead of a bare transport
    /// error.
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.make_request(url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Searches repositories matching `query`, best matches first.
    pub async fn search_repositories(&self, query: &str) -> Result<SearchResult> {
        let params = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .append_pair("per_page", &PER_PAGE.to_string())
            .finish();

        let url = format!("{}/search/repositories?{}", API_BASE_URL, params);
        self.fetch_json(&url).await
    }

    /// Fetches a single repository.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        let url = format!("{}/repos/{}/{}", API_BASE_URL, owner, repo);
        self.fetch_json(&url).await
    }

    /// Fetches a repository named in `owner/name` form.
    pub async fn get_repository_by_full_name(&self, full_name: &str) -> Result<Repository> {
        let parts: Vec<&str> = full_name.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(RepoSearchError::InvalidRepoName(
                format!("Expected owner/name format: {}", full_name)
            ));
        }

        self.get_repository(parts[0], parts[1]).await
    }
}

fn header_value<T: std::str::FromStr>(response: &Response, name: &str) -> Option<T> {
    response
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<T>().ok())
}
