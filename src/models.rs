use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// Result of searching repositories through the GitHub REST API.
///
/// `repositories` holds the page of results the API returned and may be
/// shorter than `total_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total_count: u32,
    #[serde(rename = "items")]
    pub repositories: Vec<Repository>,
}

/// A GitHub repository within a `SearchResult`, or fetched on its own
/// from `/repos/{owner}/{name}`. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub language: Option<String>,
    pub owner: Owner,
    pub description: Option<String>,
    pub stargazers_count: u32,
    #[serde(default, deserialize_with = "lenient_url")]
    pub homepage: Option<Url>,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    #[serde(default)]
    pub watchers_count: Option<u32>,
}

/// The account owning a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub login: String,
    #[serde(default, deserialize_with = "lenient_url")]
    pub avatar_url: Option<Url>,
}

/// Decodes an optional URL field, degrading to `None` instead of failing.
///
/// GitHub payloads routinely carry `null`, empty strings, or otherwise
/// malformed values in `avatar_url` and `homepage`; none of those may sink
/// the whole decode.
fn lenient_url<'de, D>(deserializer: D) -> std::result::Result<Option<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| Url::parse(s).ok()))
}
