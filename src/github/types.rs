// GitHub API response types.
// Wire shapes for the REST API plus the snapshots handed to callers.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Owning account as embedded in a repository payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OwnerRef {
    pub login: String,
}

/// Raw `/repos/{owner}/{repo}` payload. Only the fields we keep are declared;
/// a missing required field fails the parse.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepositoryResponse {
    pub name: String,
    pub owner: OwnerRef,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Repository metadata snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub language: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub topics: BTreeSet<String>,
}

impl From<RepositoryResponse> for RepositoryInfo {
    fn from(raw: RepositoryResponse) -> Self {
        Self {
            name: raw.name,
            owner: raw.owner.login,
            description: raw.description,
            html_url: raw.html_url,
            stargazers_count: raw.stargazers_count,
            forks_count: raw.forks_count,
            open_issues_count: raw.open_issues_count,
            language: raw.language,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            topics: raw.topics.into_iter().collect(),
        }
    }
}

/// A contributor as listed by `/repos/{owner}/{repo}/contributors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub contributions: u64,
}

/// Headline numbers derived from a repository snapshot and its contributors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub stars: u64,
    pub forks: u64,
    pub contributors: u64,
    pub commits: u64,
    pub issues: u64,
}

impl AggregateStats {
    /// Combine repository counters with the contributor list.
    ///
    /// `commits` is the sum of every contributor's contribution count.
    pub fn from_parts(repo: &RepositoryInfo, contributors: &[Contributor]) -> Self {
        Self {
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            contributors: contributors.len() as u64,
            commits: contributors
                .iter()
                .fold(0u64, |acc, c| acc.saturating_add(c.contributions)),
            issues: repo.open_issues_count,
        }
    }
}

/// Raw README text for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readme {
    pub content: String,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
