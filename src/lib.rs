// repo-stats library.
// Cached, failure-tolerant access to a GitHub repository's public stats.

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod github;
pub mod stats;

pub use config::Config;
pub use error::{Error, FetchError, Result};
pub use fallback::FallbackDataset;
pub use github::{AggregateStats, Contributor, GitHubClient, Readme, RepositoryInfo, Upstream};
pub use stats::RepoDataClient;
