// GitHub API module.
// Provides the HTTP client, the upstream trait, and REST API types.

pub mod client;
pub mod endpoints;
pub mod types;
pub mod upstream;

pub use client::GitHubClient;
pub use types::*;
pub use upstream::Upstream;
