// Upstream source abstraction.
// The data client reads through this trait so the transport can be swapped.

use async_trait::async_trait;

use crate::error::FetchError;

use super::client::GitHubClient;
use super::types::{Contributor, Readme, RepositoryInfo};

/// Read-only source of repository data for one configured repository.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch_repository(&self) -> Result<RepositoryInfo, FetchError>;

    async fn fetch_contributors(&self) -> Result<Vec<Contributor>, FetchError>;

    async fn fetch_readme(&self) -> Result<Readme, FetchError>;
}

#[async_trait]
impl Upstream for GitHubClient {
    async fn fetch_repository(&self) -> Result<RepositoryInfo, FetchError> {
        self.get_repo(self.owner(), self.repo()).await
    }

    async fn fetch_contributors(&self) -> Result<Vec<Contributor>, FetchError> {
        self.get_contributors(self.owner(), self.repo()).await
    }

    async fn fetch_readme(&self) -> Result<Readme, FetchError> {
        self.get_readme(self.owner(), self.repo()).await
    }
}
