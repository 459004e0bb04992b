// GitHub API endpoint functions.
// Typed fetches for repository metadata, contributors, and README content.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::FetchError;

use super::client::{GitHubClient, RAW_MEDIA_TYPE};
use super::types::{Contributor, Readme, RepositoryInfo, RepositoryResponse};

const CONTRIBUTORS_PER_PAGE: &str = "100";

/// Parse a response body explicitly so shape mismatches surface as
/// [`FetchError::Json`] instead of a transport error.
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

impl GitHubClient {
    /// Get a specific repository.
    pub async fn get_repo(&self, owner: &str, repo: &str) -> Result<RepositoryInfo, FetchError> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo)).await?;
        let raw: RepositoryResponse = parse_json(response).await?;
        Ok(raw.into())
    }

    /// Get the first page of contributors, in upstream order.
    ///
    /// GitHub answers `204 No Content` for a repository without commits,
    /// which is an empty list.
    pub async fn get_contributors(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Contributor>, FetchError> {
        let params = [("per_page", CONTRIBUTORS_PER_PAGE)];
        let response = self
            .get_with(
                &format!("/repos/{}/{}/contributors", owner, repo),
                Some(&params[..]),
                None,
            )
            .await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        parse_json(response).await
    }

    /// Get the README as raw text.
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<Readme, FetchError> {
        let response = self
            .get_with(
                &format!("/repos/{}/{}/readme", owner, repo),
                None::<&[(&str, &str)]>,
                Some(RAW_MEDIA_TYPE),
            )
            .await?;
        let content = response.text().await?;
        Ok(Readme { content })
    }
}
