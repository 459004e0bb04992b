// GitHub API HTTP client.
// Handles authentication, timeouts, rate limit tracking, and status checking.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, FetchError};

use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";
pub(crate) const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
pub(crate) const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

/// GitHub API client bound to one repository.
pub struct GitHubClient {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client from configuration. The token is optional; public
    /// repositories can be read anonymously at a lower rate limit.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| Error::Config(format!("invalid token: {e}")))?,
            );
        }
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Latest rate limit seen in a response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|guard| *guard)
            .unwrap_or_default()
    }

    /// Full URL for an API path such as `/repos/acme/site`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base, endpoint)
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response, FetchError> {
        self.get_with(endpoint, None::<&[(&str, &str)]>, None).await
    }

    /// Make a GET request with query parameters and an optional Accept override.
    pub async fn get_with<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: Option<&T>,
        accept: Option<&'static str>,
    ) -> Result<Response, FetchError> {
        let url = self.url(endpoint);
        debug!(%url, "GET");

        let mut request = self.client.get(&url);
        if let Some(params) = params {
            request = request.query(params);
        }
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        let response = request.send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors. Any non-2xx status fails.
    async fn check_response(&self, response: Response) -> Result<Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(response.url().to_string())),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                if self.rate_limit().remaining == 0 =>
            {
                Err(FetchError::RateLimited {
                    reset_at: format_reset(self.rate_limit().reset),
                })
            }
            status => Err(FetchError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

fn format_reset(reset: u64) -> String {
    i64::try_from(reset)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
