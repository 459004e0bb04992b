// Configuration for repo-stats.
// Loads a TOML file, then applies environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::cache::DEFAULT_TTL;
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_CACHE_TTL_SECS: u64 = DEFAULT_TTL.as_secs();
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const CONFIG_FILE: &str = "config.toml";

/// Runtime settings for the data client and its HTTP transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owning account of the tracked repository.
    pub owner: String,
    /// Name of the tracked repository.
    pub repo: String,
    pub api_base: String,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Bearer token. Only taken from `GITHUB_TOKEN`, never from the file.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: concat!("repo-stats/", env!("CARGO_PKG_VERSION")).to_string(),
            token: None,
        }
    }
}

/// Default config file location (e.g. ~/.config/repo-stats/config.toml).
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "repo-stats").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the platform default is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `REPO_STATS_OWNER`, `REPO_STATS_REPO` and `GITHUB_TOKEN`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(owner) = lookup("REPO_STATS_OWNER").filter(|v| !v.is_empty()) {
            self.owner = owner;
        }
        if let Some(repo) = lookup("REPO_STATS_REPO").filter(|v| !v.is_empty()) {
            self.repo = repo;
        }
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|v| !v.is_empty()) {
            self.token = Some(token);
        }
    }

    /// Reject settings the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(Error::Config("owner must be set".to_string()));
        }
        if self.repo.trim().is_empty() {
            return Err(Error::Config("repo must be set".to_string()));
        }
        if self.cache_ttl_secs == 0 {
            return Err(Error::Config("cache_ttl_secs must be positive".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
