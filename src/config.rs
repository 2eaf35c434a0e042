//! Configuration module for sitedeploy.

use serde::Deserialize;
use std::path::Path;

use crate::{DeployerError, Result};

/// Environment variable that overrides `github.token`.
pub const TOKEN_ENV_VAR: &str = "SITEDEPLOY_GITHUB_TOKEN";

/// GitHub API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Personal access token.
    #[serde(default)]
    pub token: String,
    /// Repository that receives every site.
    #[serde(default = "default_repository")]
    pub repository: String,
    /// Directory inside the repository that holds the sites.
    #[serde(default = "default_repo_path")]
    pub repo_path: String,
    /// Branch to commit to and publish with Pages.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Pause after creating the repository, in milliseconds.
    #[serde(default = "default_repo_create_wait")]
    pub repo_create_wait_ms: u64,
    /// Pause after enabling Pages, in milliseconds.
    #[serde(default = "default_pages_settle")]
    pub pages_settle_ms: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_repository() -> String {
    "nine-public-sites".to_string()
}

fn default_repo_path() -> String {
    "public".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_user_agent() -> String {
    concat!("sitedeploy/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_total_timeout() -> u64 {
    60
}

fn default_repo_create_wait() -> u64 {
    2000
}

fn default_pages_settle() -> u64 {
    3000
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: String::new(),
            repository: default_repository(),
            repo_path: default_repo_path(),
            branch: default_branch(),
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
            total_timeout_secs: default_total_timeout(),
            repo_create_wait_ms: default_repo_create_wait(),
            pages_settle_ms: default_pages_settle(),
        }
    }
}

/// Mirror hosting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Netlify site name serving a mirror of the repository.
    #[serde(default = "default_mirror_base")]
    pub base: String,
}

fn default_mirror_base() -> String {
    "ninepubsites".to_string()
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base: default_mirror_base(),
        }
    }
}

/// Deployment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// Maximum number of concurrent writes after the main document.
    #[serde(default = "default_upload_concurrency")]
    pub upload_concurrency: usize,
}

fn default_upload_concurrency() -> usize {
    1
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            upload_concurrency: default_upload_concurrency(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/sitedeploy.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the Web API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum size of a single uploaded file in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Whether to serve static files.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_max_upload_size() -> u64 {
    25
}

fn default_static_path() -> String {
    "web/dist".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            max_upload_size_mb: default_max_upload_size(),
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// GitHub configuration.
    #[serde(default)]
    pub github: GitHubConfig,
    /// Mirror hosting configuration.
    #[serde(default)]
    pub mirror: MirrorConfig,
    /// Deployment configuration.
    #[serde(default)]
    pub deploy: DeployConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DeployerError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DeployerError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SITEDEPLOY_GITHUB_TOKEN`: Override the GitHub token
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                self.github.token = token;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.github.token.is_empty() {
            return Err(DeployerError::Config(format!(
                "GitHub token is not set. Set github.token in config.toml or {TOKEN_ENV_VAR}."
            )));
        }
        if self.github.repository.trim().is_empty() {
            return Err(DeployerError::Config(
                "github.repository cannot be empty".to_string(),
            ));
        }
        if self.github.branch.trim().is_empty() {
            return Err(DeployerError::Config(
                "github.branch cannot be empty".to_string(),
            ));
        }
        if self.deploy.upload_concurrency == 0 {
            return Err(DeployerError::Config(
                "deploy.upload_concurrency must be at least 1".to_string(),
            ));
        }
        url::Url::parse(&self.github.api_base)
            .map_err(|e| DeployerError::Config(format!("invalid github.api_base: {e}")))?;
        Ok(())
    }
}
