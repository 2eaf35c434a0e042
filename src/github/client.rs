//! HTTP client for the GitHub REST API.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::debug;

use super::types::{
    CreateRepositoryRequest, EnablePagesRequest, ErrorBody, PagesSource, PagesStatus,
    PutContentsRequest, PutContentsResponse, Repository, User,
};
use crate::config::GitHubConfig;
use crate::error::{DeployerError, Result};

/// Media type requested from the API.
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Description given to a repository created on first deploy.
const REPOSITORY_DESCRIPTION: &str = "Deployed via sitedeploy";

/// Authenticated GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: String,
}

impl GitHubClient {
    /// Create a client from configuration.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DeployerError::GitHub(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_base, path))
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, ACCEPT_HEADER)
    }

    /// Fetch the user the token belongs to.
    pub async fn authenticated_user(&self) -> Result<User> {
        let response = self
            .request(Method::GET, "/user")
            .send()
            .await
            .map_err(|e| {
                DeployerError::GitHub(format!("Failed to authenticate with GitHub: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(DeployerError::GitHub(
                "Invalid GitHub token. Please check your configuration.".to_string(),
            ));
        }

        response
            .json::<User>()
            .await
            .map_err(|e| DeployerError::GitHub(format!("invalid user response: {e}")))
    }

    /// Look up a repository. Returns `None` if it does not exist.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Option<Repository>> {
        let response = self
            .request(Method::GET, &repo_path(owner, repo, ""))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(DeployerError::GitHub(format!(
                "Failed to look up repository: {message}"
            )));
        }

        Ok(Some(response.json::<Repository>().await?))
    }

    /// Create a public, initialised repository for the token's user.
    pub async fn create_repository(&self, name: &str) -> Result<Repository> {
        let body = CreateRepositoryRequest {
            name,
            description: REPOSITORY_DESCRIPTION,
            private: false,
            auto_init: true,
        };
        let response = self
            .request(Method::POST, "/user/repos")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(DeployerError::GitHub(format!(
                "Failed to create repository: {message}"
            )));
        }

        Ok(response.json::<Repository>().await?)
    }

    /// Blob SHA of the file at `path`, or `None` if there is no file.
    pub async fn file_sha(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>> {
        let response = self
            .request(Method::GET, &contents_path(owner, repo, path))
            .query(&[("ref", branch)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(DeployerError::GitHub(format!(
                "Failed to read {path}: {message}"
            )));
        }

        // A directory comes back as an array and has no SHA of its own.
        let value = response.json::<serde_json::Value>().await?;
        Ok(value
            .get("sha")
            .and_then(|sha| sha.as_str())
            .map(str::to_string))
    }

    /// Create or overwrite the file at `path`.
    pub async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &[u8],
        message: &str,
        branch: &str,
    ) -> Result<()> {
        let sha = self.file_sha(owner, repo, path, branch).await?;
        let replacing = sha.is_some();
        let body = PutContentsRequest {
            message,
            content: STANDARD.encode(content),
            branch,
            sha,
        };

        let response = self
            .request(Method::PUT, &contents_path(owner, repo, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| DeployerError::GitHub(format!("Failed to upload {path}: {e}")))?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(DeployerError::GitHub(format!(
                "Failed to upload {path}: {message}"
            )));
        }

        let stored = response.json::<PutContentsResponse>().await.ok();
        debug!(
            path = %path,
            replacing,
            sha = stored
                .as_ref()
                .and_then(|r| r.content.as_ref())
                .map(|c| c.sha.as_str())
                .unwrap_or("-"),
            "file written"
        );

        Ok(())
    }

    /// Publish `branch` with GitHub Pages.
    pub async fn enable_pages(&self, owner: &str, repo: &str, branch: &str) -> Result<PagesStatus> {
        let body = EnablePagesRequest {
            source: PagesSource { branch, path: "/" },
        };
        let response = self
            .request(Method::POST, &repo_path(owner, repo, "/pages"))
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CONFLICT => Ok(PagesStatus::AlreadyEnabled),
            status if status.is_success() => Ok(PagesStatus::Enabled),
            _ => {
                let message = error_message(response).await;
                Err(DeployerError::GitHub(format!(
                    "Failed to enable GitHub Pages: {message}"
                )))
            }
        }
    }
}

/// Percent-encode each segment of a repository path.
pub fn encode_content_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn repo_path(owner: &str, repo: &str, suffix: &str) -> String {
    format!(
        "/repos/{}/{}{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo),
        suffix
    )
}

fn contents_path(owner: &str, repo: &str, path: &str) -> String {
    repo_path(
        owner,
        repo,
        &format!("/contents/{}", encode_content_path(path)),
    )
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        _ => format!("HTTP error: {status}"),
    }
}
