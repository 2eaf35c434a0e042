//! GitHub REST API payloads.

use serde::{Deserialize, Serialize};

/// Authenticated user (`GET /user`).
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Login name, also the Pages subdomain.
    pub login: String,
}

/// Repository metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// Repository name.
    pub name: String,
    /// `owner/name`.
    #[serde(default)]
    pub full_name: String,
    /// Default branch, if reported.
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Body of `POST /user/repos`.
#[derive(Debug, Serialize)]
pub struct CreateRepositoryRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
    pub auto_init: bool,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Serialize)]
pub struct PutContentsRequest<'a> {
    pub message: &'a str,
    /// Base64-encoded file content.
    pub content: String,
    pub branch: &'a str,
    /// Blob SHA of the file being replaced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Response of a contents write.
#[derive(Debug, Clone, Deserialize)]
pub struct PutContentsResponse {
    #[serde(default)]
    pub content: Option<ContentInfo>,
}

/// Metadata of a stored file.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentInfo {
    pub sha: String,
}

/// Body of `POST /repos/{owner}/{repo}/pages`.
#[derive(Debug, Serialize)]
pub struct EnablePagesRequest<'a> {
    pub source: PagesSource<'a>,
}

/// Pages publishing source.
#[derive(Debug, Serialize)]
pub struct PagesSource<'a> {
    pub branch: &'a str,
    pub path: &'a str,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of enabling Pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagesStatus {
    /// Pages was switched on by this call.
    Enabled,
    /// Pages was already on (HTTP 409).
    AlreadyEnabled,
}
