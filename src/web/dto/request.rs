//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_blank};

/// Folder creation request.
///
/// Without `parent` the name is created at the root and may be a
/// slash-separated path. With `parent` it must be a single segment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderRequest {
    #[validate(length(max = 255, message = "Folder name is too long"))]
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Entry reassignment request.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignEntryRequest {
    /// Target folder path, or `"root"`.
    #[validate(custom(function = "not_blank"))]
    pub folder: String,
}

/// Deploy request.
#[derive(Debug, Deserialize, Validate)]
pub struct DeployRequest {
    #[validate(custom(function = "no_control_chars"))]
    pub site_name: String,
}

/// Query for the rendered staging view.
#[derive(Debug, Default, Deserialize)]
pub struct StagingQuery {
    /// Site name shown at the top of the text tree.
    #[serde(default)]
    pub site: Option<String>,
}

/// Query for the dry-run upload plan.
#[derive(Debug, Deserialize, Validate)]
pub struct PlanQuery {
    #[validate(custom(function = "no_control_chars"))]
    pub site: String,
}
