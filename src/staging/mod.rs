//! Staging tree for sitedeploy.
//!
//! This module tracks a prospective deployment before any network call:
//! - The main HTML document (uploaded as `index.html`)
//! - A flat set of virtual folders identified by slash-joined paths
//! - Asset entries and their folder assignments
//! - The resolved upload plan handed to the deployer

mod entry;
mod error;
mod folder;
mod plan;
mod render;
mod tree;

pub use entry::{Entry, Payload};
pub use error::StagingError;
pub use folder::{is_dot_segment, FolderPath, Location};
pub use plan::{UploadItem, UploadKind};
pub use render::{format_file_size, render_text, TreeNode};
pub use tree::{AddReport, RemovedFolders, StagingTree};

/// Extension a file needs to be accepted as the main document.
pub const DOCUMENT_EXTENSION: &str = ".html";

/// Name the main document is uploaded under.
pub const INDEX_FILE_NAME: &str = "index.html";

/// Maximum number of folders in a staging tree.
pub const MAX_FOLDERS: usize = 50;

/// Sentinel target name for the site root.
pub const ROOT_TARGET: &str = "root";

/// Marker file written into every staged folder.
pub const PLACEHOLDER_FILE_NAME: &str = ".gitkeep";

/// Body of the folder marker file.
pub const PLACEHOLDER_CONTENT: &[u8] = b"# This file keeps the folder in git";
