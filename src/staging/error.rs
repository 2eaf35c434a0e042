//! Errors raised by staging tree operations.

use thiserror::Error;

use super::MAX_FOLDERS;

/// Staging validation errors.
///
/// Every error is reported before the tree is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    /// The file cannot be the main document.
    #[error("\"{0}\" is not an HTML file")]
    InvalidEntry(String),

    /// HTML files must be staged as the main document.
    #[error("\"{0}\" is an HTML file; set it as the main document instead")]
    RejectedEntry(String),

    /// Folder limit reached.
    #[error("maximum folder limit reached ({MAX_FOLDERS} folders)")]
    LimitExceeded,

    /// Folder name (or one of its segments) is empty.
    #[error("folder name cannot be empty")]
    EmptyName,

    /// Folder name contains reserved or control characters.
    #[error("folder name contains invalid characters: {0}")]
    InvalidCharacters(String),

    /// Folder name is reserved for the root target.
    #[error("\"{0}\" is reserved and cannot be used as a folder name")]
    ReservedName(String),

    /// Folder already exists.
    #[error("folder already exists: {0}")]
    DuplicateFolder(String),

    /// Target folder does not exist.
    #[error("folder not found: {0}")]
    UnknownTarget(String),

    /// Entry does not exist.
    #[error("file not found: {0}")]
    UnknownEntry(String),

    /// No main document has been staged.
    #[error("no main HTML file to deploy")]
    NothingToDeploy,
}
