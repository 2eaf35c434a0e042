//! Folder paths and entry locations.
//!
//! Folders are kept as flat slash-joined strings. Depth, parent and
//! descendant checks are derived from the string.

use std::fmt;

use serde::Serialize;

use super::{StagingError, ROOT_TARGET};

/// Characters that may never appear in a folder path.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// A validated folder path such as `img` or `img/icons`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FolderPath(String);

impl FolderPath {
    /// Parse a root-level folder name.
    ///
    /// Slashes are accepted as segment separators, so `img/icons` creates a
    /// nested path in one call. Each segment is trimmed and must be non-empty.
    /// Backslashes, reserved characters and `.`/`..` segments are rejected.
    pub fn parse(name: &str) -> Result<Self, StagingError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StagingError::EmptyName);
        }
        if contains_reserved(trimmed) || trimmed.contains('\\') {
            return Err(StagingError::InvalidCharacters(trimmed.to_string()));
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(StagingError::EmptyName);
            }
            if is_dot_segment(segment) {
                return Err(StagingError::InvalidCharacters(trimmed.to_string()));
            }
            segments.push(segment);
        }

        let path = segments.join("/");
        if path == ROOT_TARGET {
            return Err(StagingError::ReservedName(path));
        }

        Ok(Self(path))
    }

    /// Build the path of a direct child folder.
    ///
    /// The segment may not contain `/` or `\`.
    pub fn child(&self, segment: &str) -> Result<Self, StagingError> {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(StagingError::EmptyName);
        }
        if contains_reserved(segment)
            || segment.contains('/')
            || segment.contains('\\')
            || is_dot_segment(segment)
        {
            return Err(StagingError::InvalidCharacters(segment.to_string()));
        }

        Ok(Self(format!("{}/{}", self.0, segment)))
    }

    /// Full path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of `/` separators.
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Path of the parent folder, if nested.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|idx| &self.0[..idx])
    }

    /// Whether this folder lives somewhere below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &str) -> bool {
        self.0.len() > ancestor.len()
            && self.0.starts_with(ancestor)
            && self.0.as_bytes()[ancestor.len()] == b'/'
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FolderPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where an entry is placed in the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Directly under the site root.
    Root,
    /// Inside a staged folder.
    Folder(FolderPath),
}

impl Location {
    /// Folder path, or `None` for the root.
    pub fn folder(&self) -> Option<&FolderPath> {
        match self {
            Location::Root => None,
            Location::Folder(path) => Some(path),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Root => f.write_str(ROOT_TARGET),
            Location::Folder(path) => path.fmt(f),
        }
    }
}

fn contains_reserved(s: &str) -> bool {
    s.chars()
        .any(|c| c.is_control() || RESERVED_CHARS.contains(&c))
}

/// Whether `s` is `.` or `..`, which never name a file or folder.
pub fn is_dot_segment(s: &str) -> bool {
    s == "." || s == ".."
}
