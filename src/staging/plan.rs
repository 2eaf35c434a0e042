//! Upload plan resolution.

use super::{
    FolderPath, Location, Payload, StagingError, StagingTree, INDEX_FILE_NAME,
    PLACEHOLDER_CONTENT, PLACEHOLDER_FILE_NAME,
};

/// What an upload item stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadKind {
    /// The main document, renamed to `index.html`.
    Primary { source_name: String },
    /// Marker file that keeps an otherwise empty folder in the repository.
    Placeholder { folder: FolderPath },
    /// An asset entry.
    Asset { name: String },
}

/// A single remote write: target path plus payload.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// Repository path to write.
    pub path: String,
    /// Content to write.
    pub payload: Payload,
    /// Payload size in bytes.
    pub size: u64,
    /// What the item is.
    pub kind: UploadKind,
}

impl UploadItem {
    /// Commit message used when writing this item.
    pub fn commit_message(&self) -> String {
        match &self.kind {
            UploadKind::Placeholder { folder } => format!("Create folder {folder}"),
            UploadKind::Primary { .. } | UploadKind::Asset { .. } => {
                format!("Deploy {}", self.path)
            }
        }
    }

    /// Whether this item is the main document.
    pub fn is_primary(&self) -> bool {
        matches!(self.kind, UploadKind::Primary { .. })
    }
}

impl StagingTree {
    /// Resolve every staged item to its path below `site_root`.
    ///
    /// The main document comes first, followed by one placeholder per folder
    /// (in render order) and then the assets in insertion order.
    pub fn resolve_upload_paths(&self, site_root: &str) -> Result<Vec<UploadItem>, StagingError> {
        let primary = self.primary.as_ref().ok_or(StagingError::NothingToDeploy)?;
        let site_root = site_root.trim_end_matches('/');

        let mut items = Vec::with_capacity(1 + self.folders.len() + self.entries.len());
        items.push(UploadItem {
            path: join(site_root, INDEX_FILE_NAME),
            payload: primary.content().clone(),
            size: primary.size(),
            kind: UploadKind::Primary {
                source_name: primary.name().to_string(),
            },
        });

        for folder in self.folders() {
            items.push(UploadItem {
                path: join(
                    site_root,
                    &format!("{}/{}", folder.as_str(), PLACEHOLDER_FILE_NAME),
                ),
                payload: Payload::from(PLACEHOLDER_CONTENT),
                size: PLACEHOLDER_CONTENT.len() as u64,
                kind: UploadKind::Placeholder {
                    folder: folder.clone(),
                },
            });
        }

        for entry in &self.entries {
            let relative = match self.location_of(entry.name()) {
                Some(Location::Folder(folder)) => format!("{}/{}", folder, entry.name()),
                _ => entry.name().to_string(),
            };
            items.push(UploadItem {
                path: join(site_root, &relative),
                payload: entry.content().clone(),
                size: entry.size(),
                kind: UploadKind::Asset {
                    name: entry.name().to_string(),
                },
            });
        }

        Ok(items)
    }
}

fn join(root: &str, relative: &str) -> String {
    if root.is_empty() {
        relative.to_string()
    } else {
        format!("{root}/{relative}")
    }
}
