//! Response DTOs for Web API.

use serde::Serialize;

use crate::deploy::DeployPlan;
use crate::staging::{
    format_file_size, AddReport, Entry, Location, RemovedFolders, StagingTree, TreeNode,
    UploadItem, UploadKind, MAX_FOLDERS, ROOT_TARGET,
};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A staged file.
#[derive(Debug, Serialize)]
pub struct EntryInfo {
    pub name: String,
    pub size: u64,
    pub size_display: String,
    pub content_type: String,
}

impl From<&Entry> for EntryInfo {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name().to_string(),
            size: entry.size(),
            size_display: format_file_size(entry.size()),
            content_type: entry.content_type(),
        }
    }
}

/// Full view of the staging tree.
#[derive(Debug, Serialize)]
pub struct StagingResponse {
    /// Main document, if staged.
    pub primary: Option<EntryInfo>,
    /// Nodes in display order.
    pub tree: Vec<TreeNode>,
    /// The same tree drawn as text.
    pub text: String,
    pub folder_count: usize,
    pub max_folders: usize,
    pub entry_count: usize,
    pub root_entry_count: usize,
}

impl StagingResponse {
    /// Build the view; `site_name` heads the text rendering.
    pub fn new(tree: &StagingTree, site_name: &str) -> Self {
        let nodes = tree.render_tree();
        Self {
            primary: tree.primary().map(EntryInfo::from),
            text: crate::staging::render_text(site_name, &nodes),
            tree: nodes,
            folder_count: tree.folder_count(),
            max_folders: MAX_FOLDERS,
            entry_count: tree.entries().len(),
            root_entry_count: tree.entry_count_in(&Location::Root),
        }
    }
}

/// Main document staged.
#[derive(Debug, Serialize)]
pub struct PrimaryResponse {
    pub primary: EntryInfo,
    /// Name of the document it replaced.
    pub replaced: Option<String>,
}

/// A refused file and why.
#[derive(Debug, Serialize)]
pub struct RejectedEntryInfo {
    pub name: String,
    pub reason: String,
}

/// Result of a batch add.
#[derive(Debug, Serialize)]
pub struct AddReportResponse {
    pub added: Vec<String>,
    pub replaced: Vec<String>,
    pub reassigned: Vec<String>,
    pub skipped: Vec<String>,
    pub rejected: Vec<RejectedEntryInfo>,
}

impl From<AddReport> for AddReportResponse {
    fn from(report: AddReport) -> Self {
        Self {
            added: report.added,
            replaced: report.replaced,
            reassigned: report.reassigned,
            skipped: report.skipped,
            rejected: report
                .rejected
                .into_iter()
                .map(|(name, err)| RejectedEntryInfo {
                    name,
                    reason: err.to_string(),
                })
                .collect(),
        }
    }
}

/// A created folder.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub path: String,
    pub name: String,
    pub depth: usize,
}

/// Result of a folder removal.
#[derive(Debug, Serialize)]
pub struct RemovedFoldersResponse {
    /// Removed paths, the requested folder first.
    pub folders: Vec<String>,
    /// Entries moved back to the root.
    pub reassigned: Vec<String>,
}

impl From<RemovedFolders> for RemovedFoldersResponse {
    fn from(removed: RemovedFolders) -> Self {
        Self {
            folders: removed
                .folders
                .into_iter()
                .map(|f| f.as_str().to_string())
                .collect(),
            reassigned: removed.reassigned,
        }
    }
}

/// Where an entry now lives.
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub name: String,
    /// Folder path, or `"root"`.
    pub folder: String,
}

impl LocationResponse {
    pub fn new(name: &str, location: &Location) -> Self {
        Self {
            name: name.to_string(),
            folder: location
                .folder()
                .map_or_else(|| ROOT_TARGET.to_string(), |f| f.as_str().to_string()),
        }
    }
}

/// Removed entry.
#[derive(Debug, Serialize)]
pub struct RemovedEntryResponse {
    pub name: String,
    pub removed: bool,
}

/// One planned write.
#[derive(Debug, Serialize)]
pub struct PlanItemInfo {
    pub path: String,
    pub size: u64,
    /// `primary`, `placeholder` or `asset`.
    pub kind: &'static str,
    pub commit_message: String,
}

impl From<&UploadItem> for PlanItemInfo {
    fn from(item: &UploadItem) -> Self {
        let kind = match item.kind {
            UploadKind::Primary { .. } => "primary",
            UploadKind::Placeholder { .. } => "placeholder",
            UploadKind::Asset { .. } => "asset",
        };
        Self {
            path: item.path.clone(),
            size: item.size,
            kind,
            commit_message: item.commit_message(),
        }
    }
}

/// Dry-run upload plan.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub site_name: String,
    pub site_root: String,
    pub items: Vec<PlanItemInfo>,
    pub total_size: u64,
    pub total_size_display: String,
}

impl From<&DeployPlan> for PlanResponse {
    fn from(plan: &DeployPlan) -> Self {
        let total_size = plan.items.iter().map(|i| i.size).sum();
        Self {
            site_name: plan.site_name.clone(),
            site_root: plan.site_root.clone(),
            items: plan.items.iter().map(PlanItemInfo::from).collect(),
            total_size,
            total_size_display: format_file_size(total_size),
        }
    }
}
