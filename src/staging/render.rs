//! Display ordering for the staging tree.
//!
//! Folders are sorted by depth and then by path, so a parent is always
//! listed before its children without building an explicit tree. Each
//! folder is followed by its own entries; root entries come last.

use std::fmt::Write;

use serde::Serialize;

use super::{Location, StagingTree, INDEX_FILE_NAME};

/// One line of the rendered staging tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// The main document, shown under its upload name.
    Primary {
        name: String,
        source_name: String,
        size: u64,
    },
    /// A staged folder.
    Folder {
        path: String,
        name: String,
        depth: usize,
        entry_count: usize,
    },
    /// An asset entry. `folder` is `None` at the root.
    Entry {
        name: String,
        folder: Option<String>,
        depth: usize,
        size: u64,
        content_type: String,
    },
}

impl TreeNode {
    /// Indentation level of the node.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Primary { .. } => 0,
            TreeNode::Folder { depth, .. } | TreeNode::Entry { depth, .. } => *depth,
        }
    }
}

impl StagingTree {
    /// Render the tree in display order.
    ///
    /// The result depends only on the staged state, never on the order in
    /// which folders were created.
    pub fn render_tree(&self) -> Vec<TreeNode> {
        let mut nodes = Vec::with_capacity(1 + self.folders.len() + self.entries.len());

        if let Some(primary) = &self.primary {
            nodes.push(TreeNode::Primary {
                name: INDEX_FILE_NAME.to_string(),
                source_name: primary.name().to_string(),
                size: primary.size(),
            });
        }

        for folder in self.folders() {
            let location = Location::Folder(folder.clone());
            let depth = folder.depth();
            nodes.push(TreeNode::Folder {
                path: folder.as_str().to_string(),
                name: folder.name().to_string(),
                depth,
                entry_count: self.entries_in(&location).count(),
            });
            for entry in self.entries_in(&location) {
                nodes.push(TreeNode::Entry {
                    name: entry.name().to_string(),
                    folder: Some(folder.as_str().to_string()),
                    depth: depth + 1,
                    size: entry.size(),
                    content_type: entry.content_type(),
                });
            }
        }

        for entry in self.entries_in(&Location::Root) {
            nodes.push(TreeNode::Entry {
                name: entry.name().to_string(),
                folder: None,
                depth: 0,
                size: entry.size(),
                content_type: entry.content_type(),
            });
        }

        nodes
    }
}

/// Render nodes as an indented text tree under `site_name/`.
pub fn render_text(site_name: &str, nodes: &[TreeNode]) -> String {
    let mut out = format!("{site_name}/\n");
    if nodes.is_empty() {
        out.push_str("└─ (empty)\n");
        return out;
    }

    for (idx, node) in nodes.iter().enumerate() {
        let branch = if idx + 1 == nodes.len() { "└─" } else { "├─" };
        let indent = "   ".repeat(node.depth());
        // Writing to a String cannot fail.
        let _ = match node {
            TreeNode::Primary {
                name,
                source_name,
                size,
            } => writeln!(
                out,
                "{indent}{branch} {name} ({}, from {source_name})",
                format_file_size(*size)
            ),
            TreeNode::Folder {
                name, entry_count, ..
            } => writeln!(out, "{indent}{branch} {name}/ ({entry_count} files)"),
            TreeNode::Entry { name, size, .. } => {
                writeln!(out, "{indent}{branch} {name} ({})", format_file_size(*size))
            }
        };
    }

    out
}

/// Format a byte count for humans, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < UNITS.len() && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let value = (bytes as f64 / divisor as f64 * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[unit])
}
