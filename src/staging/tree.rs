//! The staging tree model.

use std::collections::HashMap;

use tracing::debug;

use super::{Entry, FolderPath, Location, StagingError, MAX_FOLDERS, ROOT_TARGET};

/// Outcome of adding a batch of entries.
///
/// A rejected entry never fails the rest of the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Names appended to the tree.
    pub added: Vec<String>,
    /// Names whose content was replaced by a file of a different size.
    pub replaced: Vec<String>,
    /// Existing names moved to the requested folder.
    pub reassigned: Vec<String>,
    /// Exact duplicates (same name and size) that were ignored.
    pub skipped: Vec<String>,
    /// Names that were refused, with the reason.
    pub rejected: Vec<(String, StagingError)>,
}

/// Folders dropped by [`StagingTree::remove_folder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedFolders {
    /// The removed folder followed by its descendants.
    pub folders: Vec<FolderPath>,
    /// Entries moved back to the root.
    pub reassigned: Vec<String>,
}

/// In-memory layout of a site before it is deployed.
///
/// Holds the main document, the folder set, the asset entries (in insertion
/// order) and the entry-to-folder assignments. Entries without an
/// assignment live at the root.
#[derive(Debug, Clone, Default)]
pub struct StagingTree {
    pub(super) primary: Option<Entry>,
    pub(super) folders: Vec<FolderPath>,
    pub(super) entries: Vec<Entry>,
    pub(super) assignments: HashMap<String, FolderPath>,
}

impl StagingTree {
    /// Create an empty staging tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main document, returning the one it replaces.
    pub fn set_primary(&mut self, entry: Entry) -> Result<Option<Entry>, StagingError> {
        if !entry.is_document() {
            return Err(StagingError::InvalidEntry(entry.name().to_string()));
        }
        debug!(name = %entry.name(), "main document staged");
        Ok(self.primary.replace(entry))
    }

    /// Remove the main document, if any.
    pub fn clear_primary(&mut self) -> Option<Entry> {
        self.primary.take()
    }

    /// The staged main document.
    pub fn primary(&self) -> Option<&Entry> {
        self.primary.as_ref()
    }

    /// Stage asset entries at the root.
    ///
    /// HTML files are rejected, exact duplicates are skipped and a file with a
    /// known name but a different size replaces the staged content while
    /// keeping its position and folder.
    pub fn add_entries<I>(&mut self, entries: I) -> AddReport
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut report = AddReport::default();

        for entry in entries {
            let name = entry.name().to_string();
            if entry.is_document() {
                report
                    .rejected
                    .push((name.clone(), StagingError::RejectedEntry(name)));
                continue;
            }

            match self.entries.iter_mut().find(|e| e.name() == name) {
                Some(existing) if existing.same_file(&entry) => report.skipped.push(name),
                Some(existing) => {
                    *existing = entry;
                    report.replaced.push(name);
                }
                None => {
                    self.entries.push(entry);
                    report.added.push(name);
                }
            }
        }

        report
    }

    /// Stage asset entries directly into a folder (or `"root"`).
    ///
    /// Known names are moved to the target without touching their content.
    /// An unknown target fails before anything is staged.
    pub fn add_entries_to_folder<I>(
        &mut self,
        entries: I,
        target: &str,
    ) -> Result<AddReport, StagingError>
    where
        I: IntoIterator<Item = Entry>,
    {
        let location = self.resolve_target(target)?;
        let mut report = AddReport::default();

        for entry in entries {
            let name = entry.name().to_string();
            if entry.is_document() {
                report
                    .rejected
                    .push((name.clone(), StagingError::RejectedEntry(name)));
                continue;
            }

            if self.entries.iter().any(|e| e.name() == name) {
                report.reassigned.push(name.clone());
            } else {
                self.entries.push(entry);
                report.added.push(name.clone());
            }
            self.set_location(name, &location);
        }

        Ok(report)
    }

    /// Create a folder from a root-level name.
    ///
    /// The name may itself be a slash-separated path (see [`FolderPath::parse`]).
    pub fn create_folder(&mut self, name: &str) -> Result<FolderPath, StagingError> {
        self.ensure_capacity()?;
        let path = FolderPath::parse(name)?;
        self.insert_folder(path)
    }

    /// Create a direct child of an existing folder.
    pub fn create_subfolder(
        &mut self,
        parent: &str,
        name: &str,
    ) -> Result<FolderPath, StagingError> {
        self.ensure_capacity()?;
        let parent = self
            .find_folder(parent)
            .ok_or_else(|| StagingError::UnknownTarget(parent.to_string()))?;
        let path = parent.child(name)?;
        self.insert_folder(path)
    }

    /// Remove a folder and every folder below it.
    ///
    /// Entries assigned to any removed folder go back to the root; no entry
    /// is deleted.
    pub fn remove_folder(&mut self, path: &str) -> Result<RemovedFolders, StagingError> {
        if self.find_folder(path).is_none() {
            return Err(StagingError::UnknownTarget(path.to_string()));
        }

        let (mut removed, kept): (Vec<FolderPath>, Vec<FolderPath>) = self
            .folders
            .drain(..)
            .partition(|f| f.as_str() == path || f.is_descendant_of(path));
        self.folders = kept;
        removed.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.cmp(b)));

        let mut reassigned = Vec::new();
        self.assignments.retain(|name, folder| {
            if removed.contains(folder) {
                reassigned.push(name.clone());
                false
            } else {
                true
            }
        });
        reassigned.sort_by_key(|name| self.entry_position(name));

        debug!(
            path = %path,
            folders = removed.len(),
            reassigned = reassigned.len(),
            "folder removed"
        );

        Ok(RemovedFolders {
            folders: removed,
            reassigned,
        })
    }

    /// Move an entry to a folder or to `"root"`.
    pub fn assign_entry(&mut self, name: &str, target: &str) -> Result<Location, StagingError> {
        let location = self.resolve_target(target)?;
        if !self.entries.iter().any(|e| e.name() == name) {
            return Err(StagingError::UnknownEntry(name.to_string()));
        }
        self.set_location(name.to_string(), &location);
        Ok(location)
    }

    /// Remove an entry. Returns `false` if no entry had that name.
    pub fn remove_entry(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name() != name);
        self.assignments.remove(name);
        self.entries.len() != before
    }

    /// Reset the tree to empty.
    pub fn clear_all(&mut self) {
        self.primary = None;
        self.folders.clear();
        self.entries.clear();
        self.assignments.clear();
    }

    /// Asset entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Folders ordered by depth, then by path.
    ///
    /// A parent always comes before its own children.
    pub fn folders(&self) -> Vec<&FolderPath> {
        let mut sorted: Vec<&FolderPath> = self.folders.iter().collect();
        sorted.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.cmp(b)));
        sorted
    }

    /// Number of folders.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Location of a staged entry.
    pub fn location_of(&self, name: &str) -> Option<Location> {
        if !self.entries.iter().any(|e| e.name() == name) {
            return None;
        }
        Some(
            self.assignments
                .get(name)
                .cloned()
                .map_or(Location::Root, Location::Folder),
        )
    }

    /// Entries placed at `location`, in insertion order.
    pub fn entries_in<'a>(&'a self, location: &'a Location) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .iter()
            .filter(move |e| self.assignments.get(e.name()) == location.folder())
    }

    /// Number of entries placed at `location`.
    pub fn entry_count_in(&self, location: &Location) -> usize {
        self.entries_in(location).count()
    }

    /// Whether nothing at all is staged.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.folders.is_empty() && self.entries.is_empty()
    }

    fn ensure_capacity(&self) -> Result<(), StagingError> {
        if self.folders.len() >= MAX_FOLDERS {
            return Err(StagingError::LimitExceeded);
        }
        Ok(())
    }

    fn insert_folder(&mut self, path: FolderPath) -> Result<FolderPath, StagingError> {
        if self.folders.contains(&path) {
            return Err(StagingError::DuplicateFolder(path.as_str().to_string()));
        }
        debug!(path = %path, "folder created");
        self.folders.push(path.clone());
        Ok(path)
    }

    fn find_folder(&self, path: &str) -> Option<&FolderPath> {
        self.folders.iter().find(|f| f.as_str() == path)
    }

    fn resolve_target(&self, target: &str) -> Result<Location, StagingError> {
        if target == ROOT_TARGET {
            return Ok(Location::Root);
        }
        self.find_folder(target)
            .cloned()
            .map(Location::Folder)
            .ok_or_else(|| StagingError::UnknownTarget(target.to_string()))
    }

    fn set_location(&mut self, name: String, location: &Location) {
        match location {
            Location::Root => {
                self.assignments.remove(&name);
            }
            Location::Folder(path) => {
                self.assignments.insert(name, path.clone());
            }
        }
    }

    fn entry_position(&self, name: &str) -> usize {
        self.entries
            .iter()
            .position(|e| e.name() == name)
            .unwrap_or(usize::MAX)
    }
}
