//! Staged file entries.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::DOCUMENT_EXTENSION;

/// Content of a staged file.
///
/// The bytes are only materialised at upload time.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Bytes already held in memory (e.g. a multipart upload).
    Memory(Arc<[u8]>),
    /// A local file read when the upload happens.
    File(PathBuf),
}

impl Payload {
    /// Read the payload bytes.
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match self {
            Payload::Memory(bytes) => Ok(bytes.to_vec()),
            Payload::File(path) => tokio::fs::read(path).await,
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Memory(Arc::from(bytes))
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Memory(Arc::from(bytes))
    }
}

/// A stageable file.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    size: u64,
    content: Payload,
}

impl Entry {
    /// Create an entry with an explicit size.
    pub fn new(name: impl Into<String>, size: u64, content: Payload) -> Self {
        Self {
            name: name.into(),
            size,
            content,
        }
    }

    /// Create an entry from in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let size = bytes.len() as u64;
        Self::new(name, size, Payload::from(bytes))
    }

    /// Create an entry backed by a local file.
    ///
    /// Only the metadata is read here; the content is read on upload.
    pub async fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path has no file name: {}", path.display()),
                )
            })?;

        Ok(Self::new(
            name,
            metadata.len(),
            Payload::File(path.to_path_buf()),
        ))
    }

    /// File name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Payload.
    pub fn content(&self) -> &Payload {
        &self.content
    }

    /// Whether the name carries the main document extension.
    pub fn is_document(&self) -> bool {
        self.name.ends_with(DOCUMENT_EXTENSION)
    }

    /// Guessed MIME type of the file, based on its name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub(crate) fn same_file(&self, other: &Entry) -> bool {
        self.name == other.name && self.size == other.size
    }
}
