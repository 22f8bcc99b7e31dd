//! File attachments.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;

/// Largest file accepted for upload (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Where the attachment's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// A file on disk, read when the upload starts.
    Path(PathBuf),
    /// Bytes already held in memory.
    Bytes(Bytes),
}

/// A file the user picked but that has not been accepted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub file_name: String,
    pub size_bytes: u64,
    pub source: AttachmentSource,
}

impl FileCandidate {
    /// Builds a candidate from a path using filesystem metadata for the size.
    ///
    /// # Errors
    /// Returns an error if the path does not exist or is not a regular file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to inspect {}", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("{} is not a regular file", path.display());
        }
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            file_name,
            size_bytes: metadata.len(),
            source: AttachmentSource::Path(path.to_path_buf()),
        })
    }

    /// Builds a candidate from bytes held in memory.
    pub fn in_memory(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            file_name: file_name.into(),
            size_bytes: bytes.len() as u64,
            source: AttachmentSource::Bytes(bytes),
        }
    }

    /// Returns true if the candidate is within the upload limit.
    pub fn fits_upload_limit(&self) -> bool {
        self.size_bytes <= MAX_UPLOAD_BYTES
    }
}

/// Identity of an accepted attachment, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentId(pub u64);

/// The single file currently selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: AttachmentId,
    pub file_name: String,
    pub size_bytes: u64,
    pub source: AttachmentSource,
}

impl Attachment {
    pub fn new(id: AttachmentId, candidate: FileCandidate) -> Self {
        Self {
            id,
            file_name: candidate.file_name,
            size_bytes: candidate.size_bytes,
            source: candidate.source,
        }
    }

    /// Loads the attachment bytes for sending.
    ///
    /// # Errors
    /// Returns an error if a path-backed attachment can no longer be read.
    pub async fn load_bytes(&self) -> Result<Bytes> {
        match &self.source {
            AttachmentSource::Bytes(bytes) => Ok(bytes.clone()),
            AttachmentSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

/// Formats a byte count for display ("512 B", "1.5 KB", "5.0 MB").
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{bytes} B")
    }
}
