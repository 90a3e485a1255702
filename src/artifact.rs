//! Artifact materialization
//!
//! The artifact is the on-disk copy of a batch. It is created if absent,
//! truncated and rewritten otherwise, and never deleted here: repeated batches
//! pointing at the same path are last-write-wins.

use crate::error::ArtifactWriteError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Write `content` to `path`, replacing any previous content
///
/// Parent directories are not created.
pub fn materialize(path: &Path, content: &str) -> Result<(), ArtifactWriteError> {
    let result = File::create(path).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });

    match result {
        Ok(()) => {
            info!(path = ?path, bytes = content.len(), "artifact written");
            Ok(())
        }
        Err(e) => {
            warn!(path = ?path, error = %e, "failed to write artifact");
            Err(ArtifactWriteError::Write {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Read the artifact back as the attachment payload
pub fn read(path: &Path) -> Result<Vec<u8>, ArtifactWriteError> {
    std::fs::read(path).map_err(|e| ArtifactWriteError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Attachment display name: the artifact's file name
pub fn file_name(path: &Path) -> Result<String, ArtifactWriteError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ArtifactWriteError::NoFileName {
            path: path.to_path_buf(),
        })
}

/// MIME type inferred from the file extension
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("csv") => "text/csv",
        Some("tsv") => "text/tab-separated-values",
        Some("txt") | Some("log") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
