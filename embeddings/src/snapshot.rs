//! Flat-file snapshots of the vector index.
//!
//! A snapshot is a single JSON file holding the full chunk sequence
//! (text, embedding, metadata), written whole on save and parsed whole
//! on load. It exists so a restarted process can skip re-embedding its
//! corpus, not as a general persistence engine.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{EmbeddingError, Result};
use crate::index::{Chunk, VectorIndex};

impl VectorIndex {
    /// Serialize the full chunk sequence to `path`, overwriting it.
    ///
    /// The snapshot is written to a sibling temp file and renamed into
    /// place, so a crash mid-write leaves a previously valid snapshot
    /// intact.
    pub async fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string(self.chunks())?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = temp_sibling(path);
        fs::write(&tmp, content).await.map_err(|e| {
            EmbeddingError::Storage(format!("failed to write snapshot {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, path).await.map_err(|e| {
            EmbeddingError::Storage(format!("failed to commit snapshot {}: {e}", path.display()))
        })?;

        info!(chunks = self.len(), path = %path.display(), "saved snapshot");
        Ok(())
    }

    /// Load a snapshot from `path`, replacing the entire chunk sequence.
    ///
    /// Returns `Ok(false)` without touching the index when the file does
    /// not exist or cannot be parsed, so callers can fall back to
    /// rebuilding from source data. The replacement is all-or-nothing:
    /// the index is never left partially loaded.
    pub async fn load_snapshot(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot found");
                return Ok(false);
            }
            Err(err) => {
                return Err(EmbeddingError::Storage(format!(
                    "failed to read snapshot {}: {err}",
                    path.display()
                )));
            }
        };

        let chunks: Vec<Chunk> = match serde_json::from_str(&content) {
            Ok(chunks) => chunks,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed snapshot, keeping current index");
                return Ok(false);
            }
        };

        if let Some(first) = chunks.first() {
            let dimension = first.embedding.len();
            if chunks.iter().any(|c| c.embedding.len() != dimension) {
                warn!(
                    path = %path.display(),
                    "snapshot mixes embedding dimensions, keeping current index"
                );
                return Ok(false);
            }
            if chunks.iter().any(|c| c.text.is_empty()) {
                warn!(
                    path = %path.display(),
                    "snapshot contains empty chunk text, keeping current index"
                );
                return Ok(false);
            }
        }

        let count = chunks.len();
        self.replace(chunks);
        info!(chunks = count, path = %path.display(), "loaded snapshot");
        Ok(true)
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
