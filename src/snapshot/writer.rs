//! Atomic snapshot persistence.
//!
//! A snapshot is first written in full to a temporary file next to the target
//! and only then renamed over it, so a reader sees either the previous file or
//! the new one, never a partial write. The two phases are exposed separately
//! through [`StagedSnapshot`] so a caller can abandon a staged write.

use crate::snapshot::error::SnapshotError;
use crate::types::snapshot::Snapshot;
use crate::utils::ensure_dir_exists;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_OUTPUT_PATH: &str = "data/migration/latest.json";

/// A fully written temporary snapshot file waiting to be moved into place.
///
/// Dropping it without calling [`StagedSnapshot::commit`] deletes the
/// temporary file and leaves the target untouched.
#[derive(Debug)]
pub struct StagedSnapshot {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedSnapshot {
    /// Where the snapshot is currently staged.
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically renames the staged file over the target path.
    pub async fn commit(self) -> Result<PathBuf, SnapshotError> {
        let StagedSnapshot { temp, target } = self;
        let persisted = tokio::task::spawn_blocking(move || match temp.persist(&target) {
            Ok(_) => Ok(target),
            Err(e) => Err(SnapshotError::Persist(target, e.error)),
        })
        .await??;
        info!("Snapshot written to {}", persisted.display());
        Ok(persisted)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Serializes `snapshot` as indented JSON with a trailing newline.
pub fn to_json_bytes(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    let mut bytes = serde_json::to_vec_pretty(snapshot).map_err(SnapshotError::Serialize)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes `snapshot` to a temporary file in the directory of `path`.
///
/// The parent directory is created when missing. The data is flushed and
/// synced to disk before this returns.
pub async fn stage_snapshot(
    snapshot: &Snapshot,
    path: &Path,
) -> Result<StagedSnapshot, SnapshotError> {
    let dir = parent_dir(path);
    ensure_dir_exists(&dir)
        .await
        .map_err(|e| SnapshotError::DirCreation(dir.clone(), e))?;

    let bytes = to_json_bytes(snapshot)?;
    let target = path.to_path_buf();
    let staged = tokio::task::spawn_blocking(move || {
        let mut temp = tempfile::Builder::new()
            .prefix(".snapshot-")
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| SnapshotError::TempFile(dir.clone(), e))?;
        let temp_path = temp.path().to_path_buf();
        temp.write_all(&bytes)
            .and_then(|_| temp.flush())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| SnapshotError::Write(temp_path, e))?;
        Ok::<_, SnapshotError>(StagedSnapshot { temp, target })
    })
    .await??;

    debug!(
        "Staged snapshot for {} at {}",
        staged.target.display(),
        staged.temp.path().display()
    );
    Ok(staged)
}

/// Writes `snapshot` to `path` atomically, replacing any previous snapshot.
///
/// # Errors
///
/// Fails when the output directory cannot be created, the temporary file
/// cannot be written, or the final rename fails. In every case the previous
/// file at `path`, if any, is left as it was.
pub async fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<PathBuf, SnapshotError> {
    stage_snapshot(snapshot, path).await?.commit().await
}

/// Loads a snapshot previously written by [`write_snapshot`].
pub async fn read_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| SnapshotError::Read(path.to_path_buf(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Parse(path.to_path_buf(), e))
}
