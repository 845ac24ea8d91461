use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to create temporary file in '{0}'")]
    TempFile(PathBuf, #[source] std::io::Error),

    #[error("Failed to serialize snapshot")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write temporary snapshot file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to move snapshot into place at '{0}'")]
    Persist(PathBuf, #[source] std::io::Error),

    #[error("Failed to read snapshot file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse snapshot file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
