//! Project memory store errors.

use super::error_code::{self, ConformErrorCode};

/// Errors raised by the project memory store.
///
/// `Corrupt` and `SchemaMismatch` are only surfaced by `persist`; on
/// load they degrade to fresh memory instead. `Locked` and
/// `ConcurrentWrite` abort only the persist step — the run's
/// observations must be retried or explicitly discarded, never
/// silently lost or double-counted.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("Corrupt memory record at {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("Memory schema version {found} is incompatible (current {current})")]
    SchemaMismatch { found: u32, current: u32 },

    #[error("Memory record for project {project_id} is locked by another process")]
    Locked { project_id: String },

    #[error(
        "Memory record for project {project_id} advanced on disk (scan {found_scan}, snapshot loaded at scan {expected_scan}); reload and rerun"
    )]
    ConcurrentWrite {
        project_id: String,
        expected_scan: u64,
        found_scan: u64,
    },

    #[error("Memory I/O failure at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Memory serialization failure: {message}")]
    Serialize { message: String },
}

impl ConformErrorCode for MemoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Locked { .. } => error_code::MEMORY_LOCKED,
            _ => error_code::MEMORY_ERROR,
        }
    }
}
