//! Memory store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the project memory store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MemoryConfig {
    /// Directory holding per-project memory documents.
    /// Default: `~/.conform/memory`.
    pub memory_dir: Option<String>,
    /// Total budget for acquiring the per-project lock before failing
    /// with a locked error, in milliseconds. Default: 2000.
    pub lock_timeout_ms: Option<u64>,
}

impl MemoryConfig {
    /// Effective lock timeout, defaulting to 2000ms.
    pub fn effective_lock_timeout_ms(&self) -> u64 {
        self.lock_timeout_ms.unwrap_or(2000)
    }
}
