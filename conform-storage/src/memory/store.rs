//! The per-project memory store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use conform_core::config::MemoryConfig;
use conform_core::errors::MemoryError;
use conform_core::events::types::MemoryDegradedEvent;
use conform_core::events::EventDispatcher;
use conform_core::types::ProjectMemory;
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use super::document::MemoryDocument;
use super::lock;

/// How a load resolved. Degraded loads start from fresh memory; the
/// damaged document is never merged into, only replaced on the next
/// persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No document existed for this project.
    Fresh,
    /// Document parsed cleanly.
    Loaded,
    /// Document was unreadable or corrupt; starting over.
    DegradedCorrupt,
    /// Document carried an incompatible schema version; starting over.
    DegradedSchema,
}

/// One store per project: a stable id derived from the project root,
/// a JSON document beside its lock file under the memory directory.
pub struct MemoryStore {
    memory_dir: PathBuf,
    project_id: String,
    lock_timeout: Duration,
    /// `scan_count` of the snapshot this store last loaded or wrote.
    /// A healthy document whose scan differs at persist time means
    /// another writer got there first.
    baseline_scan: AtomicU64,
}

impl MemoryStore {
    /// Open the store for a project, creating the memory directory if
    /// it does not exist yet.
    pub fn open(
        memory_dir: &Path,
        project_root: &Path,
        config: &MemoryConfig,
    ) -> Result<Self, MemoryError> {
        fs::create_dir_all(memory_dir).map_err(|e| MemoryError::Io {
            path: memory_dir.display().to_string(),
            message: e.to_string(),
        })?;
        let project_id = project_id_for(project_root);
        debug!(project_id, root = %project_root.display(), "opened memory store");
        Ok(Self {
            memory_dir: memory_dir.to_path_buf(),
            project_id,
            lock_timeout: Duration::from_millis(config.effective_lock_timeout_ms()),
            baseline_scan: AtomicU64::new(0),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn document_path(&self) -> PathBuf {
        self.memory_dir.join(format!("{}.json", self.project_id))
    }

    fn lock_path(&self) -> PathBuf {
        self.memory_dir.join(format!("{}.lock", self.project_id))
    }

    /// Load this project's memory. A missing document yields fresh
    /// memory; a damaged or incompatible one degrades to fresh memory
    /// with a warning rather than failing the run.
    pub fn load(&self) -> (ProjectMemory, LoadStatus) {
        let (memory, status) = self.read_document();
        self.baseline_scan.store(memory.scan_count, Ordering::Relaxed);
        (memory, status)
    }

    fn read_document(&self) -> (ProjectMemory, LoadStatus) {
        let path = self.document_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return (ProjectMemory::fresh(&self.project_id), LoadStatus::Fresh);
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "memory document unreadable, starting fresh"
                );
                return (
                    ProjectMemory::fresh(&self.project_id),
                    LoadStatus::DegradedCorrupt,
                );
            }
        };

        match MemoryDocument::from_json(&content, &path.display().to_string()) {
            Ok(doc) => (doc.memory, LoadStatus::Loaded),
            Err(MemoryError::SchemaMismatch { found, current }) => {
                warn!(
                    path = %path.display(),
                    found,
                    current,
                    "memory document schema incompatible, starting fresh"
                );
                (
                    ProjectMemory::fresh(&self.project_id),
                    LoadStatus::DegradedSchema,
                )
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "memory document corrupt, starting fresh"
                );
                (
                    ProjectMemory::fresh(&self.project_id),
                    LoadStatus::DegradedCorrupt,
                )
            }
        }
    }

    /// `load`, additionally reporting degraded loads on the dispatcher.
    pub fn load_with_events(
        &self,
        dispatcher: &EventDispatcher,
    ) -> (ProjectMemory, LoadStatus) {
        let (memory, status) = self.load();
        let reason = match status {
            LoadStatus::DegradedCorrupt => Some("corrupt document"),
            LoadStatus::DegradedSchema => Some("incompatible schema version"),
            LoadStatus::Fresh | LoadStatus::Loaded => None,
        };
        if let Some(reason) = reason {
            dispatcher.emit_memory_degraded(&MemoryDegradedEvent {
                project_id: self.project_id.clone(),
                reason: reason.to_string(),
            });
        }
        (memory, status)
    }

    /// Persist memory atomically: take the exclusive lock, write a
    /// verified temp file in the same directory, then rename it over
    /// the document so readers never observe a partial write.
    ///
    /// Under the lock the on-disk document is re-read: a healthy
    /// document whose `scan_count` no longer matches the snapshot this
    /// store loaded means another process merged and persisted in the
    /// meantime, and writing would silently discard its runs — the
    /// persist fails with `ConcurrentWrite` and the caller must reload
    /// and rerun.
    pub fn persist(&self, memory: &ProjectMemory) -> Result<(), MemoryError> {
        let mut lock_file = lock::open_lock_file(&self.lock_path())?;
        lock::with_write_lock(&mut lock_file, &self.project_id, self.lock_timeout, || {
            self.persist_locked(memory)
        })
    }

    fn persist_locked(&self, memory: &ProjectMemory) -> Result<(), MemoryError> {
        let path = self.document_path();

        // Missing or damaged documents carry no baseline to defend;
        // they are simply replaced.
        if let Ok(content) = fs::read_to_string(&path) {
            if let Ok(existing) =
                MemoryDocument::from_json(&content, &path.display().to_string())
            {
                let expected = self.baseline_scan.load(Ordering::Relaxed);
                if existing.memory.scan_count != expected {
                    warn!(
                        project_id = self.project_id,
                        expected_scan = expected,
                        found_scan = existing.memory.scan_count,
                        "memory document advanced on disk, refusing to overwrite"
                    );
                    return Err(MemoryError::ConcurrentWrite {
                        project_id: self.project_id.clone(),
                        expected_scan: expected,
                        found_scan: existing.memory.scan_count,
                    });
                }
            }
        }

        let doc = MemoryDocument::current(memory.clone());
        let json = doc.to_json()?;
        // Verify the bytes parse back before they replace the document.
        MemoryDocument::from_json(&json, "<pending write>")?;

        let tmp_path = self.memory_dir.join(format!("{}.json.tmp", self.project_id));
        fs::write(&tmp_path, &json).map_err(|e| MemoryError::Io {
            path: tmp_path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| MemoryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        self.baseline_scan.store(memory.scan_count, Ordering::Relaxed);
        debug!(
            project_id = self.project_id,
            scan_count = memory.scan_count,
            "persisted memory document"
        );
        Ok(())
    }

    /// Destructively erase this project's memory.
    pub fn reset(&self) -> Result<(), MemoryError> {
        let path = self.document_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                self.baseline_scan.store(0, Ordering::Relaxed);
                warn!(project_id = self.project_id, "memory reset, all learned patterns discarded");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MemoryError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Stable project identity: hash of the canonicalized root path, so
/// the same checkout always maps to the same document regardless of
/// how the path was spelled on the command line.
fn project_id_for(project_root: &Path) -> String {
    let canonical = project_root
        .canonicalize()
        .unwrap_or_else(|_| project_root.to_path_buf());
    format!("{:016x}", xxh3_64(canonical.as_os_str().as_encoded_bytes()))
}
