//! Per-project exclusive lock for the memory document.
//!
//! At most one writer per project. Acquisition is bounded: rather than
//! deadlocking behind another process, it retries briefly and then
//! fails with `MemoryError::Locked`, leaving retry policy to the caller.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, Instant};

use conform_core::errors::MemoryError;
use fd_lock::RwLock;

const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Open (creating if needed) the lock file for a project.
pub fn open_lock_file(lock_path: &Path) -> Result<RwLock<File>, MemoryError> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)
        .map_err(|e| MemoryError::Io {
            path: lock_path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(RwLock::new(file))
}

/// Run `f` while holding the exclusive write lock, acquiring it within
/// the timeout budget. The lock is released when `f` returns.
pub fn with_write_lock<T>(
    lock: &mut RwLock<File>,
    project_id: &str,
    timeout: Duration,
    f: impl FnOnce() -> Result<T, MemoryError>,
) -> Result<T, MemoryError> {
    let deadline = Instant::now() + timeout;
    loop {
        match lock.try_write() {
            Ok(_guard) => return f(),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    return Err(MemoryError::Locked {
                        project_id: project_id.to_string(),
                    });
                }
                std::thread::sleep(RETRY_INTERVAL);
            }
            Err(e) => {
                return Err(MemoryError::Io {
                    path: "<lock>".to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}
