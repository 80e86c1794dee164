//! Stable error codes for host-facing reporting.

pub const NORMALIZE_ERROR: &str = "CONFORM_NORMALIZE";
pub const MEMORY_ERROR: &str = "CONFORM_MEMORY";
pub const MEMORY_LOCKED: &str = "CONFORM_MEMORY_LOCKED";
pub const FEEDBACK_ERROR: &str = "CONFORM_FEEDBACK";
pub const FEEDBACK_STALE: &str = "CONFORM_FEEDBACK_STALE";
pub const CONFIG_ERROR: &str = "CONFORM_CONFIG";

/// Every subsystem error maps to a stable code string.
pub trait ConformErrorCode {
    fn error_code(&self) -> &'static str;
}
