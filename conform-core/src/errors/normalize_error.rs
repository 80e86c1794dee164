//! Normalization errors.

use super::error_code::{self, ConformErrorCode};

/// Errors raised while canonicalizing raw occurrences.
/// Callers skip the occurrence rather than abort the run.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Unrecognized pattern category '{category}' at {location}")]
    UnrecognizedPattern { category: String, location: String },

    #[error("Empty descriptor for group '{group}' at {location}")]
    EmptyDescriptor { group: String, location: String },
}

impl ConformErrorCode for NormalizeError {
    fn error_code(&self) -> &'static str {
        error_code::NORMALIZE_ERROR
    }
}
