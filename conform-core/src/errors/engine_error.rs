//! The aggregated engine error.

use super::error_code::{self, ConformErrorCode};
use super::{ConfigError, FeedbackError, MemoryError, NormalizeError};

/// Errors that can occur during an analysis run.
/// Aggregates subsystem errors via `From` conversions; the run pipeline
/// collects the non-fatal ones on its report instead of aborting.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ConformErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Normalize(e) => e.error_code(),
            Self::Memory(e) => e.error_code(),
            Self::Feedback(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_stable() {
        let e = EngineError::from(NormalizeError::UnrecognizedPattern {
            category: "mystery".to_string(),
            location: "a.tsx:1".to_string(),
        });
        assert_eq!(e.error_code(), error_code::NORMALIZE_ERROR);

        let e = EngineError::from(MemoryError::Locked {
            project_id: "abc".to_string(),
        });
        assert_eq!(e.error_code(), error_code::MEMORY_LOCKED);

        let e = EngineError::from(FeedbackError::StaleDecision {
            issue_id: "iss-1".to_string(),
            decision_run: 1,
            current_run: 2,
        });
        assert_eq!(e.error_code(), error_code::FEEDBACK_STALE);
    }
}
