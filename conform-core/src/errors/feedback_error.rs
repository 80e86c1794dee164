//! Feedback channel errors.

use super::error_code::{self, ConformErrorCode};

/// Errors raised while applying user feedback to a decision.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Decision {issue_id} is from run {decision_run}, but run {current_run} has already started")]
    StaleDecision {
        issue_id: String,
        decision_run: u64,
        current_run: u64,
    },

    #[error("No decision found for issue {issue_id}")]
    UnknownIssue { issue_id: String },

    #[error("Decision {issue_id} already has a response")]
    AlreadyResolved { issue_id: String },
}

impl ConformErrorCode for FeedbackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::StaleDecision { .. } => error_code::FEEDBACK_STALE,
            _ => error_code::FEEDBACK_ERROR,
        }
    }
}
