//! Feedback loop: user responses to decisions, and the overrides they create.

pub mod apply;

pub use apply::{apply_feedback, apply_feedback_with_events, AppliedFeedback};
