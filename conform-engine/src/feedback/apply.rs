//! Applying a user response to a pending decision.
//!
//! `accept`/`reject` only fill in decision history. `always`/`never`
//! additionally create a permanent override for the feature key — the
//! only mechanism by which a human decision overrides the statistical
//! model outright.

use conform_core::errors::FeedbackError;
use conform_core::events::types::OverrideCreatedEvent;
use conform_core::events::EventDispatcher;
use conform_core::types::{
    FeatureKey, FeedbackResponse, Override, OverrideMode, ProjectMemory,
};

/// Outcome of applying feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedFeedback {
    pub issue_id: String,
    pub response: FeedbackResponse,
    /// The override created by an `always`/`never` response, if any.
    pub override_created: Option<(FeatureKey, OverrideMode)>,
}

/// Apply a user response to the decision identified by `issue_id`.
///
/// Responses are accepted only between the decision's run and the start
/// of the next run; later responses fail with `StaleDecision` and the
/// caller logs and drops them.
pub fn apply_feedback(
    memory: &mut ProjectMemory,
    issue_id: &str,
    response: FeedbackResponse,
    now: u64,
) -> Result<AppliedFeedback, FeedbackError> {
    let current_run = memory.scan_count;

    let decision = memory
        .find_decision(issue_id)
        .ok_or_else(|| FeedbackError::UnknownIssue {
            issue_id: issue_id.to_string(),
        })?;

    if decision.run_id < current_run {
        return Err(FeedbackError::StaleDecision {
            issue_id: issue_id.to_string(),
            decision_run: decision.run_id,
            current_run,
        });
    }
    if !decision.is_pending() {
        return Err(FeedbackError::AlreadyResolved {
            issue_id: issue_id.to_string(),
        });
    }

    let feature_key = decision.feature_key.clone();
    let enforced_value = decision
        .expected_value
        .clone()
        .unwrap_or_else(|| decision.observed_value.clone());

    let override_created = match response {
        FeedbackResponse::Always => {
            memory.overrides.insert(
                feature_key.clone(),
                Override {
                    value: Some(enforced_value),
                    mode: OverrideMode::Always,
                    set_at: now,
                },
            );
            Some((feature_key, OverrideMode::Always))
        }
        FeedbackResponse::Never => {
            memory.overrides.insert(
                feature_key.clone(),
                Override {
                    value: None,
                    mode: OverrideMode::Never,
                    set_at: now,
                },
            );
            Some((feature_key, OverrideMode::Never))
        }
        FeedbackResponse::Accept | FeedbackResponse::Reject => None,
    };

    // Mutate the record exactly once.
    if let Some(record) = memory.find_decision_mut(issue_id) {
        record.user_response = Some(response);
    }

    Ok(AppliedFeedback {
        issue_id: issue_id.to_string(),
        response,
        override_created,
    })
}

/// `apply_feedback` plus event emission for hosts listening on the
/// dispatcher.
pub fn apply_feedback_with_events(
    memory: &mut ProjectMemory,
    issue_id: &str,
    response: FeedbackResponse,
    now: u64,
    dispatcher: &EventDispatcher,
) -> Result<AppliedFeedback, FeedbackError> {
    let applied = apply_feedback(memory, issue_id, response, now)?;
    if let Some((feature_key, mode)) = &applied.override_created {
        dispatcher.emit_override_created(&OverrideCreatedEvent {
            feature_key: feature_key.to_string(),
            mode: match mode {
                OverrideMode::Always => "always".to_string(),
                OverrideMode::Never => "never".to_string(),
            },
        });
    }
    Ok(applied)
}
