//! Decision output types, sufficient for a report renderer without
//! recomputation.

use conform_core::types::{DecisionRecord, FeatureKey, SourceLocation, Tier};
use serde::Serialize;

/// A fix the engine proposes alongside a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposedFix {
    /// Canonical replacement value (the standard).
    pub replacement: String,
}

/// One emitted decision for a detected deviation.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub issue_id: String,
    pub feature_key: FeatureKey,
    pub observed_value: String,
    /// The standard deviated from; absent while the key is observing
    /// and the decision is an open question.
    pub expected_value: Option<String>,
    pub confidence: f64,
    pub tier: Tier,
    /// Present for every tier except ASK, which implies no resolution.
    pub fix: Option<ProposedFix>,
    pub location: SourceLocation,
    pub auto_fixable: bool,
    pub run_id: u64,
}

impl Decision {
    /// The history record persisted for this decision.
    pub fn to_record(&self, timestamp: u64) -> DecisionRecord {
        DecisionRecord {
            issue_id: self.issue_id.clone(),
            feature_key: self.feature_key.clone(),
            observed_value: self.observed_value.clone(),
            expected_value: self.expected_value.clone(),
            confidence: self.confidence,
            tier: self.tier,
            run_id: self.run_id,
            timestamp,
            user_response: None,
        }
    }
}
