//! Persisted per-project memory model.
//!
//! `ProjectMemory` is the aggregate root: accumulated tallies, derived
//! standards, user overrides, decision history, and run history. It is
//! owned on disk by the memory store; components receive it by reference
//! and never touch persisted state directly.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::feature::FeatureKey;

/// Cumulative count of observed values for one feature key.
///
/// Invariant: `total_observations == value_counts.values().sum()`.
/// Mutated only by merging a run's observations; counts never decrease.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Observed value -> cumulative count. BTreeMap keeps the persisted
    /// document byte-stable across runs.
    pub value_counts: BTreeMap<String, u64>,
    pub total_observations: u64,
    pub last_updated_run: u64,
}

impl Tally {
    /// Add `count` occurrences of `value` from run `run_id`.
    pub fn add(&mut self, value: &str, count: u64, run_id: u64) {
        *self.value_counts.entry(value.to_string()).or_insert(0) += count;
        self.total_observations += count;
        self.last_updated_run = run_id;
    }

    /// The majority value and its count. Ties break toward the
    /// lexicographically smallest value so recomputation is deterministic.
    pub fn majority(&self) -> Option<(&str, u64)> {
        self.value_counts
            .iter()
            .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then(vb.cmp(va)))
            .map(|(v, c)| (v.as_str(), *c))
    }

    /// Check the additivity invariant.
    pub fn is_consistent(&self) -> bool {
        self.total_observations == self.value_counts.values().sum::<u64>()
    }
}

/// The derived standard for a feature key: majority value plus confidence.
/// Recomputed from the tally every run; never hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardPattern {
    pub feature_key: FeatureKey,
    pub value: String,
    /// Confidence in 0–100. Zero while the key is still observing.
    pub confidence: f64,
    pub support_count: u64,
    pub total_count: u64,
}

impl StandardPattern {
    /// Whether the standard has crossed the sample-size gate and the
    /// confidence can drive decisions.
    pub fn is_actionable(&self) -> bool {
        self.confidence > 0.0
    }
}

/// Permanent user-set rule that bypasses statistical confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    /// The enforced value for `Always`. `None` with `Never` means
    /// "never flag this feature key regardless of value".
    pub value: Option<String>,
    pub mode: OverrideMode,
    /// Unix timestamp when the user set this rule.
    pub set_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideMode {
    Always,
    Never,
}

/// Action class assigned to a detected deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    AutoFix,
    Recommend,
    Suggest,
    Ask,
}

impl Tier {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AutoFix => "auto_fix",
            Self::Recommend => "recommend",
            Self::Suggest => "suggest",
            Self::Ask => "ask",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User response to an emitted decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackResponse {
    Accept,
    Reject,
    Always,
    Never,
}

/// One emitted decision, appended to history when the policy fires and
/// mutated exactly once when feedback arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub issue_id: String,
    pub feature_key: FeatureKey,
    pub observed_value: String,
    /// The standard the occurrence deviated from, when one exists.
    pub expected_value: Option<String>,
    pub confidence: f64,
    pub tier: Tier,
    pub run_id: u64,
    pub timestamp: u64,
    pub user_response: Option<FeedbackResponse>,
}

impl DecisionRecord {
    pub fn is_pending(&self) -> bool {
        self.user_response.is_none()
    }
}

/// One line of run history, appended at the end of every merged run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunHistoryEntry {
    pub run_id: u64,
    pub timestamp: u64,
    pub observation_count: u64,
    pub decision_count: u64,
    pub drift_count: u64,
}

/// Learning phase derived from accumulated scan count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityPhase {
    /// No completed scans yet.
    New,
    /// Fewer than 5 scans: standards are forming.
    Growing,
    /// Fewer than 10 scans: standards are stabilizing.
    Maturing,
    /// 10 or more scans.
    Mature,
}

impl MaturityPhase {
    pub fn from_scan_count(scan_count: u64) -> Self {
        match scan_count {
            0 => Self::New,
            1..=4 => Self::Growing,
            5..=9 => Self::Maturing,
            _ => Self::Mature,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Growing => "growing",
            Self::Maturing => "maturing",
            Self::Mature => "mature",
        }
    }
}

impl fmt::Display for MaturityPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate root for everything the engine remembers about one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMemory {
    pub project_id: String,
    pub scan_count: u64,
    pub tallies: BTreeMap<FeatureKey, Tally>,
    pub standards: BTreeMap<FeatureKey, StandardPattern>,
    pub overrides: BTreeMap<FeatureKey, Override>,
    pub decision_history: Vec<DecisionRecord>,
    pub run_history: Vec<RunHistoryEntry>,
}

impl ProjectMemory {
    /// Fresh, empty-but-valid memory for a project.
    pub fn fresh(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            scan_count: 0,
            tallies: BTreeMap::new(),
            standards: BTreeMap::new(),
            overrides: BTreeMap::new(),
            decision_history: Vec::new(),
            run_history: Vec::new(),
        }
    }

    /// The run id the next merged run will carry.
    pub fn next_run_id(&self) -> u64 {
        self.scan_count + 1
    }

    pub fn maturity(&self) -> MaturityPhase {
        MaturityPhase::from_scan_count(self.scan_count)
    }

    /// Find a decision in history by issue id.
    pub fn find_decision_mut(&mut self, issue_id: &str) -> Option<&mut DecisionRecord> {
        self.decision_history
            .iter_mut()
            .find(|d| d.issue_id == issue_id)
    }

    pub fn find_decision(&self, issue_id: &str) -> Option<&DecisionRecord> {
        self.decision_history.iter().find(|d| d.issue_id == issue_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_additive() {
        let mut tally = Tally::default();
        tally.add("gray-200", 8, 1);
        tally.add("gray-300", 2, 1);
        tally.add("gray-200", 36, 2);
        tally.add("gray-300", 4, 2);
        assert_eq!(tally.total_observations, 50);
        assert!(tally.is_consistent());
        assert_eq!(tally.majority(), Some(("gray-200", 44)));
        assert_eq!(tally.last_updated_run, 2);
    }

    #[test]
    fn test_majority_tie_breaks_lexicographically() {
        let mut tally = Tally::default();
        tally.add("b-value", 5, 1);
        tally.add("a-value", 5, 1);
        assert_eq!(tally.majority(), Some(("a-value", 5)));
    }

    #[test]
    fn test_maturity_phases() {
        assert_eq!(MaturityPhase::from_scan_count(0), MaturityPhase::New);
        assert_eq!(MaturityPhase::from_scan_count(3), MaturityPhase::Growing);
        assert_eq!(MaturityPhase::from_scan_count(7), MaturityPhase::Maturing);
        assert_eq!(MaturityPhase::from_scan_count(10), MaturityPhase::Mature);
    }

    #[test]
    fn test_fresh_memory_is_valid() {
        let memory = ProjectMemory::fresh("abc123");
        assert_eq!(memory.scan_count, 0);
        assert!(memory.tallies.is_empty());
        assert_eq!(memory.maturity(), MaturityPhase::New);
    }
}
