//! Drift detection: a run-wide majority shift away from the standard.
//!
//! Distinct from ordinary deviation handling: a single off-pattern
//! occurrence is a deviation for the decision policy; drift is a
//! challenger value taking the majority of this run's observations for
//! a key that already has an actionable standard. Drift is advisory —
//! it surfaces the question "does the standard need to change?" and
//! never applies anything.

use std::collections::BTreeMap;

use conform_core::types::{FeatureKey, StandardPattern};
use serde::Serialize;

/// Advisory flag for a suspected standard shift.
#[derive(Debug, Clone, Serialize)]
pub struct DriftFlag {
    pub feature_key: FeatureKey,
    pub standard_value: String,
    /// The value outpacing the standard within this run.
    pub challenger_value: String,
    /// The challenger's share of this run's observations for the key.
    pub run_share: f64,
    pub run_total: u64,
}

/// Compares a run's fresh counts against the stored standard.
#[derive(Debug, Clone, Copy)]
pub struct DriftDetector {
    share_threshold: f64,
}

impl DriftDetector {
    pub fn new(share_threshold: f64) -> Self {
        Self { share_threshold }
    }

    /// Flag drift when a single non-standard value's share of this run's
    /// observations strictly exceeds the threshold. Keys still in the
    /// observing state never drift.
    pub fn detect(
        &self,
        standard: &StandardPattern,
        run_counts: &BTreeMap<String, u64>,
    ) -> Option<DriftFlag> {
        if !standard.is_actionable() {
            return None;
        }

        let run_total: u64 = run_counts.values().sum();
        if run_total == 0 {
            return None;
        }

        let (challenger, challenger_count) = run_counts
            .iter()
            .filter(|(value, _)| **value != standard.value)
            .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then(vb.cmp(va)))?;

        let share = *challenger_count as f64 / run_total as f64;
        if share > self.share_threshold {
            Some(DriftFlag {
                feature_key: standard.feature_key.clone(),
                standard_value: standard.value.clone(),
                challenger_value: challenger.clone(),
                run_share: share,
                run_total,
            })
        } else {
            None
        }
    }
}
