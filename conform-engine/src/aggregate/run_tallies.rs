//! Frequency map for one run's observations.
//!
//! Aggregation is the synchronization barrier of a run: the full
//! observation set must be collected before this map is built, and no
//! decision is made from partial aggregation.

use std::collections::BTreeMap;

use conform_core::types::collections::FxHashMap;
use conform_core::types::{FeatureKey, ProjectMemory};

use crate::normalize::Observation;

/// Per-featureKey value counts for a single run.
#[derive(Debug, Default)]
pub struct RunTallies {
    counts: FxHashMap<FeatureKey, BTreeMap<String, u64>>,
    observation_count: u64,
}

impl RunTallies {
    /// Build the frequency map from the run's full observation set.
    pub fn from_observations(observations: &[Observation]) -> Self {
        let mut tallies = Self::default();
        for obs in observations {
            *tallies
                .counts
                .entry(obs.feature_key.clone())
                .or_default()
                .entry(obs.value.clone())
                .or_insert(0) += 1;
            tallies.observation_count += 1;
        }
        tallies
    }

    /// This run's value counts for a feature key.
    pub fn counts_for(&self, key: &FeatureKey) -> Option<&BTreeMap<String, u64>> {
        self.counts.get(key)
    }

    /// Total observations in this run for a feature key.
    pub fn total_for(&self, key: &FeatureKey) -> u64 {
        self.counts
            .get(key)
            .map(|c| c.values().sum())
            .unwrap_or(0)
    }

    pub fn observation_count(&self) -> u64 {
        self.observation_count
    }

    pub fn feature_key_count(&self) -> usize {
        self.counts.len()
    }

    /// Iterate feature keys in deterministic (sorted) order.
    pub fn sorted_keys(&self) -> Vec<&FeatureKey> {
        let mut keys: Vec<&FeatureKey> = self.counts.keys().collect();
        keys.sort();
        keys
    }

    /// Merge this run into project memory.
    ///
    /// Strictly additive: no stored count ever decreases, and
    /// `scan_count` is bumped by exactly one. Must be called exactly
    /// once per run; returns the run id the merge was recorded under.
    pub fn merge_into(&self, memory: &mut ProjectMemory) -> u64 {
        let run_id = memory.next_run_id();
        for (key, values) in &self.counts {
            let tally = memory.tallies.entry(key.clone()).or_default();
            for (value, count) in values {
                tally.add(value, *count, run_id);
            }
        }
        memory.scan_count += 1;
        run_id
    }
}

#[cfg(test)]
mod tests {
    use conform_core::types::SourceLocation;

    use super::*;

    fn obs(key: &str, value: &str) -> Observation {
        Observation {
            feature_key: FeatureKey::from(key.to_string()),
            value: value.to_string(),
            location: SourceLocation {
                file: "a.tsx".to_string(),
                line: 1,
            },
            run_id: 1,
            auto_fixable: true,
        }
    }

    #[test]
    fn test_frequency_map() {
        let observations = vec![
            obs("card.border", "gray-200"),
            obs("card.border", "gray-200"),
            obs("card.border", "gray-300"),
            obs("card.color", "text-gray-700"),
        ];
        let tallies = RunTallies::from_observations(&observations);
        assert_eq!(tallies.observation_count(), 4);
        assert_eq!(tallies.feature_key_count(), 2);

        let border = tallies
            .counts_for(&FeatureKey::from("card.border".to_string()))
            .unwrap();
        assert_eq!(border.get("gray-200"), Some(&2));
        assert_eq!(border.get("gray-300"), Some(&1));
    }

    #[test]
    fn test_merge_is_additive_and_bumps_scan_count_once() {
        let mut memory = ProjectMemory::fresh("p1");
        let run1 = RunTallies::from_observations(&[
            obs("card.border", "gray-200"),
            obs("card.border", "gray-300"),
        ]);
        let run_id = run1.merge_into(&mut memory);
        assert_eq!(run_id, 1);
        assert_eq!(memory.scan_count, 1);

        let run2 = RunTallies::from_observations(&[obs("card.border", "gray-200")]);
        let run_id = run2.merge_into(&mut memory);
        assert_eq!(run_id, 2);
        assert_eq!(memory.scan_count, 2);

        let tally = &memory.tallies[&FeatureKey::from("card.border".to_string())];
        assert_eq!(tally.value_counts["gray-200"], 2);
        assert_eq!(tally.value_counts["gray-300"], 1);
        assert_eq!(tally.total_observations, 3);
        assert!(tally.is_consistent());
        assert_eq!(tally.last_updated_run, 2);
    }
}
