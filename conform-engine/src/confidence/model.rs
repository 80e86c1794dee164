//! Confidence recomputation from persisted tallies.
//!
//! Confidence is a pure function of the accumulated tally: the majority
//! value's share, reported only once the sample size crosses the
//! minimum threshold. There is no smoothing or decay; learning is
//! accumulated sample size, which is why a project needs several runs
//! before confidence becomes actionable.

use conform_core::types::{FeatureKey, ProjectMemory, StandardPattern, Tally};

/// Recomputes standards from tallies, fully from scratch each run.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceModel {
    min_sample_size: u64,
}

impl ConfidenceModel {
    pub fn new(min_sample_size: u64) -> Self {
        Self { min_sample_size }
    }

    /// Derive the standard for one feature key from its tally.
    ///
    /// The majority value always becomes the candidate standard, but its
    /// confidence is zero until `total_observations` strictly crosses the
    /// minimum sample size — below that the key stays in the observing
    /// state and drives no decisions.
    pub fn evaluate(&self, key: &FeatureKey, tally: &Tally) -> Option<StandardPattern> {
        let (value, support_count) = tally.majority()?;
        let total_count = tally.total_observations;

        let confidence = if total_count > self.min_sample_size {
            (support_count as f64 / total_count as f64) * 100.0
        } else {
            0.0
        };

        Some(StandardPattern {
            feature_key: key.clone(),
            value: value.to_string(),
            confidence,
            support_count,
            total_count,
        })
    }

    /// Recompute every standard in memory from its tally.
    ///
    /// Returns the keys whose standard became actionable in this
    /// recomputation (for event emission).
    pub fn recompute(&self, memory: &mut ProjectMemory) -> Vec<FeatureKey> {
        let mut newly_actionable = Vec::new();

        let mut standards = std::mem::take(&mut memory.standards);
        for (key, tally) in &memory.tallies {
            if let Some(standard) = self.evaluate(key, tally) {
                let was_actionable = standards
                    .get(key)
                    .map(|s| s.is_actionable())
                    .unwrap_or(false);
                if standard.is_actionable() && !was_actionable {
                    newly_actionable.push(key.clone());
                }
                standards.insert(key.clone(), standard);
            }
        }
        memory.standards = standards;

        newly_actionable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(pairs: &[(&str, u64)]) -> Tally {
        let mut t = Tally::default();
        for (value, count) in pairs {
            t.add(value, *count, 1);
        }
        t
    }

    #[test]
    fn test_below_gate_reports_zero() {
        let model = ConfidenceModel::new(10);
        let standard = model
            .evaluate(
                &FeatureKey::from("card.border".to_string()),
                &tally(&[("gray-200", 8), ("gray-300", 2)]),
            )
            .unwrap();
        // Total of 10 has not crossed the threshold of 10.
        assert_eq!(standard.confidence, 0.0);
        assert!(!standard.is_actionable());
        assert_eq!(standard.value, "gray-200");
        assert_eq!(standard.support_count, 8);
        assert_eq!(standard.total_count, 10);
    }

    #[test]
    fn test_above_gate_reports_ratio() {
        let model = ConfidenceModel::new(10);
        let standard = model
            .evaluate(
                &FeatureKey::from("card.border".to_string()),
                &tally(&[("gray-200", 44), ("gray-300", 6)]),
            )
            .unwrap();
        assert!((standard.confidence - 88.0).abs() < 1e-9);
        assert!(standard.is_actionable());
    }

    #[test]
    fn test_confidence_monotone_in_support() {
        let model = ConfidenceModel::new(10);
        let key = FeatureKey::from("k".to_string());
        let low = model
            .evaluate(&key, &tally(&[("a", 30), ("b", 20)]))
            .unwrap();
        let high = model
            .evaluate(&key, &tally(&[("a", 40), ("b", 10)]))
            .unwrap();
        // Same total, more support => higher confidence.
        assert!(high.confidence > low.confidence);
    }

    #[test]
    fn test_empty_tally_has_no_standard() {
        let model = ConfidenceModel::new(10);
        assert!(model
            .evaluate(&FeatureKey::from("k".to_string()), &Tally::default())
            .is_none());
    }

    #[test]
    fn test_recompute_flags_newly_actionable() {
        let model = ConfidenceModel::new(10);
        let mut memory = ProjectMemory::fresh("p");
        let key = FeatureKey::from("card.border".to_string());
        memory
            .tallies
            .insert(key.clone(), tally(&[("gray-200", 8), ("gray-300", 2)]));

        let newly = model.recompute(&mut memory);
        assert!(newly.is_empty());

        memory
            .tallies
            .get_mut(&key)
            .unwrap()
            .add("gray-200", 36, 2);
        memory.tallies.get_mut(&key).unwrap().add("gray-300", 4, 2);

        let newly = model.recompute(&mut memory);
        assert_eq!(newly, vec![key.clone()]);
        assert!((memory.standards[&key].confidence - 88.0).abs() < 1e-9);
    }
}
