//! Deterministic, order-independent canonicalization.

use conform_core::errors::NormalizeError;
use conform_core::types::{FeatureCategory, FeatureKey};

use super::occurrence::{Observation, RawOccurrence};

/// Converts raw occurrences into canonical `(FeatureKey, value)` pairs.
///
/// The same underlying construct always yields the same pair across
/// runs: whitespace is collapsed, tokens are case-folded, and modifier
/// ordering is canonicalized by sorting.
pub struct FeatureNormalizer;

impl FeatureNormalizer {
    /// Normalize one raw occurrence for the given run.
    ///
    /// Fails with `UnrecognizedPattern` when the category tag is not in
    /// the closed category set; callers skip the occurrence rather than
    /// abort the run.
    pub fn normalize(
        occurrence: &RawOccurrence,
        run_id: u64,
    ) -> Result<Observation, NormalizeError> {
        let category = FeatureCategory::from_attribute(&occurrence.category).ok_or_else(|| {
            NormalizeError::UnrecognizedPattern {
                category: occurrence.category.clone(),
                location: occurrence.location.to_string(),
            }
        })?;

        let value = Self::canonical_value(&occurrence.descriptor);
        if value.is_empty() {
            return Err(NormalizeError::EmptyDescriptor {
                group: occurrence.group.clone(),
                location: occurrence.location.to_string(),
            });
        }

        Ok(Observation {
            feature_key: FeatureKey::new(&occurrence.group, category),
            value,
            location: occurrence.location.clone(),
            run_id,
            auto_fixable: occurrence.auto_fixable,
        })
    }

    /// Canonical form of a descriptor: case-folded tokens, deduplicated,
    /// sorted, joined by single spaces.
    pub fn canonical_value(descriptor: &str) -> String {
        let mut tokens: Vec<String> = descriptor
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();
        tokens.sort();
        tokens.dedup();
        tokens.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use conform_core::types::SourceLocation;

    use super::*;

    fn occurrence(category: &str, descriptor: &str) -> RawOccurrence {
        RawOccurrence {
            category: category.to_string(),
            group: "card".to_string(),
            descriptor: descriptor.to_string(),
            location: SourceLocation {
                file: "src/Card.tsx".to_string(),
                line: 12,
            },
            auto_fixable: true,
        }
    }

    #[test]
    fn test_whitespace_and_order_independent() {
        let a = FeatureNormalizer::normalize(&occurrence("border", "rounded-md  border-gray-200"), 1)
            .unwrap();
        let b = FeatureNormalizer::normalize(&occurrence("border", "border-gray-200 rounded-md"), 1)
            .unwrap();
        assert_eq!(a.feature_key, b.feature_key);
        assert_eq!(a.value, b.value);
        assert_eq!(a.value, "border-gray-200 rounded-md");
    }

    #[test]
    fn test_case_folded_and_deduplicated() {
        let obs =
            FeatureNormalizer::normalize(&occurrence("color", "Text-Gray-700 text-gray-700"), 1)
                .unwrap();
        assert_eq!(obs.value, "text-gray-700");
    }

    #[test]
    fn test_unknown_category_is_skippable_error() {
        let err = FeatureNormalizer::normalize(&occurrence("hologram", "x"), 1).unwrap_err();
        assert!(matches!(err, NormalizeError::UnrecognizedPattern { .. }));
    }

    #[test]
    fn test_empty_descriptor_rejected() {
        let err = FeatureNormalizer::normalize(&occurrence("color", "   "), 1).unwrap_err();
        assert!(matches!(err, NormalizeError::EmptyDescriptor { .. }));
    }

    #[test]
    fn test_key_scoped_by_group_and_category() {
        let obs = FeatureNormalizer::normalize(&occurrence("border", "border-gray-200"), 1).unwrap();
        assert_eq!(obs.feature_key.as_str(), "card.border");
    }
}
