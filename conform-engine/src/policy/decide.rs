//! The four-tier decision state machine.

use conform_core::config::EngineConfig;
use conform_core::types::{
    FixSafety, Override, OverrideMode, StandardPattern, Tier,
};
use xxhash_rust::xxh3::xxh3_64;

use crate::normalize::Observation;

use super::types::{Decision, ProposedFix};

/// Confidence cutoffs for the action tiers.
#[derive(Debug, Clone, Copy)]
pub struct TierThresholds {
    pub auto_fix: f64,
    pub recommend: f64,
    pub suggest: f64,
}

impl TierThresholds {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            auto_fix: config.effective_auto_fix_confidence(),
            recommend: config.effective_recommend_confidence(),
            suggest: config.effective_suggest_confidence(),
        }
    }

    /// Tier for a given effective confidence, before safety capping.
    pub fn tier_for(&self, confidence: f64) -> Tier {
        if confidence >= self.auto_fix {
            Tier::AutoFix
        } else if confidence >= self.recommend {
            Tier::Recommend
        } else if confidence >= self.suggest {
            Tier::Suggest
        } else {
            Tier::Ask
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            auto_fix: 90.0,
            recommend: 70.0,
            suggest: 50.0,
        }
    }
}

/// The standard in effect for a feature key after overrides.
#[derive(Debug, Clone)]
pub enum EffectiveStandard<'a> {
    /// NEVER override: no issue is ever reported for this key.
    Suppressed,
    /// ALWAYS override: the value is enforced at confidence 100.
    Forced(&'a str),
    /// The computed standard (actionable or still observing).
    Computed(&'a StandardPattern),
    /// No tally has ever been recorded for this key.
    Unknown,
}

impl<'a> EffectiveStandard<'a> {
    /// Resolve the standard in effect from the computed standard and any
    /// override. Overrides take precedence unconditionally.
    pub fn resolve(
        standard: Option<&'a StandardPattern>,
        rule: Option<&'a Override>,
    ) -> Self {
        match rule {
            Some(o) if o.mode == OverrideMode::Never => Self::Suppressed,
            Some(o) if o.mode == OverrideMode::Always => {
                match o.value.as_deref().or(standard.map(|s| s.value.as_str())) {
                    Some(value) => Self::Forced(value),
                    None => Self::Suppressed,
                }
            }
            _ => match standard {
                Some(s) => Self::Computed(s),
                None => Self::Unknown,
            },
        }
    }
}

/// Maps (severity, confidence, auto-fixability) to an action tier.
#[derive(Debug, Clone, Copy)]
pub struct DecisionPolicy {
    thresholds: TierThresholds,
}

impl DecisionPolicy {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    /// Decide on one observation against the standard in effect.
    ///
    /// Returns `None` when the observation conforms, the key is
    /// suppressed by a NEVER override, or no standard exists yet.
    pub fn decide(
        &self,
        observation: &Observation,
        effective: &EffectiveStandard<'_>,
    ) -> Option<Decision> {
        let (expected, confidence) = match effective {
            EffectiveStandard::Suppressed | EffectiveStandard::Unknown => return None,
            EffectiveStandard::Forced(value) => {
                if observation.value == *value {
                    return None;
                }
                (Some(value.to_string()), 100.0)
            }
            EffectiveStandard::Computed(standard) => {
                if observation.value == standard.value {
                    return None;
                }
                if standard.is_actionable() {
                    (Some(standard.value.clone()), standard.confidence)
                } else {
                    // Observing state: an open question with no implied
                    // resolution.
                    (None, 0.0)
                }
            }
        };

        let tier = self.cap_tier(self.thresholds.tier_for(confidence), observation);

        let fix = match (&expected, tier) {
            (Some(value), Tier::AutoFix | Tier::Recommend | Tier::Suggest) => {
                Some(ProposedFix {
                    replacement: value.clone(),
                })
            }
            _ => None,
        };

        Some(Decision {
            issue_id: issue_id(observation),
            feature_key: observation.feature_key.clone(),
            observed_value: observation.value.clone(),
            expected_value: expected,
            confidence,
            tier,
            fix,
            location: observation.location.clone(),
            auto_fixable: observation.auto_fixable,
            run_id: observation.run_id,
        })
    }

    /// AUTO_FIX degrades to RECOMMEND when the occurrence is not
    /// mechanically fixable, and is never allowed for structurally
    /// unsafe categories regardless of confidence. Hard policy
    /// invariant, not part of the confidence computation.
    fn cap_tier(&self, tier: Tier, observation: &Observation) -> Tier {
        if tier != Tier::AutoFix {
            return tier;
        }
        let structural = observation
            .feature_key
            .category()
            .map(|c| c.fix_safety() == FixSafety::Structural)
            .unwrap_or(true);
        if structural || !observation.auto_fixable {
            Tier::Recommend
        } else {
            Tier::AutoFix
        }
    }
}

/// Deterministic issue id: replaying the same observations against the
/// same memory snapshot yields identical decisions.
fn issue_id(observation: &Observation) -> String {
    let seed = format!(
        "{}:{}:{}:{}",
        observation.run_id, observation.feature_key, observation.location, observation.value
    );
    format!("iss-{:016x}", xxh3_64(seed.as_bytes()))
}

#[cfg(test)]
mod tests {
    use conform_core::types::{FeatureKey, SourceLocation};

    use super::*;

    fn obs(key: &str, value: &str, auto_fixable: bool) -> Observation {
        Observation {
            feature_key: FeatureKey::from(key.to_string()),
            value: value.to_string(),
            location: SourceLocation {
                file: "a.tsx".to_string(),
                line: 3,
            },
            run_id: 2,
            auto_fixable,
        }
    }

    fn standard(key: &str, value: &str, confidence: f64) -> StandardPattern {
        StandardPattern {
            feature_key: FeatureKey::from(key.to_string()),
            value: value.to_string(),
            confidence,
            support_count: 0,
            total_count: 0,
        }
    }

    fn policy() -> DecisionPolicy {
        DecisionPolicy::new(TierThresholds::default())
    }

    #[test]
    fn test_tier_table() {
        let t = TierThresholds::default();
        assert_eq!(t.tier_for(95.0), Tier::AutoFix);
        assert_eq!(t.tier_for(90.0), Tier::AutoFix);
        assert_eq!(t.tier_for(88.0), Tier::Recommend);
        assert_eq!(t.tier_for(70.0), Tier::Recommend);
        assert_eq!(t.tier_for(69.9), Tier::Suggest);
        assert_eq!(t.tier_for(50.0), Tier::Suggest);
        assert_eq!(t.tier_for(49.9), Tier::Ask);
        assert_eq!(t.tier_for(0.0), Tier::Ask);
    }

    #[test]
    fn test_conforming_observation_yields_nothing() {
        let s = standard("card.border", "gray-200", 95.0);
        let decision = policy().decide(
            &obs("card.border", "gray-200", true),
            &EffectiveStandard::Computed(&s),
        );
        assert!(decision.is_none());
    }

    #[test]
    fn test_high_confidence_deviation_auto_fixes() {
        let s = standard("card.border", "gray-200", 95.0);
        let decision = policy()
            .decide(
                &obs("card.border", "gray-300", true),
                &EffectiveStandard::Computed(&s),
            )
            .unwrap();
        assert_eq!(decision.tier, Tier::AutoFix);
        assert_eq!(decision.fix.as_ref().unwrap().replacement, "gray-200");
    }

    #[test]
    fn test_not_auto_fixable_degrades_to_recommend() {
        let s = standard("card.border", "gray-200", 95.0);
        let decision = policy()
            .decide(
                &obs("card.border", "gray-300", false),
                &EffectiveStandard::Computed(&s),
            )
            .unwrap();
        assert_eq!(decision.tier, Tier::Recommend);
    }

    #[test]
    fn test_structural_category_capped_at_recommend() {
        let s = standard("form.prop-naming", "on-submit", 100.0);
        let decision = policy()
            .decide(
                &obs("form.prop-naming", "handle-submit", true),
                &EffectiveStandard::Computed(&s),
            )
            .unwrap();
        assert_eq!(decision.tier, Tier::Recommend);
    }

    #[test]
    fn test_observing_deviation_is_open_question() {
        let s = standard("card.border", "gray-200", 0.0);
        let decision = policy()
            .decide(
                &obs("card.border", "gray-300", true),
                &EffectiveStandard::Computed(&s),
            )
            .unwrap();
        assert_eq!(decision.tier, Tier::Ask);
        assert_eq!(decision.expected_value, None);
        assert!(decision.fix.is_none());
    }

    #[test]
    fn test_always_override_forces_auto_fix() {
        let rule = Override {
            value: Some("hover:bg-blue-600".to_string()),
            mode: OverrideMode::Always,
            set_at: 0,
        };
        let effective = EffectiveStandard::resolve(None, Some(&rule));
        let decision = policy()
            .decide(
                &obs("button.interaction-state", "hover:bg-blue-500", true),
                &effective,
            )
            .unwrap();
        assert_eq!(decision.tier, Tier::AutoFix);
        assert_eq!(decision.confidence, 100.0);
    }

    #[test]
    fn test_never_override_suppresses_everything() {
        let s = standard("card.border", "gray-200", 100.0);
        let rule = Override {
            value: None,
            mode: OverrideMode::Never,
            set_at: 0,
        };
        let effective = EffectiveStandard::resolve(Some(&s), Some(&rule));
        let decision = policy().decide(&obs("card.border", "gray-300", true), &effective);
        assert!(decision.is_none());
    }

    #[test]
    fn test_issue_ids_are_deterministic() {
        let s = standard("card.border", "gray-200", 95.0);
        let o = obs("card.border", "gray-300", true);
        let a = policy()
            .decide(&o, &EffectiveStandard::Computed(&s))
            .unwrap();
        let b = policy()
            .decide(&o, &EffectiveStandard::Computed(&s))
            .unwrap();
        assert_eq!(a.issue_id, b.issue_id);
    }
}
