//! Decision policy: mapping deviations to action tiers.

pub mod decide;
pub mod types;

pub use decide::{DecisionPolicy, EffectiveStandard, TierThresholds};
pub use types::{Decision, ProposedFix};
