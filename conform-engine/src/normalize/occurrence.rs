//! Input and output types of the normalization step.

use conform_core::types::{FeatureKey, SourceLocation};
use serde::{Deserialize, Serialize};

/// One raw pattern occurrence from the extraction collaborator.
///
/// The descriptor is opaque to the engine: a bundle of surface tokens
/// (class names, prop names, modifier lists) whose irrelevant variation
/// the normalizer cancels out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOccurrence {
    /// Attribute category tag, e.g. `"color"` or `"spacing"`.
    /// Unknown tags fail normalization and the occurrence is skipped.
    pub category: String,
    /// Pattern-group name, e.g. `"card"` or `"submit-button"`.
    pub group: String,
    /// Raw descriptor text for the decision point.
    pub descriptor: String,
    pub location: SourceLocation,
    /// Whether the collaborator can mechanically rewrite this occurrence.
    #[serde(default = "default_auto_fixable")]
    pub auto_fixable: bool,
}

fn default_auto_fixable() -> bool {
    true
}

/// A normalized occurrence. Immutable; discarded after aggregation —
/// only tallies persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub feature_key: FeatureKey,
    pub value: String,
    pub location: SourceLocation,
    pub run_id: u64,
    pub auto_fixable: bool,
}
