//! Feature identity: keys, categories, and source locations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier for one recurring decision point,
/// scoped by pattern group and attribute category.
///
/// Rendered as `"<group>.<attribute>"`, e.g. `"card.border-color"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureKey(String);

impl FeatureKey {
    /// Build a key from a pattern-group name and an attribute category.
    pub fn new(group: &str, category: FeatureCategory) -> Self {
        Self(format!("{}.{}", group, category.attribute()))
    }

    /// The raw canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The attribute category encoded in this key, if recognizable.
    pub fn category(&self) -> Option<FeatureCategory> {
        let attribute = self.0.rsplit('.').next()?;
        FeatureCategory::from_attribute(attribute)
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FeatureKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Closed set of attribute categories the extraction collaborator emits.
///
/// The learning engine dispatches over this enum and stays decoupled
/// from any specific pattern taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureCategory {
    Color,
    Spacing,
    Typography,
    Border,
    Shadow,
    Transition,
    InteractionState,
    PropNaming,
    Structure,
}

impl FeatureCategory {
    /// Attribute segment used when building a `FeatureKey`.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::Typography => "typography",
            Self::Border => "border",
            Self::Shadow => "shadow",
            Self::Transition => "transition",
            Self::InteractionState => "interaction-state",
            Self::PropNaming => "prop-naming",
            Self::Structure => "structure",
        }
    }

    /// Parse a category from its attribute segment.
    pub fn from_attribute(attribute: &str) -> Option<Self> {
        match attribute {
            "color" => Some(Self::Color),
            "spacing" => Some(Self::Spacing),
            "typography" => Some(Self::Typography),
            "border" => Some(Self::Border),
            "shadow" => Some(Self::Shadow),
            "transition" => Some(Self::Transition),
            "interaction-state" => Some(Self::InteractionState),
            "prop-naming" => Some(Self::PropNaming),
            "structure" => Some(Self::Structure),
            _ => None,
        }
    }

    /// Whether deviations in this category are safe to apply automatically.
    ///
    /// Categories that affect control logic or component contracts rather
    /// than presentation are never auto-applied, regardless of confidence.
    pub fn fix_safety(&self) -> FixSafety {
        match self {
            Self::PropNaming | Self::Structure => FixSafety::Structural,
            _ => FixSafety::Presentational,
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Safety classification for applying a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixSafety {
    /// Purely presentational; eligible for automatic application.
    Presentational,
    /// Affects control logic or contracts; capped at a recommendation.
    Structural,
}

/// Location of an occurrence in the analyzed project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        let key = FeatureKey::new("card", FeatureCategory::Border);
        assert_eq!(key.as_str(), "card.border");
        assert_eq!(key.category(), Some(FeatureCategory::Border));
    }

    #[test]
    fn test_unknown_attribute() {
        let key = FeatureKey::from("card.frobnication".to_string());
        assert_eq!(key.category(), None);
    }

    #[test]
    fn test_structural_categories_capped() {
        assert_eq!(FeatureCategory::PropNaming.fix_safety(), FixSafety::Structural);
        assert_eq!(FeatureCategory::Structure.fix_safety(), FixSafety::Structural);
        assert_eq!(FeatureCategory::Color.fix_safety(), FixSafety::Presentational);
    }
}
