//! Shared types: collections, feature identity, and the persisted memory model.

pub mod collections;
pub mod feature;
pub mod memory;

pub use feature::{FeatureCategory, FeatureKey, FixSafety, SourceLocation};
pub use memory::{
    DecisionRecord, FeedbackResponse, MaturityPhase, Override, OverrideMode, ProjectMemory,
    RunHistoryEntry, StandardPattern, Tally, Tier,
};
