//! # conform-engine
//!
//! The Conform learning engine: normalizes raw pattern occurrences,
//! aggregates per-run tallies, merges them into project memory, scores
//! confidence, detects drift, and maps deviations to action tiers.

pub mod aggregate;
pub mod confidence;
pub mod drift;
pub mod feedback;
pub mod normalize;
pub mod policy;
pub mod run;
