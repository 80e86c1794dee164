//! Feature normalization: raw occurrences to canonical key/value pairs.

pub mod normalizer;
pub mod occurrence;

pub use normalizer::FeatureNormalizer;
pub use occurrence::{Observation, RawOccurrence};
