//! Sample-size-gated ratio confidence scoring.

pub mod model;

pub use model::ConfidenceModel;
