//! The per-run pipeline: normalize, aggregate, merge, score, decide.

pub mod pipeline;

pub use pipeline::{AnalysisPipeline, RunDiagnostics, RunReport};
