//! Run-local drift detection against established standards.

pub mod detector;

pub use detector::{DriftDetector, DriftFlag};
