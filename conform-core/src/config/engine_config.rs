//! Learning engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the learning engine thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum total observations before a standard becomes actionable.
    /// Default: 10.
    pub min_sample_size: Option<u64>,
    /// Share of this run's observations a non-standard value must strictly
    /// exceed to flag drift. Default: 0.5.
    pub drift_share_threshold: Option<f64>,
    /// Confidence at or above which a deviation is auto-fixed. Default: 90.
    pub auto_fix_confidence: Option<f64>,
    /// Confidence at or above which a fix is recommended. Default: 70.
    pub recommend_confidence: Option<f64>,
    /// Confidence at or above which a fix is suggested. Default: 50.
    pub suggest_confidence: Option<f64>,
}

impl EngineConfig {
    /// Effective minimum sample size, defaulting to 10.
    pub fn effective_min_sample_size(&self) -> u64 {
        self.min_sample_size.unwrap_or(10)
    }

    /// Effective drift share threshold, defaulting to 0.5.
    pub fn effective_drift_share_threshold(&self) -> f64 {
        self.drift_share_threshold.unwrap_or(0.5)
    }

    pub fn effective_auto_fix_confidence(&self) -> f64 {
        self.auto_fix_confidence.unwrap_or(90.0)
    }

    pub fn effective_recommend_confidence(&self) -> f64 {
        self.recommend_confidence.unwrap_or(70.0)
    }

    pub fn effective_suggest_confidence(&self) -> f64 {
        self.suggest_confidence.unwrap_or(50.0)
    }
}
