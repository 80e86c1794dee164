//! Event payload types.

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub project_id: String,
    pub run_id: u64,
    pub occurrence_count: usize,
}

/// Payload for `on_run_completed`.
#[derive(Debug, Clone)]
pub struct RunCompletedEvent {
    pub project_id: String,
    pub run_id: u64,
    pub decision_count: usize,
    pub drift_count: usize,
    pub duration_ms: u64,
}

/// Payload for `on_standard_established`.
#[derive(Debug, Clone)]
pub struct StandardEstablishedEvent {
    pub feature_key: String,
    pub value: String,
    pub confidence: f64,
}

/// Payload for `on_drift_detected`.
#[derive(Debug, Clone)]
pub struct DriftDetectedEvent {
    pub feature_key: String,
    pub standard_value: String,
    pub challenger_value: String,
    pub run_share: f64,
}

/// Payload for `on_decision_emitted`.
#[derive(Debug, Clone)]
pub struct DecisionEmittedEvent {
    pub issue_id: String,
    pub feature_key: String,
    pub tier: String,
    pub confidence: f64,
}

/// Payload for `on_override_created`.
#[derive(Debug, Clone)]
pub struct OverrideCreatedEvent {
    pub feature_key: String,
    pub mode: String,
}

/// Payload for `on_memory_degraded`.
#[derive(Debug, Clone)]
pub struct MemoryDegradedEvent {
    pub project_id: String,
    pub reason: String,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
