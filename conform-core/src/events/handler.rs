//! Event handler trait with default no-op methods.

use super::types::*;

/// Receives engine lifecycle events. All methods default to no-ops so
/// handlers only implement what they care about.
pub trait ConformEventHandler: Send + Sync {
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_run_completed(&self, _event: &RunCompletedEvent) {}
    fn on_standard_established(&self, _event: &StandardEstablishedEvent) {}
    fn on_drift_detected(&self, _event: &DriftDetectedEvent) {}
    fn on_decision_emitted(&self, _event: &DecisionEmittedEvent) {}
    fn on_override_created(&self, _event: &OverrideCreatedEvent) {}
    fn on_memory_degraded(&self, _event: &MemoryDegradedEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
