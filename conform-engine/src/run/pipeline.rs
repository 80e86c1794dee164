//! Run orchestration.
//!
//! Strict order: observations are produced, then aggregated, then merged,
//! then decided upon. No decision is made from partial aggregation; the
//! aggregator boundary is the synchronization barrier for any upstream
//! parallelism in the extraction collaborator.

use std::collections::HashMap;
use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use conform_core::config::ConformConfig;
use conform_core::errors::{ConformErrorCode, EngineError};
use conform_core::events::types::{
    DecisionEmittedEvent, DriftDetectedEvent, ErrorEvent, RunCompletedEvent, RunStartedEvent,
    StandardEstablishedEvent,
};
use conform_core::events::EventDispatcher;
use conform_core::types::{MaturityPhase, ProjectMemory, RunHistoryEntry, Tier};

use crate::aggregate::RunTallies;
use crate::confidence::ConfidenceModel;
use crate::drift::{DriftDetector, DriftFlag};
use crate::normalize::{FeatureNormalizer, Observation, RawOccurrence};
use crate::policy::{Decision, DecisionPolicy, EffectiveStandard, TierThresholds};

/// Everything a reporting collaborator needs from one run.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: u64,
    /// Decisions in occurrence order.
    pub decisions: Vec<Decision>,
    /// Advisory drift flags, sorted by feature key.
    pub drift_flags: Vec<DriftFlag>,
    pub diagnostics: RunDiagnostics,
    /// Non-fatal errors (skipped occurrences).
    pub errors: Vec<EngineError>,
}

/// Summary counters for one run.
#[derive(Debug, Clone)]
pub struct RunDiagnostics {
    pub occurrence_count: usize,
    pub skipped_count: usize,
    pub observation_count: u64,
    pub feature_key_count: usize,
    pub decision_count: usize,
    pub decisions_per_tier: HashMap<Tier, usize>,
    pub drift_count: usize,
    pub newly_actionable_count: usize,
    pub maturity: MaturityPhase,
}

impl fmt::Display for RunDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RunDiagnostics {{ occurrences={}, skipped={}, keys={}, decisions={}, drift={}, newly_actionable={}, maturity={} }}",
            self.occurrence_count,
            self.skipped_count,
            self.feature_key_count,
            self.decision_count,
            self.drift_count,
            self.newly_actionable_count,
            self.maturity,
        )
    }
}

/// One-run analysis pipeline over a loaded `ProjectMemory`.
pub struct AnalysisPipeline<'a> {
    config: &'a ConformConfig,
    dispatcher: &'a EventDispatcher,
}

impl<'a> AnalysisPipeline<'a> {
    pub fn new(config: &'a ConformConfig, dispatcher: &'a EventDispatcher) -> Self {
        Self { config, dispatcher }
    }

    /// Execute one run over the full, already-collected occurrence set.
    ///
    /// Mutates `memory` in place (tallies, standards, decision history,
    /// run history); persisting the result is the memory store's job and
    /// the caller's responsibility.
    pub fn execute(
        &self,
        occurrences: &[RawOccurrence],
        memory: &mut ProjectMemory,
    ) -> RunReport {
        let started = Instant::now();
        let run_id = memory.next_run_id();

        self.dispatcher.emit_run_started(&RunStartedEvent {
            project_id: memory.project_id.clone(),
            run_id,
            occurrence_count: occurrences.len(),
        });

        // Phase 1: normalize, skipping unrecognized occurrences.
        let mut observations: Vec<Observation> = Vec::with_capacity(occurrences.len());
        let mut errors: Vec<EngineError> = Vec::new();
        for occurrence in occurrences {
            match FeatureNormalizer::normalize(occurrence, run_id) {
                Ok(obs) => observations.push(obs),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping occurrence");
                    self.dispatcher.emit_error(&ErrorEvent {
                        message: e.to_string(),
                        error_code: e.error_code().to_string(),
                    });
                    errors.push(e.into());
                }
            }
        }

        // Phase 2: aggregate the full observation set, then merge once.
        // Drift is judged against the standards as they stood when the
        // run began; snapshot them before the merge can move them.
        let prior_standards = memory.standards.clone();
        let run_tallies = RunTallies::from_observations(&observations);
        let merged_run_id = run_tallies.merge_into(memory);
        debug_assert_eq!(merged_run_id, run_id);

        // Phase 3: recompute standards from the updated tallies.
        let model = ConfidenceModel::new(self.config.engine.effective_min_sample_size());
        let newly_actionable = model.recompute(memory);
        for key in &newly_actionable {
            if let Some(standard) = memory.standards.get(key) {
                self.dispatcher
                    .emit_standard_established(&StandardEstablishedEvent {
                        feature_key: key.to_string(),
                        value: standard.value.clone(),
                        confidence: standard.confidence,
                    });
            }
        }

        // Phase 4: drift flags for keys that already had an actionable
        // standard before this run's counts were merged. Comparing
        // against the post-merge standard would let a majority-flipping
        // run rewrite the standard without ever raising the question.
        let detector =
            DriftDetector::new(self.config.engine.effective_drift_share_threshold());
        let mut drift_flags: Vec<DriftFlag> = Vec::new();
        for key in run_tallies.sorted_keys() {
            let (Some(standard), Some(counts)) =
                (prior_standards.get(key), run_tallies.counts_for(key))
            else {
                continue;
            };
            if let Some(flag) = detector.detect(standard, counts) {
                self.dispatcher.emit_drift_detected(&DriftDetectedEvent {
                    feature_key: flag.feature_key.to_string(),
                    standard_value: flag.standard_value.clone(),
                    challenger_value: flag.challenger_value.clone(),
                    run_share: flag.run_share,
                });
                drift_flags.push(flag);
            }
        }

        // Phase 5: decisions, in occurrence order.
        let policy = DecisionPolicy::new(TierThresholds::from_config(&self.config.engine));
        let mut decisions: Vec<Decision> = Vec::new();
        for obs in &observations {
            let effective = EffectiveStandard::resolve(
                memory.standards.get(&obs.feature_key),
                memory.overrides.get(&obs.feature_key),
            );
            if let Some(decision) = policy.decide(obs, &effective) {
                self.dispatcher.emit_decision_emitted(&DecisionEmittedEvent {
                    issue_id: decision.issue_id.clone(),
                    feature_key: decision.feature_key.to_string(),
                    tier: decision.tier.to_string(),
                    confidence: decision.confidence,
                });
                decisions.push(decision);
            }
        }

        // Phase 6: history and diagnostics.
        let timestamp = unix_now();
        for decision in &decisions {
            memory.decision_history.push(decision.to_record(timestamp));
        }
        memory.run_history.push(RunHistoryEntry {
            run_id,
            timestamp,
            observation_count: run_tallies.observation_count(),
            decision_count: decisions.len() as u64,
            drift_count: drift_flags.len() as u64,
        });

        let mut decisions_per_tier: HashMap<Tier, usize> = HashMap::new();
        for decision in &decisions {
            *decisions_per_tier.entry(decision.tier).or_insert(0) += 1;
        }

        let diagnostics = RunDiagnostics {
            occurrence_count: occurrences.len(),
            skipped_count: errors.len(),
            observation_count: run_tallies.observation_count(),
            feature_key_count: run_tallies.feature_key_count(),
            decision_count: decisions.len(),
            decisions_per_tier,
            drift_count: drift_flags.len(),
            newly_actionable_count: newly_actionable.len(),
            maturity: memory.maturity(),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(run_id, %diagnostics, duration_ms, "run complete");
        self.dispatcher.emit_run_completed(&RunCompletedEvent {
            project_id: memory.project_id.clone(),
            run_id,
            decision_count: decisions.len(),
            drift_count: drift_flags.len(),
            duration_ms,
        });

        RunReport {
            run_id,
            decisions,
            drift_flags,
            diagnostics,
            errors,
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use conform_core::types::SourceLocation;

    use super::*;

    fn occurrence(group: &str, category: &str, descriptor: &str, line: u32) -> RawOccurrence {
        RawOccurrence {
            category: category.to_string(),
            group: group.to_string(),
            descriptor: descriptor.to_string(),
            location: SourceLocation {
                file: "src/Card.tsx".to_string(),
                line,
            },
            auto_fixable: true,
        }
    }

    fn run(
        occurrences: &[RawOccurrence],
        memory: &mut ProjectMemory,
    ) -> RunReport {
        let config = ConformConfig::default();
        let dispatcher = EventDispatcher::new();
        AnalysisPipeline::new(&config, &dispatcher).execute(occurrences, memory)
    }

    #[test]
    fn test_unrecognized_occurrences_skipped_not_fatal() {
        let mut memory = ProjectMemory::fresh("p");
        let occurrences = vec![
            occurrence("card", "border", "gray-200", 1),
            occurrence("card", "hologram", "x", 2),
        ];
        let report = run(&occurrences, &mut memory);
        assert_eq!(report.diagnostics.observation_count, 1);
        assert_eq!(report.diagnostics.skipped_count, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(memory.scan_count, 1);
    }

    #[test]
    fn test_first_run_observing_deviations_ask() {
        let mut memory = ProjectMemory::fresh("p");
        let mut occurrences: Vec<RawOccurrence> = (0..8)
            .map(|i| occurrence("card", "border", "gray-200", i))
            .collect();
        occurrences.push(occurrence("card", "border", "gray-300", 100));
        occurrences.push(occurrence("card", "border", "gray-300", 101));

        let report = run(&occurrences, &mut memory);
        // Total of 10 has not crossed the sample-size gate: every
        // deviation is an open question.
        assert_eq!(report.diagnostics.decision_count, 2);
        for decision in &report.decisions {
            assert_eq!(decision.tier, Tier::Ask);
            assert_eq!(decision.expected_value, None);
        }
        assert!(report.drift_flags.is_empty());
    }

    #[test]
    fn test_second_run_recommend_scenario() {
        let mut memory = ProjectMemory::fresh("p");

        // Run 1: 8 gray-200, 2 gray-300.
        let mut occurrences: Vec<RawOccurrence> = (0..8)
            .map(|i| occurrence("card", "border", "gray-200", i))
            .collect();
        occurrences.extend((8..10).map(|i| occurrence("card", "border", "gray-300", i)));
        run(&occurrences, &mut memory);

        // Run 2: 36 more gray-200, 4 gray-300 → 44/50 = 88%.
        let mut occurrences: Vec<RawOccurrence> = (0..36)
            .map(|i| occurrence("card", "border", "gray-200", i))
            .collect();
        occurrences.extend((36..40).map(|i| occurrence("card", "border", "gray-300", i)));
        let report = run(&occurrences, &mut memory);

        assert_eq!(memory.scan_count, 2);
        let deviation = report
            .decisions
            .iter()
            .find(|d| d.observed_value == "gray-300")
            .unwrap();
        assert!((deviation.confidence - 88.0).abs() < 1e-9);
        assert_eq!(deviation.tier, Tier::Recommend);
        assert_eq!(deviation.expected_value.as_deref(), Some("gray-200"));
    }

    #[test]
    fn test_majority_flip_raises_drift_before_adopting() {
        let mut memory = ProjectMemory::fresh("p");
        let occurrences: Vec<RawOccurrence> = (0..20)
            .map(|i| occurrence("card", "border", "gray-200", i))
            .collect();
        run(&occurrences, &mut memory);

        // Every observation in the next run disagrees with the standard.
        let occurrences: Vec<RawOccurrence> = (0..30)
            .map(|i| occurrence("card", "border", "gray-300", i))
            .collect();
        let report = run(&occurrences, &mut memory);

        assert_eq!(report.drift_flags.len(), 1);
        let flag = &report.drift_flags[0];
        assert_eq!(flag.standard_value, "gray-200");
        assert_eq!(flag.challenger_value, "gray-300");
        assert!((flag.run_share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_history_appended() {
        let mut memory = ProjectMemory::fresh("p");
        run(&[occurrence("card", "border", "gray-200", 1)], &mut memory);
        run(&[occurrence("card", "border", "gray-200", 1)], &mut memory);
        assert_eq!(memory.run_history.len(), 2);
        assert_eq!(memory.run_history[1].run_id, 2);
    }
}
