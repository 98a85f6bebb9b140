//! Application service: the hexagonal core.
//!
//! [`RoomController`] owns the live configuration and runs one decision
//! cycle per room. All I/O flows through port traits injected at call
//! sites, so the whole service is testable with mock adapters.
//!
//! ```text
//!  OccupancyPredictor ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                         │        RoomController         │
//!        RoomCycle ─────▶ │ validate · fusion · rules ·   │ ──▶ CycleOutcome
//!                         │ aggregate · reconcile         │
//!                         └──────────────────────────────┘
//! ```
//!
//! The controller keeps no per-room state between cycles; rooms are
//! evaluated independently and may be run in any order.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionSet, ActionTally};
use crate::config::ControllerConfig;
use crate::error::{Error, Result};
use crate::evaluation::{ConfusionMatrix, presence_signal};
use crate::fusion::{self, FusionStrategy, OccupancyInput};
use crate::reconcile::{InferenceSnapshot, Reconciliation, reconcile};
use crate::rules;
use crate::sensors::Reading;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ConfigError, ConfigPort, EventSink, OccupancyFeatures, OccupancyPredictor, Prediction};

// ───────────────────────────────────────────────────────────────
// Requests and results
// ───────────────────────────────────────────────────────────────

/// Everything needed to evaluate one room once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomCycle {
    pub room: String,
    pub reading: Reading,
    #[serde(default)]
    pub manual_occupancy: bool,
    /// Overrides the configured strategy for this cycle only.
    #[serde(default)]
    pub strategy: Option<FusionStrategy>,
    /// Reasoner output to reconcile against, if one was produced.
    #[serde(default)]
    pub inferred: Option<InferenceSnapshot>,
    /// Ground truth, for scoring only. Never used to decide.
    #[serde(default)]
    pub actual_occupancy: Option<bool>,
    /// Prediction recorded offline for this room, replayed by the CLI.
    #[serde(default)]
    pub recorded_prediction: Option<Prediction>,
}

impl RoomCycle {
    pub fn new(room: impl Into<String>, reading: Reading, manual_occupancy: bool) -> Self {
        Self {
            room: room.into(),
            reading,
            manual_occupancy,
            strategy: None,
            inferred: None,
            actual_occupancy: None,
            recorded_prediction: None,
        }
    }
}

/// Result of one accepted cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOutcome {
    pub room: String,
    pub occupied: bool,
    /// True when the dark-idle pre-filter decided occupancy.
    pub prefiltered: bool,
    /// The prediction fusion saw, if any.
    pub prediction: Option<Prediction>,
    pub actions: ActionSet,
    /// Actions that lost a same-class conflict.
    pub overridden: Vec<Action>,
    pub reconciliation: Option<Reconciliation>,
    /// Categories the reasoner assigned to the room.
    pub categories: Vec<String>,
}

/// A cycle that was rejected before any rule ran.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedCycle {
    pub room: String,
    pub error: Error,
}

/// Summary of a batch of independent room cycles.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<CycleOutcome>,
    pub rejected: Vec<RejectedCycle>,
    pub tally: ActionTally,
    /// Fused occupancy against ground truth.
    pub occupancy_score: ConfusionMatrix,
    /// Rule presence signal against ground truth.
    pub rule_presence_score: ConfusionMatrix,
}

impl BatchReport {
    /// Number of accepted cycles whose rules and reasoner disagreed.
    pub fn discrepancy_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.reconciliation.as_ref().is_some_and(|r| !r.is_consistent()))
            .count()
    }
}

// ───────────────────────────────────────────────────────────────
// RoomController
// ───────────────────────────────────────────────────────────────

/// Orchestrates the decision core for any number of rooms.
pub struct RoomController {
    config: ControllerConfig,
}

impl RoomController {
    /// Construct the controller, rejecting an invalid configuration.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load configuration through `storage`, falling back to defaults on
    /// first run.
    pub fn from_storage(storage: &impl ConfigPort) -> core::result::Result<Self, ConfigError> {
        let config = match storage.load() {
            Ok(c) => c,
            Err(ConfigError::NotFound) => {
                info!("No stored config, using defaults");
                ControllerConfig::default()
            }
            Err(e) => return Err(e),
        };
        config.validate().map_err(|e| match e {
            Error::Config(msg) => ConfigError::ValidationFailed(msg),
            _ => ConfigError::Corrupted,
        })?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command. The live config is left untouched if
    /// the new one does not validate.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<()> {
        let next = match cmd {
            AppCommand::UpdateConfig(config) => config,
            AppCommand::SetFusionStrategy(strategy) => ControllerConfig {
                fusion: strategy,
                ..self.config.clone()
            },
        };
        if let Err(e) = next.validate() {
            warn!("Config update rejected: {}", e);
            return Err(e);
        }
        self.config = next;
        info!("Configuration updated at runtime");
        sink.emit(&AppEvent::ConfigUpdated(self.config.clone()));
        Ok(())
    }

    /// Persist the live configuration.
    pub fn save_config(&self, storage: &impl ConfigPort) -> core::result::Result<(), ConfigError> {
        match storage.save(&self.config) {
            Ok(()) => {
                info!("Config saved");
                Ok(())
            }
            Err(e) => {
                warn!("Config save failed: {}", e);
                Err(e)
            }
        }
    }

    // ── Per-room cycle ────────────────────────────────────────

    /// Run one full cycle: validate → pre-filter → predict → fuse →
    /// rules → aggregate → reconcile.
    ///
    /// Occupancy is resolved exactly once and shared by every rule of the
    /// cycle. Fails only on an invalid reading or a malformed confidence;
    /// predictor failures and reconciliation mismatches are not errors.
    pub fn run_cycle(
        &self,
        cycle: &RoomCycle,
        predictor: &mut impl OccupancyPredictor,
        sink: &mut impl EventSink,
    ) -> Result<CycleOutcome> {
        let room = cycle.room.as_str();
        let reading = &cycle.reading;

        // 1. Reject bad readings before anything else
        if let Err(e) = reading.validate(&self.config.limits) {
            return Err(self.reject(room, e, sink));
        }

        // 2. Resolve occupancy once
        let strategy = cycle.strategy.unwrap_or(self.config.fusion);
        let prefiltered = self.config.dark_idle.forces_vacant(reading);
        let (occupied, prediction) = if prefiltered {
            debug!("{room}: dark and idle, treated as vacant");
            sink.emit(&AppEvent::OccupancyPrefiltered { room: room.to_owned() });
            (false, None)
        } else {
            let prediction = if strategy == FusionStrategy::ManualOnly {
                None
            } else {
                Self::predict(room, reading, predictor, sink)
            };
            let input = OccupancyInput {
                manual: cycle.manual_occupancy,
                ml_prediction: prediction.map(|p| p.occupied),
                ml_confidence: prediction.map(|p| p.confidence),
            };
            match fusion::resolve(strategy, &input) {
                Ok(occupied) => (occupied, prediction),
                Err(e) => return Err(self.reject(room, e, sink)),
            }
        };

        // 3. Rules and aggregation
        let aggregation = rules::evaluate_cycle(reading, occupied);
        for &dropped in &aggregation.overridden {
            sink.emit(&AppEvent::ConflictOverridden {
                room: room.to_owned(),
                dropped,
            });
        }

        // 4. Advisory reconciliation
        let (reconciliation, categories) = match &cycle.inferred {
            Some(snapshot) => {
                let r = reconcile(&aggregation.actions, &snapshot.action_labels());
                if !r.is_consistent() {
                    let labels = r.discrepancies();
                    warn!("{room}: rules and reasoner disagree on {:?}", labels);
                    sink.emit(&AppEvent::Discrepancy {
                        room: room.to_owned(),
                        labels,
                    });
                }
                (Some(r), snapshot.categories().map(str::to_owned).collect())
            }
            None => (None, Vec::new()),
        };

        info!("{room}: occupied={occupied} actions={}", aggregation.actions);
        sink.emit(&AppEvent::CycleEvaluated {
            room: room.to_owned(),
            occupied,
            actions: aggregation.actions,
        });

        Ok(CycleOutcome {
            room: room.to_owned(),
            occupied,
            prefiltered,
            prediction,
            actions: aggregation.actions,
            overridden: aggregation.overridden.to_vec(),
            reconciliation,
            categories,
        })
    }

    /// Run independent cycles for many rooms. A rejected room is recorded
    /// and the batch carries on.
    pub fn run_batch(
        &self,
        cycles: &[RoomCycle],
        predictor: &mut impl OccupancyPredictor,
        sink: &mut impl EventSink,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for cycle in cycles {
            match self.run_cycle(cycle, predictor, sink) {
                Ok(outcome) => {
                    report.tally.record(&outcome.actions);
                    if let Some(actual) = cycle.actual_occupancy {
                        report.occupancy_score.record(outcome.occupied, actual);
                        report
                            .rule_presence_score
                            .record(presence_signal(&outcome.actions), actual);
                    }
                    report.outcomes.push(outcome);
                }
                Err(error) => report.rejected.push(RejectedCycle {
                    room: cycle.room.clone(),
                    error,
                }),
            }
        }
        info!(
            "Batch done: {} evaluated, {} rejected, {} actions issued",
            report.outcomes.len(),
            report.rejected.len(),
            report.tally.total()
        );
        report
    }

    // ── Internal ──────────────────────────────────────────────

    fn predict(
        room: &str,
        reading: &Reading,
        predictor: &mut impl OccupancyPredictor,
        sink: &mut impl EventSink,
    ) -> Option<Prediction> {
        match predictor.predict(room, &OccupancyFeatures::from(reading)) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("{room}: {e}, continuing without ML");
                sink.emit(&AppEvent::PredictorUnavailable {
                    room: room.to_owned(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn reject(&self, room: &str, error: Error, sink: &mut impl EventSink) -> Error {
        warn!("{room}: cycle rejected: {error}");
        sink.emit(&AppEvent::CycleRejected {
            room: room.to_owned(),
            error,
        });
        error
    }
}
