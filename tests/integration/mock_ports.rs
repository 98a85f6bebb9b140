//! Mock ports for integration tests.
//!
//! Records every emitted event and every predictor call so tests can
//! assert on the full history of a cycle.

use std::cell::RefCell;
use std::collections::HashMap;

use smartroom::app::events::AppEvent;
use smartroom::app::ports::{
    ConfigError, ConfigPort, EventSink, OccupancyFeatures, OccupancyPredictor, Prediction, PredictorError,
};
use smartroom::config::ControllerConfig;

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ScriptedPredictor ─────────────────────────────────────────

/// Answers from a per-room script; rooms without a script are unavailable.
#[derive(Default)]
pub struct ScriptedPredictor {
    script: HashMap<String, Result<Prediction, PredictorError>>,
    pub calls: Vec<(String, OccupancyFeatures)>,
}

#[allow(dead_code)]
impl ScriptedPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, room: &str, occupied: bool, confidence: f32) -> Self {
        self.script.insert(room.to_owned(), Ok(Prediction { occupied, confidence }));
        self
    }

    pub fn fail(mut self, room: &str, error: PredictorError) -> Self {
        self.script.insert(room.to_owned(), Err(error));
        self
    }
}

impl OccupancyPredictor for ScriptedPredictor {
    fn predict(&mut self, room: &str, features: &OccupancyFeatures) -> Result<Prediction, PredictorError> {
        self.calls.push((room.to_owned(), *features));
        self.script.get(room).copied().unwrap_or(Err(PredictorError::Unavailable))
    }
}

// ── MemConfig ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MemConfig {
    pub stored: RefCell<Option<ControllerConfig>>,
}

#[allow(dead_code)]
impl MemConfig {
    pub fn with(config: ControllerConfig) -> Self {
        Self {
            stored: RefCell::new(Some(config)),
        }
    }
}

impl ConfigPort for MemConfig {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        self.stored.borrow().clone().ok_or(ConfigError::NotFound)
    }

    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError> {
        config
            .validate()
            .map_err(|_| ConfigError::ValidationFailed("invalid config"))?;
        *self.stored.borrow_mut() = Some(config.clone());
        Ok(())
    }
}
