//! Occupancy predictor adapters.
//!
//! The trained model lives outside this crate. [`ReplayPredictor`] serves
//! predictions recorded offline, one per room; [`NoPredictor`] stands in
//! when no model is deployed at all.

use std::collections::HashMap;

use log::debug;

use crate::app::ports::{OccupancyFeatures, OccupancyPredictor, Prediction, PredictorError};
use crate::app::service::RoomCycle;

/// Predictor that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPredictor;

impl OccupancyPredictor for NoPredictor {
    fn predict(&mut self, _room: &str, _features: &OccupancyFeatures) -> Result<Prediction, PredictorError> {
        Err(PredictorError::Unavailable)
    }
}

/// Replays recorded predictions keyed by room.
#[derive(Debug, Default, Clone)]
pub struct ReplayPredictor {
    recorded: HashMap<String, Prediction>,
}

impl ReplayPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the recorded prediction of every cycle that has one.
    pub fn from_cycles(cycles: &[RoomCycle]) -> Self {
        let recorded = cycles
            .iter()
            .filter_map(|c| c.recorded_prediction.map(|p| (c.room.clone(), p)))
            .collect();
        Self { recorded }
    }

    pub fn insert(&mut self, room: impl Into<String>, prediction: Prediction) {
        self.recorded.insert(room.into(), prediction);
    }

    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }
}

impl OccupancyPredictor for ReplayPredictor {
    fn predict(&mut self, room: &str, _features: &OccupancyFeatures) -> Result<Prediction, PredictorError> {
        let prediction = self.recorded.get(room).copied().ok_or(PredictorError::Unavailable)?;
        if !prediction.confidence.is_finite() {
            return Err(PredictorError::Failed("recorded confidence is not a number"));
        }
        debug!("replay {room}: {prediction:?}");
        Ok(prediction)
    }
}
