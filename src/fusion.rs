//! Occupancy fusion.
//!
//! Resolves the single occupancy boolean used by every rule in a cycle
//! from the manual flag and an optional ML prediction.
//!
//! ```text
//!  DarkIdleFilter (optional, caller-applied)
//!        │ fires ──▶ vacant
//!        ▼
//!  manual ───────┐
//!  ml prediction ├──▶ resolve(strategy) ──▶ occupied: bool
//!  ml confidence ┘
//! ```
//!
//! [`resolve`] is pure and stateless. The dark-idle pre-filter is kept
//! outside it so each can be tested on its own.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sensors::Reading;

/// Policy for combining the manual flag with the ML prediction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FusionStrategy {
    /// Occupied if either source says so.
    #[default]
    LogicalOr,
    /// Trust the ML prediction when its confidence reaches `threshold`,
    /// otherwise fall back to the manual flag.
    MlIfConfident { threshold: f32 },
    /// Ignore the ML fields entirely.
    ManualOnly,
}

impl FusionStrategy {
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

    pub fn ml_if_confident(threshold: f32) -> Self {
        Self::MlIfConfident { threshold }
    }
}

/// Occupancy signals available for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OccupancyInput {
    pub manual: bool,
    #[serde(default)]
    pub ml_prediction: Option<bool>,
    /// Confidence of `ml_prediction`, in `[0, 1]`.
    #[serde(default)]
    pub ml_confidence: Option<f32>,
}

impl OccupancyInput {
    pub fn manual(manual: bool) -> Self {
        Self {
            manual,
            ml_prediction: None,
            ml_confidence: None,
        }
    }

    pub fn with_prediction(mut self, occupied: bool, confidence: f32) -> Self {
        self.ml_prediction = Some(occupied);
        self.ml_confidence = Some(confidence);
        self
    }
}

/// Resolve occupancy under `strategy`.
///
/// Fails with [`Error::InvalidConfidence`] if the confidence of a present
/// prediction (or the strategy's threshold) is NaN or outside `[0, 1]`.
/// Without a prediction every strategy returns the manual flag, and
/// `ManualOnly` never looks at the ML fields at all.
pub fn resolve(strategy: FusionStrategy, input: &OccupancyInput) -> Result<bool> {
    if strategy == FusionStrategy::ManualOnly {
        return Ok(input.manual);
    }
    // A confidence without a prediction is never read.
    if let (Some(_), Some(c)) = (input.ml_prediction, input.ml_confidence) {
        check_unit(c)?;
    }

    let occupied = match strategy {
        FusionStrategy::ManualOnly => input.manual,
        FusionStrategy::LogicalOr => input.manual || input.ml_prediction.unwrap_or(false),
        FusionStrategy::MlIfConfident { threshold } => {
            check_unit(threshold)?;
            match (input.ml_prediction, input.ml_confidence) {
                (Some(predicted), Some(confidence)) if confidence >= threshold => predicted,
                _ => input.manual,
            }
        }
    };
    trace!("fusion {strategy:?} {input:?} -> {occupied}");
    Ok(occupied)
}

fn check_unit(value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfidence)
    }
}

// ---------------------------------------------------------------------------
// Dark-idle pre-filter
// ---------------------------------------------------------------------------

/// Treats a dark room with negligible power draw as vacant before fusion.
///
/// Needs a metered power draw; readings without one never trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DarkIdleFilter {
    pub enabled: bool,
    /// Fires below this illumination (strict).
    pub max_illumination_lux: f32,
    /// Fires below this power draw (strict).
    pub max_power_kw: f32,
}

impl Default for DarkIdleFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            max_illumination_lux: 100.0,
            max_power_kw: 1.0,
        }
    }
}

impl DarkIdleFilter {
    pub fn forces_vacant(&self, reading: &Reading) -> bool {
        self.enabled
            && reading.illumination_lux < self.max_illumination_lux
            && reading.power_kw.is_some_and(|kw| kw < self.max_power_kw)
    }
}
