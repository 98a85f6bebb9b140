//! Port traits: the boundary between the decision core and its external
//! collaborators.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RoomController (domain)
//! ```
//!
//! The occupancy model, the event destination and configuration storage
//! are all reached through these traits. The
//! [`RoomController`](super::service::RoomController) takes them as
//! generics at call sites, so the core is testable with plain mocks.

use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::sensors::Reading;

// ───────────────────────────────────────────────────────────────
// Occupancy predictor (driven adapter: domain → ML model)
// ───────────────────────────────────────────────────────────────

/// Features the occupancy model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancyFeatures {
    pub temperature_c: f32,
    pub humidity_pct: Option<f32>,
    pub illumination_lux: f32,
    pub power_kw: Option<f32>,
}

impl From<&Reading> for OccupancyFeatures {
    fn from(r: &Reading) -> Self {
        Self {
            temperature_c: r.temperature_c,
            humidity_pct: r.humidity_pct,
            illumination_lux: r.illumination_lux,
            power_kw: r.power_kw,
        }
    }
}

/// A model output: the predicted label and the model's probability that
/// the room is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub occupied: bool,
    /// P(occupied) in `[0, 1]`, whatever `occupied` says. A confident
    /// "vacant" therefore scores low and `MlIfConfident` falls back to the
    /// manual flag.
    pub confidence: f32,
}

/// External occupancy model.
///
/// Calls may fail or be unavailable; the controller then proceeds as if
/// no prediction had been made.
pub trait OccupancyPredictor {
    fn predict(&mut self, room: &str, features: &OccupancyFeatures) -> Result<Prediction, PredictorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`ConfigError::ValidationFailed`] instead of clamping them.
pub trait ConfigPort {
    /// Returns [`ConfigError::NotFound`] if nothing has been stored yet.
    fn load(&self) -> Result<ControllerConfig, ConfigError>;

    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`OccupancyPredictor`] calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorError {
    /// No model is loaded, or it has nothing for this room.
    Unavailable,
    /// The model ran but could not produce a prediction.
    Failed(&'static str),
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for PredictorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "predictor unavailable"),
            Self::Failed(msg) => write!(f, "prediction failed: {}", msg),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for PredictorError {}
impl std::error::Error for ConfigError {}
