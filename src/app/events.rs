//! Outbound application events.
//!
//! The [`RoomController`](super::service::RoomController) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them.

use std::collections::BTreeSet;

use crate::actions::{Action, ActionSet};
use crate::config::ControllerConfig;
use crate::error::Error;

/// Structured events emitted by the decision core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A room finished its cycle.
    CycleEvaluated {
        room: String,
        occupied: bool,
        actions: ActionSet,
    },

    /// The dark-idle pre-filter forced the room vacant.
    OccupancyPrefiltered { room: String },

    /// The predictor failed; the cycle ran without an ML prediction.
    PredictorUnavailable { room: String, reason: String },

    /// Rules and reasoner disagree. Advisory only.
    Discrepancy { room: String, labels: BTreeSet<String> },

    /// Same-class conflict settled during aggregation.
    ConflictOverridden { room: String, dropped: Action },

    /// The cycle was rejected before any rule ran.
    CycleRejected { room: String, error: Error },

    /// Configuration replaced at runtime.
    ConfigUpdated(ControllerConfig),
}
