//! Scoring of occupancy decisions against ground truth.
//!
//! Two signals are scored per batch: the fused occupancy, and the
//! presence implied by the rules themselves (a room where the rules switch
//! something on for comfort is treated as "looks occupied").

use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionSet};

/// Actions that only make sense for someone in the room.
const PRESENCE_ACTIONS: [Action; 3] = [Action::LightOn, Action::HeatOn, Action::BlindsUp];

/// Rule-based presence guess for one cycle.
pub fn presence_signal(actions: &ActionSet) -> bool {
    PRESENCE_ACTIONS.iter().any(|a| actions.contains(*a))
}

/// Binary confusion counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: u32,
    pub fp: u32,
    #[serde(rename = "fn")]
    pub fn_: u32,
    pub tn: u32,
}

impl ConfusionMatrix {
    pub fn record(&mut self, predicted: bool, actual: bool) {
        let slot = match (predicted, actual) {
            (true, true) => &mut self.tp,
            (true, false) => &mut self.fp,
            (false, true) => &mut self.fn_,
            (false, false) => &mut self.tn,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.tp + self.fp + self.fn_ + self.tn
    }

    pub fn accuracy(&self) -> f32 {
        ratio(self.tp + self.tn, self.total())
    }

    /// `0.0` when nothing was predicted positive.
    pub fn precision(&self) -> f32 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// `0.0` when there were no actual positives.
    pub fn recall(&self) -> f32 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn f1(&self) -> f32 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: u32, den: u32) -> f32 {
    if den == 0 { 0.0 } else { num as f32 / den as f32 }
}
