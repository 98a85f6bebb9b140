//! Cross-device conjunctions.
//!
//! Evaluated independently of the per-device rows; their actions are
//! unioned into the cycle's set, never substituted for the table result.
//! Each rule is a plain `fn` predicate plus a static action list.

use log::debug;

use crate::actions::{Action, ActionSet};
use crate::sensors::Reading;

/// A named conjunction and the actions it contributes when it holds.
pub struct CombinedRule {
    pub name: &'static str,
    pub applies: fn(&Reading, bool) -> bool,
    pub actions: &'static [Action],
}

// ── Cold and dark ─────────────────────────────────────────────
const COLD_DARK_LUX_BELOW: f32 = 100.0;
const COLD_DARK_TEMP_BELOW: f32 = 18.0;

// ── Hot and bright ────────────────────────────────────────────
const HOT_BRIGHT_TEMP_ABOVE: f32 = 29.0;
const HOT_BRIGHT_LUX_ABOVE: f32 = 700.0;

// ── Bright at night ───────────────────────────────────────────
const NIGHT_BRIGHT_LUX_ABOVE: f32 = 500.0;

pub static COMBINED_RULES: [CombinedRule; 3] = [
    CombinedRule {
        name: "cold-dark-occupied",
        applies: cold_dark_occupied,
        actions: &[Action::LightOn, Action::HeatOn],
    },
    CombinedRule {
        name: "hot-bright-occupied",
        applies: hot_bright_occupied,
        actions: &[Action::AcOn, Action::BlindsDown],
    },
    // TODO: BlindsDown here duplicates the Night row in `device::blinds`;
    // review whether this rule should keep it.
    CombinedRule {
        name: "night-bright-occupied",
        applies: night_bright_occupied,
        actions: &[Action::BlindsDown, Action::LightOff],
    },
];

fn cold_dark_occupied(r: &Reading, occupied: bool) -> bool {
    occupied && r.illumination_lux < COLD_DARK_LUX_BELOW && r.temperature_c < COLD_DARK_TEMP_BELOW
}

fn hot_bright_occupied(r: &Reading, occupied: bool) -> bool {
    occupied && r.temperature_c > HOT_BRIGHT_TEMP_ABOVE && r.illumination_lux > HOT_BRIGHT_LUX_ABOVE
}

fn night_bright_occupied(r: &Reading, occupied: bool) -> bool {
    r.time_slot.is_night() && occupied && r.illumination_lux > NIGHT_BRIGHT_LUX_ABOVE
}

/// Rules whose conjunction holds for this reading.
pub fn fired_rules(reading: &Reading, occupied: bool) -> impl Iterator<Item = &'static CombinedRule> {
    COMBINED_RULES
        .iter()
        .filter(move |rule| (rule.applies)(reading, occupied))
}

/// Union of the actions of every rule that fires.
pub fn evaluate_combined(reading: &Reading, occupied: bool) -> ActionSet {
    let mut out = ActionSet::new();
    for rule in fired_rules(reading, occupied) {
        debug!("combined rule '{}' fired", rule.name);
        for &action in rule.actions {
            if let Err(conflict) = out.insert(action) {
                debug!("combined rule '{}': {conflict}", rule.name);
            }
        }
    }
    out
}
