//! Per-device rule rows.
//!
//! Each function checks its Night override first, then the unoccupied or
//! occupied row, top to bottom; the first matching clause decides. Strict
//! and inclusive comparisons are exactly as listed below and are part of
//! the contract.
//!
//! | Device  | Unoccupied          | Occupied                                | Night                 |
//! |---------|---------------------|-----------------------------------------|-----------------------|
//! | Light   | lux >= 300 → Off    | lux < 100 → On; lux > 800 → Off         | occupied, lux < 200 → On |
//! | Heating | t >= 25 → Off       | t < 19 → On; t >= 28 → Off              | t < 21 → On           |
//! | Blinds  | lux >= 800 → Down   | lux > 800 → Down; lux < 200 → Up        | always → Down         |
//! | AC      | t <= 21 → Off       | t > 28 → On; 21 <= t <= 28 → Off        | t > 26 → Off          |
//!
//! The light's Night override only applies to occupied rooms, so an empty
//! room never gets its light turned on. Heating keeps an empty room warm
//! overnight.

use log::trace;

use crate::actions::Action;
use crate::sensors::Reading;

// ── Light (lux) ───────────────────────────────────────────────
const LIGHT_IDLE_OFF_AT: f32 = 300.0;
const LIGHT_ON_BELOW: f32 = 100.0;
const LIGHT_OFF_ABOVE: f32 = 800.0;
const LIGHT_NIGHT_ON_BELOW: f32 = 200.0;

// ── Heating (°C) ──────────────────────────────────────────────
const HEAT_IDLE_OFF_AT: f32 = 25.0;
const HEAT_ON_BELOW: f32 = 19.0;
const HEAT_OFF_AT: f32 = 28.0;
const HEAT_NIGHT_ON_BELOW: f32 = 21.0;

// ── Blinds (lux) ──────────────────────────────────────────────
const BLINDS_IDLE_DOWN_AT: f32 = 800.0;
const BLINDS_DOWN_ABOVE: f32 = 800.0;
const BLINDS_UP_BELOW: f32 = 200.0;

// ── AC (°C) ───────────────────────────────────────────────────
const AC_IDLE_OFF_AT_OR_BELOW: f32 = 21.0;
const AC_ON_ABOVE: f32 = 28.0;
const AC_OFF_BAND: (f32, f32) = (21.0, 28.0);
const AC_NIGHT_OFF_ABOVE: f32 = 26.0;

pub fn light(reading: &Reading, occupied: bool) -> Action {
    let lux = reading.illumination_lux;
    let action = if reading.time_slot.is_night() && occupied && lux < LIGHT_NIGHT_ON_BELOW {
        Action::LightOn
    } else if !occupied {
        if lux >= LIGHT_IDLE_OFF_AT {
            Action::LightOff
        } else {
            Action::NoAction
        }
    } else if lux < LIGHT_ON_BELOW {
        Action::LightOn
    } else if lux > LIGHT_OFF_ABOVE {
        Action::LightOff
    } else {
        Action::NoAction
    };
    trace!("light: lux={lux} occupied={occupied} -> {action}");
    action
}

pub fn heating(reading: &Reading, occupied: bool) -> Action {
    let t = reading.temperature_c;
    let action = if reading.time_slot.is_night() && t < HEAT_NIGHT_ON_BELOW {
        Action::HeatOn
    } else if !occupied {
        if t >= HEAT_IDLE_OFF_AT {
            Action::HeatOff
        } else {
            Action::NoAction
        }
    } else if t < HEAT_ON_BELOW {
        Action::HeatOn
    } else if t >= HEAT_OFF_AT {
        Action::HeatOff
    } else {
        Action::NoAction
    };
    trace!("heating: t={t} occupied={occupied} -> {action}");
    action
}

pub fn blinds(reading: &Reading, occupied: bool) -> Action {
    let lux = reading.illumination_lux;
    let action = if reading.time_slot.is_night() {
        Action::BlindsDown
    } else if !occupied {
        if lux >= BLINDS_IDLE_DOWN_AT {
            Action::BlindsDown
        } else {
            Action::NoAction
        }
    } else if lux > BLINDS_DOWN_ABOVE {
        Action::BlindsDown
    } else if lux < BLINDS_UP_BELOW {
        Action::BlindsUp
    } else {
        Action::NoAction
    };
    trace!("blinds: lux={lux} occupied={occupied} -> {action}");
    action
}

pub fn ac(reading: &Reading, occupied: bool) -> Action {
    let t = reading.temperature_c;
    let (band_lo, band_hi) = AC_OFF_BAND;
    let action = if reading.time_slot.is_night() && t > AC_NIGHT_OFF_ABOVE {
        Action::AcOff
    } else if !occupied {
        if t <= AC_IDLE_OFF_AT_OR_BELOW {
            Action::AcOff
        } else {
            Action::NoAction
        }
    } else if t > AC_ON_ABOVE {
        Action::AcOn
    } else if (band_lo..=band_hi).contains(&t) {
        Action::AcOff
    } else {
        Action::NoAction
    };
    trace!("ac: t={t} occupied={occupied} -> {action}");
    action
}
