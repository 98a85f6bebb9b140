//! Point-in-time room reading.
//!
//! A [`Reading`] is captured once per cycle and never mutated afterwards.
//! The rule evaluator assumes it has passed [`Reading::validate`].

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::limits::ReadingLimits;
use crate::error::{Field, ReadingError, Result};

/// Time-of-day / tariff band the reading was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    #[default]
    Day,
    Night,
    HighTariff,
    LowTariff,
}

impl TimeSlot {
    pub fn is_night(self) -> bool {
        self == Self::Night
    }
}

impl FromStr for TimeSlot {
    type Err = ();

    /// Accepts the English names and the knowledge-base names
    /// (`Giorno`, `Notte`, `FasciaEnergeticaAlta`, `FasciaEnergeticaBassa`).
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "day" | "giorno" => Ok(Self::Day),
            "night" | "notte" => Ok(Self::Night),
            "hightariff" | "fasciaenergeticaalta" => Ok(Self::HighTariff),
            "lowtariff" | "fasciaenergeticabassa" => Ok(Self::LowTariff),
            _ => Err(()),
        }
    }
}

/// One snapshot of a room's sensor values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Air temperature (°C).
    pub temperature_c: f32,
    /// Illumination (lux), nominally 0 – 1000.
    pub illumination_lux: f32,
    /// Relative humidity (%), if the room has a hygrometer.
    #[serde(default)]
    pub humidity_pct: Option<f32>,
    /// Instantaneous power draw (kW), if metered.
    #[serde(default)]
    pub power_kw: Option<f32>,
    #[serde(default)]
    pub time_slot: TimeSlot,
}

impl Reading {
    /// Reading with only the two mandatory values, taken during the day.
    pub fn new(temperature_c: f32, illumination_lux: f32) -> Self {
        Self {
            temperature_c,
            illumination_lux,
            humidity_pct: None,
            power_kw: None,
            time_slot: TimeSlot::Day,
        }
    }

    pub fn with_humidity(mut self, humidity_pct: f32) -> Self {
        self.humidity_pct = Some(humidity_pct);
        self
    }

    pub fn with_power(mut self, power_kw: f32) -> Self {
        self.power_kw = Some(power_kw);
        self
    }

    pub fn with_time_slot(mut self, time_slot: TimeSlot) -> Self {
        self.time_slot = time_slot;
        self
    }

    /// Reject non-finite values and values outside `limits`.
    ///
    /// Optional fields are only checked when present.
    pub fn validate(&self, limits: &ReadingLimits) -> Result<()> {
        check(Field::Temperature, self.temperature_c, limits.temperature_c)?;
        check(Field::Illumination, self.illumination_lux, limits.illumination_lux)?;
        if let Some(h) = self.humidity_pct {
            check(Field::Humidity, h, limits.humidity_pct)?;
        }
        if let Some(p) = self.power_kw {
            check(Field::PowerDraw, p, limits.power_kw)?;
        }
        Ok(())
    }
}

fn check(field: Field, value: f32, (min, max): (f32, f32)) -> Result<()> {
    if !value.is_finite() {
        return Err(ReadingError::NonFinite(field).into());
    }
    if value < min || value > max {
        return Err(ReadingError::OutOfRange(field).into());
    }
    Ok(())
}
