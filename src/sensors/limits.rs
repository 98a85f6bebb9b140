//! Physically plausible ranges for each reading field.

use serde::{Deserialize, Serialize};

/// Inclusive `(min, max)` bounds used by [`Reading::validate`](super::Reading::validate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingLimits {
    pub temperature_c: (f32, f32),
    pub illumination_lux: (f32, f32),
    pub humidity_pct: (f32, f32),
    pub power_kw: (f32, f32),
}

impl Default for ReadingLimits {
    fn default() -> Self {
        Self {
            temperature_c: (5.0, 38.0),
            illumination_lux: (0.0, 1000.0),
            humidity_pct: (0.0, 100.0),
            power_kw: (0.0, 5.0),
        }
    }
}

impl ReadingLimits {
    /// True if every range is finite and non-empty.
    pub fn is_well_formed(&self) -> bool {
        [
            self.temperature_c,
            self.illumination_lux,
            self.humidity_pct,
            self.power_kw,
        ]
        .iter()
        .all(|&(lo, hi)| lo.is_finite() && hi.is_finite() && lo <= hi)
    }
}
