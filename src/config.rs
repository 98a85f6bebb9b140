//! Controller configuration
//!
//! Tunable parameters of the orchestrator. The rule thresholds themselves
//! are fixed (see [`rules::device`](crate::rules::device)) and are not
//! configurable.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fusion::{DarkIdleFilter, FusionStrategy};
use crate::sensors::ReadingLimits;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Fusion ---
    /// Strategy used when a cycle does not name its own
    pub fusion: FusionStrategy,
    /// Pre-filter that forces dark, idle rooms to vacant
    pub dark_idle: DarkIdleFilter,

    // --- Validation ---
    /// Accepted range for each reading field
    pub limits: ReadingLimits,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fusion: FusionStrategy::LogicalOr,
            dark_idle: DarkIdleFilter::default(),
            limits: ReadingLimits::default(),
        }
    }
}

impl ControllerConfig {
    /// Reject invalid values instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if let FusionStrategy::MlIfConfident { threshold } = self.fusion {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::Config("fusion threshold must lie in [0, 1]"));
            }
        }
        if !self.dark_idle.max_illumination_lux.is_finite() || self.dark_idle.max_illumination_lux < 0.0 {
            return Err(Error::Config("dark_idle.max_illumination_lux must be >= 0"));
        }
        if !self.dark_idle.max_power_kw.is_finite() || self.dark_idle.max_power_kw < 0.0 {
            return Err(Error::Config("dark_idle.max_power_kw must be >= 0"));
        }
        if !self.limits.is_well_formed() {
            return Err(Error::Config("reading limits must be finite, min <= max"));
        }
        Ok(())
    }
}
