//! Threshold rule evaluator.
//!
//! One pure function per device class ([`device`]) plus the cross-device
//! conjunctions ([`combined`]). None of them fail: the reading must have
//! been validated and occupancy resolved before they are called.
//!
//! ```text
//!  Reading ─┐
//!           ├─▶ light / heating / blinds / ac ──▶ [Action; 4] ─┐
//!  occupied ┤                                                  ├─▶ aggregate ─▶ ActionSet
//!           └─▶ combined rules ───────────────▶ ActionSet ─────┘
//! ```

pub mod combined;
pub mod device;

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::actions::{Action, Aggregation, aggregate_detailed};
use crate::error::{Error, Result};
use crate::sensors::Reading;

pub use combined::evaluate_combined;

/// Closed set of actuated device classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Light,
    Heating,
    Blinds,
    Ac,
}

impl DeviceClass {
    /// Evaluation order of the per-device rules.
    pub const ALL: [DeviceClass; 4] = [
        DeviceClass::Light,
        DeviceClass::Heating,
        DeviceClass::Blinds,
        DeviceClass::Ac,
    ];

    /// Bits of [`Action::mask`] owned by this class.
    pub const fn mask(self) -> u8 {
        match self {
            Self::Light => 0b0000_0011,
            Self::Heating => 0b0000_1100,
            Self::Ac => 0b0011_0000,
            Self::Blinds => 0b1100_0000,
        }
    }
}

impl FromStr for DeviceClass {
    type Err = Error;

    /// Parse an English or knowledge-base device tag, case-insensitively.
    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "light" | "lights" | "luce" => Ok(Self::Light),
            "heating" | "heat" | "riscaldamento" => Ok(Self::Heating),
            "blinds" | "blind" | "tapparella" | "tapparelle" => Ok(Self::Blinds),
            "ac" | "air_conditioning" | "climatizzatore" => Ok(Self::Ac),
            _ => Err(Error::UnknownDeviceClass),
        }
    }
}

/// Evaluate the rule row for one device class.
pub fn evaluate_device(class: DeviceClass, reading: &Reading, occupied: bool) -> Action {
    match class {
        DeviceClass::Light => device::light(reading, occupied),
        DeviceClass::Heating => device::heating(reading, occupied),
        DeviceClass::Blinds => device::blinds(reading, occupied),
        DeviceClass::Ac => device::ac(reading, occupied),
    }
}

/// Evaluate a device given by tag; unknown tags are rejected.
pub fn evaluate_tagged(tag: &str, reading: &Reading, occupied: bool) -> Result<Action> {
    let class: DeviceClass = tag.parse()?;
    Ok(evaluate_device(class, reading, occupied))
}

/// All four per-device actions, in [`DeviceClass::ALL`] order.
pub fn evaluate_all(reading: &Reading, occupied: bool) -> [Action; 4] {
    DeviceClass::ALL.map(|class| evaluate_device(class, reading, occupied))
}

/// Run every rule against one reading with one resolved occupancy and
/// aggregate the result.
pub fn evaluate_cycle(reading: &Reading, occupied: bool) -> Aggregation {
    let per_device = evaluate_all(reading, occupied);
    let combined: Vec<Action> = evaluate_combined(reading, occupied).into();
    aggregate_detailed(&per_device, &combined)
}
