//! Sensor-side data: the per-cycle [`Reading`] and its validation limits.
//!
//! Readings arrive from the caller already sampled; this module only
//! describes and validates them.

pub mod limits;
pub mod reading;

pub use limits::ReadingLimits;
pub use reading::{Reading, TimeSlot};
