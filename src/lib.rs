//! SmartRoom decision core.
//!
//! Turns a room's sensor reading plus an occupancy estimate into a set of
//! actuation actions (lights, heating, AC, blinds), and checks that set
//! against actions inferred by an external reasoner.
//!
//! The rule, fusion, aggregation and reconciliation functions are pure and
//! keep no state between cycles. [`app::service::RoomController`] wires
//! them to the outside world through the traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod actions;
pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod fusion;
pub mod reconcile;
pub mod rules;
pub mod sensors;

pub use actions::{Action, ActionSet, aggregate};
pub use error::{Error, Result};
pub use fusion::{FusionStrategy, OccupancyInput, resolve as resolve_occupancy};
pub use reconcile::{diff, reconcile};
pub use rules::{DeviceClass, evaluate_combined, evaluate_device};
pub use sensors::{Reading, TimeSlot};
