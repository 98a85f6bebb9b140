//! Application core: orchestration of one room cycle, zero I/O.
//!
//! Wires reading validation, occupancy fusion, the rule evaluator and the
//! reconciler together. The occupancy model and every output go through
//! the **port traits** in [`ports`], so this layer runs against mocks.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
