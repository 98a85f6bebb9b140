//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises the controller against
//! mock ports. No model, reasoner or disk state is required.

mod controller_tests;
mod mock_ports;
mod reconcile_tests;
