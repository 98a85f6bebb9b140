//! Inbound commands to the controller.
//!
//! These represent requests from the outside world (CLI, config reload)
//! that the [`RoomController`](super::service::RoomController) interprets.

use crate::config::ControllerConfig;
use crate::fusion::FusionStrategy;

/// Commands that external adapters can send into the decision core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Replace the whole configuration. Validated before it takes effect.
    UpdateConfig(ControllerConfig),

    /// Change only the default fusion strategy.
    SetFusionStrategy(FusionStrategy),
}
