//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements          | Connects to                  |
//! |---------------|---------------------|------------------------------|
//! | `config_file` | ConfigPort          | JSON file on disk            |
//! | `log_sink`    | EventSink           | `log` facade                 |
//! | `logger`      | (log backend)       | stderr via tracing-subscriber|
//! | `predictor`   | OccupancyPredictor  | recorded predictions / none  |

pub mod config_file;
pub mod log_sink;
pub mod logger;
pub mod predictor;
