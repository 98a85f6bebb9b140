//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! `info!`/`warn!` line. Another sink (a message bus, a metrics exporter)
//! would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::CycleEvaluated {
                room,
                occupied,
                actions,
            } => {
                info!(
                    "CYCLE | room={} | occupied={} | actions={}",
                    room,
                    if *occupied { "yes" } else { "no" },
                    actions,
                );
            }
            AppEvent::OccupancyPrefiltered { room } => {
                info!("PREFILTER | room={} | dark and idle -> vacant", room);
            }
            AppEvent::PredictorUnavailable { room, reason } => {
                warn!("PREDICT | room={} | {}", room, reason);
            }
            AppEvent::Discrepancy { room, labels } => {
                let joined: Vec<&str> = labels.iter().map(String::as_str).collect();
                warn!("RECONCILE | room={} | mismatch=[{}]", room, joined.join(", "));
            }
            AppEvent::ConflictOverridden { room, dropped } => {
                info!("CONFLICT | room={} | dropped={}", room, dropped);
            }
            AppEvent::CycleRejected { room, error } => {
                warn!("REJECT | room={} | {}", room, error);
            }
            AppEvent::ConfigUpdated(config) => {
                info!("CONFIG | fusion={:?}", config.fusion);
            }
        }
    }
}
