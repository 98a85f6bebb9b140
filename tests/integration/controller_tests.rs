//! Integration tests for the RoomController pipeline.
//!
//! Drive whole cycles (validation → pre-filter → predictor → fusion →
//! rules → aggregation) through mock ports and check both the outcome and
//! the emitted events.

use smartroom::actions::{Action, ActionSet};
use smartroom::app::commands::AppCommand;
use smartroom::app::events::AppEvent;
use smartroom::app::ports::{ConfigError, PredictorError};
use smartroom::app::service::{RoomController, RoomCycle};
use smartroom::config::ControllerConfig;
use smartroom::error::{Error, Field, ReadingError};
use smartroom::fusion::FusionStrategy;
use smartroom::sensors::{Reading, TimeSlot};

use crate::mock_ports::{MemConfig, RecordingSink, ScriptedPredictor};

fn controller() -> RoomController {
    RoomController::new(ControllerConfig::default()).unwrap()
}

fn set(actions: &[Action]) -> ActionSet {
    ActionSet::try_from(actions.to_vec()).unwrap()
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn hot_bright_room_confirmed_by_model() {
    let ctl = controller();
    let cycle = RoomCycle::new("living", Reading::new(30.0, 850.0), false);
    let mut model = ScriptedPredictor::new().answer("living", true, 0.9);
    let mut sink = RecordingSink::new();

    let out = ctl.run_cycle(&cycle, &mut model, &mut sink).unwrap();

    assert!(out.occupied);
    assert!(!out.prefiltered);
    assert!(out.actions.contains(Action::AcOn));
    assert!(out.actions.contains(Action::BlindsDown));
    // Light and heating rows fire too at these values.
    assert_eq!(
        out.actions,
        set(&[Action::LightOff, Action::HeatOff, Action::AcOn, Action::BlindsDown])
    );
    assert!(out.overridden.is_empty());
    assert_eq!(model.calls.len(), 1);
    assert_eq!(model.calls[0].1.temperature_c, 30.0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::CycleEvaluated { occupied: true, .. })),
        1
    );
}

#[test]
fn low_confidence_falls_back_to_manual() {
    let ctl = controller();
    let mut cycle = RoomCycle::new("office", Reading::new(22.0, 400.0), false);
    cycle.strategy = Some(FusionStrategy::ml_if_confident(0.7));
    let mut model = ScriptedPredictor::new().answer("office", true, 0.65);

    let out = ctl.run_cycle(&cycle, &mut model, &mut RecordingSink::new()).unwrap();

    assert!(!out.occupied);
    assert_eq!(out.actions, set(&[Action::LightOff]));
    assert_eq!(out.prediction.map(|p| p.confidence), Some(0.65));
}

#[test]
fn confidence_is_the_occupied_probability() {
    let ctl = controller();
    let mut cycle = RoomCycle::new("study", Reading::new(22.0, 400.0), true);
    cycle.strategy = Some(FusionStrategy::ml_if_confident(0.7));
    // A sure "vacant" carries a low P(occupied), so the manual flag stands.
    let mut model = ScriptedPredictor::new().answer("study", false, 0.05);

    let out = ctl.run_cycle(&cycle, &mut model, &mut RecordingSink::new()).unwrap();

    assert!(out.occupied);
    assert_eq!(out.prediction.map(|p| p.confidence), Some(0.05));
}

#[test]
fn per_cycle_strategy_beats_configured_default() {
    let mut config = ControllerConfig::default();
    config.fusion = FusionStrategy::ManualOnly;
    let ctl = RoomController::new(config).unwrap();
    let mut model = ScriptedPredictor::new().answer("den", true, 0.95);

    let plain = RoomCycle::new("den", Reading::new(22.0, 400.0), false);
    assert!(!ctl.run_cycle(&plain, &mut model, &mut RecordingSink::new()).unwrap().occupied);
    assert!(model.calls.is_empty());

    let mut overridden = plain.clone();
    overridden.strategy = Some(FusionStrategy::LogicalOr);
    assert!(ctl.run_cycle(&overridden, &mut model, &mut RecordingSink::new()).unwrap().occupied);
    assert_eq!(model.calls.len(), 1);
}

// ── Pre-filter ────────────────────────────────────────────────

#[test]
fn dark_idle_room_skips_the_model() {
    let ctl = controller();
    let cycle = RoomCycle::new("guest", Reading::new(20.0, 50.0).with_power(0.3), true);
    let mut model = ScriptedPredictor::new().answer("guest", true, 0.99);
    let mut sink = RecordingSink::new();

    let out = ctl.run_cycle(&cycle, &mut model, &mut sink).unwrap();

    assert!(out.prefiltered);
    assert!(!out.occupied);
    assert!(model.calls.is_empty());
    assert_eq!(out.actions, set(&[Action::AcOff]));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::OccupancyPrefiltered { .. })), 1);
}

#[test]
fn unmetered_room_is_never_prefiltered() {
    let ctl = controller();
    let cycle = RoomCycle::new("guest", Reading::new(20.0, 50.0), true);
    let mut model = ScriptedPredictor::new();

    let out = ctl.run_cycle(&cycle, &mut model, &mut RecordingSink::new()).unwrap();

    assert!(!out.prefiltered);
    assert!(out.occupied);
    assert!(out.actions.contains(Action::LightOn));
}

#[test]
fn disabled_prefilter_consults_the_model() {
    let mut config = ControllerConfig::default();
    config.dark_idle.enabled = false;
    let ctl = RoomController::new(config).unwrap();
    let cycle = RoomCycle::new("guest", Reading::new(20.0, 50.0).with_power(0.3), false);
    let mut model = ScriptedPredictor::new().answer("guest", true, 0.8);

    let out = ctl.run_cycle(&cycle, &mut model, &mut RecordingSink::new()).unwrap();

    assert!(!out.prefiltered);
    assert!(out.occupied);
}

// ── Failures ──────────────────────────────────────────────────

#[test]
fn model_failure_is_not_fatal() {
    let ctl = controller();
    let cycle = RoomCycle::new("kitchen", Reading::new(22.0, 400.0), true);
    let mut model = ScriptedPredictor::new().fail("kitchen", PredictorError::Failed("model crashed"));
    let mut sink = RecordingSink::new();

    let out = ctl.run_cycle(&cycle, &mut model, &mut sink).unwrap();

    assert!(out.occupied);
    assert_eq!(out.prediction, None);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PredictorUnavailable { .. })), 1);
}

#[test]
fn invalid_reading_is_rejected_before_the_model() {
    let ctl = controller();
    let mut model = ScriptedPredictor::new().answer("bath", true, 0.9);
    let mut sink = RecordingSink::new();

    let nan = RoomCycle::new("bath", Reading::new(f32::NAN, 300.0), true);
    assert_eq!(
        ctl.run_cycle(&nan, &mut model, &mut sink),
        Err(Error::InvalidReading(ReadingError::NonFinite(Field::Temperature)))
    );

    let hot = RoomCycle::new("bath", Reading::new(22.0, 300.0).with_humidity(140.0), true);
    assert_eq!(
        ctl.run_cycle(&hot, &mut model, &mut sink),
        Err(Error::InvalidReading(ReadingError::OutOfRange(Field::Humidity)))
    );

    assert!(model.calls.is_empty());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::CycleRejected { .. })), 2);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::CycleEvaluated { .. })), 0);
}

#[test]
fn out_of_range_model_confidence_rejects_the_cycle() {
    let ctl = controller();
    let cycle = RoomCycle::new("hall", Reading::new(22.0, 400.0), false);
    let mut model = ScriptedPredictor::new().answer("hall", true, 1.5);

    assert_eq!(
        ctl.run_cycle(&cycle, &mut model, &mut RecordingSink::new()),
        Err(Error::InvalidConfidence)
    );
}

// ── Conflicts ─────────────────────────────────────────────────

#[test]
fn night_override_wins_over_combined_rule() {
    let ctl = controller();
    let cycle = RoomCycle::new("bedroom", Reading::new(30.0, 750.0).with_time_slot(TimeSlot::Night), true);
    let mut sink = RecordingSink::new();

    let out = ctl.run_cycle(&cycle, &mut ScriptedPredictor::new(), &mut sink).unwrap();

    assert!(out.actions.contains(Action::AcOff));
    assert!(!out.actions.contains(Action::AcOn));
    assert_eq!(out.overridden, vec![Action::AcOn]);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ConflictOverridden { dropped: Action::AcOn, .. })),
        1
    );
}

// ── Batch ─────────────────────────────────────────────────────

#[test]
fn batch_collects_rejections_and_scores() {
    let ctl = controller();
    let mut cold = RoomCycle::new("a", Reading::new(17.0, 90.0), true);
    cold.actual_occupancy = Some(true);
    let mut empty = RoomCycle::new("b", Reading::new(22.0, 400.0), false);
    empty.actual_occupancy = Some(false);
    let broken = RoomCycle::new("c", Reading::new(60.0, 400.0), false);

    let report = ctl.run_batch(&[cold, empty, broken], &mut ScriptedPredictor::new(), &mut RecordingSink::new());

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].room, "c");
    assert_eq!(
        report.rejected[0].error,
        Error::InvalidReading(ReadingError::OutOfRange(Field::Temperature))
    );

    assert_eq!(report.tally.count(Action::LightOn), 1);
    assert_eq!(report.tally.count(Action::HeatOn), 1);
    assert_eq!(report.tally.count(Action::BlindsUp), 1);
    assert_eq!(report.tally.count(Action::LightOff), 1);
    assert_eq!(report.tally.total(), 4);

    assert_eq!(report.occupancy_score.tp, 1);
    assert_eq!(report.occupancy_score.tn, 1);
    assert_eq!(report.rule_presence_score.tp, 1);
    assert_eq!(report.rule_presence_score.tn, 1);
    assert_eq!(report.discrepancy_count(), 0);
}

#[test]
fn batch_rooms_are_independent() {
    let ctl = controller();
    let a = RoomCycle::new("a", Reading::new(17.0, 90.0), true);
    let b = RoomCycle::new("b", Reading::new(30.0, 850.0), true);
    let mut model = ScriptedPredictor::new();

    let forward = ctl.run_batch(&[a.clone(), b.clone()], &mut model, &mut RecordingSink::new());
    let backward = ctl.run_batch(&[b, a], &mut model, &mut RecordingSink::new());

    assert_eq!(forward.outcomes[0], backward.outcomes[1]);
    assert_eq!(forward.outcomes[1], backward.outcomes[0]);
}

// ── Commands and config ───────────────────────────────────────

#[test]
fn invalid_update_keeps_live_config() {
    let mut ctl = controller();
    let mut sink = RecordingSink::new();
    let bad = ControllerConfig {
        fusion: FusionStrategy::ml_if_confident(1.4),
        ..ControllerConfig::default()
    };

    assert!(ctl.handle_command(AppCommand::UpdateConfig(bad), &mut sink).is_err());
    assert_eq!(ctl.config(), &ControllerConfig::default());
    assert!(sink.events.is_empty());

    ctl.handle_command(AppCommand::SetFusionStrategy(FusionStrategy::ml_if_confident(0.9)), &mut sink)
        .unwrap();
    assert_eq!(ctl.config().fusion, FusionStrategy::ml_if_confident(0.9));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ConfigUpdated(_))), 1);
}

#[test]
fn storage_round_trip() {
    let store = MemConfig::default();
    let mut ctl = RoomController::from_storage(&store).unwrap();
    assert_eq!(ctl.config(), &ControllerConfig::default());

    ctl.handle_command(AppCommand::SetFusionStrategy(FusionStrategy::ManualOnly), &mut RecordingSink::new())
        .unwrap();
    ctl.save_config(&store).unwrap();

    let reloaded = RoomController::from_storage(&store).unwrap();
    assert_eq!(reloaded.config().fusion, FusionStrategy::ManualOnly);
}

#[test]
fn invalid_stored_config_is_refused() {
    let mut bad = ControllerConfig::default();
    bad.dark_idle.max_power_kw = -2.0;
    let store = MemConfig::with(bad);
    assert!(matches!(
        RoomController::from_storage(&store),
        Err(ConfigError::ValidationFailed(_))
    ));
}
