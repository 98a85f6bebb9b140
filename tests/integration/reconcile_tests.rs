//! Integration tests for reasoner reconciliation inside a cycle, and for
//! the JSON shape of batch input.

use std::collections::BTreeSet;

use smartroom::actions::Action;
use smartroom::app::events::AppEvent;
use smartroom::app::service::{RoomController, RoomCycle};
use smartroom::config::ControllerConfig;
use smartroom::reconcile::{InferenceSnapshot, InferredFact};
use smartroom::sensors::{Reading, TimeSlot};

use crate::mock_ports::{RecordingSink, ScriptedPredictor};

fn labels(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn fact(category: &str, actions: &[&str]) -> InferredFact {
    InferredFact {
        category: category.to_owned(),
        actions: actions.iter().map(|a| (*a).to_owned()).collect(),
    }
}

#[test]
fn agreeing_reasoner_reports_no_discrepancy() {
    let ctl = RoomController::new(ControllerConfig::default()).unwrap();
    let mut cycle = RoomCycle::new("studio", Reading::new(17.0, 90.0), true);
    cycle.inferred = Some(InferenceSnapshot::new(vec![
        fact("StanzaFredda", &["AccendiRiscaldamento_4f2a"]),
        fact("StanzaBuia", &["http://example.org/smarthome#AccendiLuce", "AlzaTapparelle"]),
    ]));
    let mut sink = RecordingSink::new();

    let out = ctl.run_cycle(&cycle, &mut ScriptedPredictor::new(), &mut sink).unwrap();

    let rec = out.reconciliation.unwrap();
    assert!(rec.is_consistent());
    assert_eq!(out.categories, ["StanzaFredda", "StanzaBuia"]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Discrepancy { .. })), 0);
}

#[test]
fn disagreement_is_advisory() {
    let ctl = RoomController::new(ControllerConfig::default()).unwrap();
    let mut cycle = RoomCycle::new("studio", Reading::new(17.0, 90.0), true);
    cycle.inferred = Some(InferenceSnapshot::new(vec![fact("StanzaCalda", &["Accendi climatizzatore"])]));
    let mut sink = RecordingSink::new();

    let out = ctl.run_cycle(&cycle, &mut ScriptedPredictor::new(), &mut sink).unwrap();

    // The rule set is issued unchanged.
    assert!(out.actions.contains(Action::LightOn));
    assert!(out.actions.contains(Action::HeatOn));
    assert!(out.actions.contains(Action::BlindsUp));
    assert!(!out.actions.contains(Action::AcOn));

    let rec = out.reconciliation.unwrap();
    assert_eq!(rec.rule_only, labels(&["accendiluce", "accendiriscaldamento", "alzatapparelle"]));
    assert_eq!(rec.inferred_only, labels(&["accendiclimatizzatore"]));

    let reported: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Discrepancy { labels, .. } => Some(labels.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(reported, vec![rec.discrepancies()]);
}

#[test]
fn no_snapshot_means_no_reconciliation() {
    let ctl = RoomController::new(ControllerConfig::default()).unwrap();
    let cycle = RoomCycle::new("studio", Reading::new(22.0, 400.0), false);
    let out = ctl.run_cycle(&cycle, &mut ScriptedPredictor::new(), &mut RecordingSink::new()).unwrap();
    assert!(out.reconciliation.is_none());
    assert!(out.categories.is_empty());
}

#[test]
fn batch_input_parses_from_json() {
    let json = r#"[
        {
            "room": "living",
            "reading": { "temperature_c": 30.0, "illumination_lux": 850.0, "power_kw": 2.1 },
            "manual_occupancy": false,
            "recorded_prediction": { "occupied": true, "confidence": 0.9 },
            "inferred": [ { "category": "StanzaCalda", "actions": ["AccendiClimatizzatore"] } ],
            "actual_occupancy": true
        },
        {
            "room": "bedroom",
            "reading": { "temperature_c": 19.5, "illumination_lux": 20.0, "time_slot": "night" },
            "strategy": { "kind": "manual_only" }
        }
    ]"#;
    let cycles: Vec<RoomCycle> = serde_json::from_str(json).unwrap();

    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0].reading.power_kw, Some(2.1));
    assert_eq!(cycles[0].inferred.as_ref().map(|s| s.facts.len()), Some(1));
    assert_eq!(cycles[1].reading.time_slot, TimeSlot::Night);
    assert!(!cycles[1].manual_occupancy);
    assert_eq!(cycles[1].actual_occupancy, None);
}

#[test]
fn outcome_serialises_actions_as_list() {
    let ctl = RoomController::new(ControllerConfig::default()).unwrap();
    let cycle = RoomCycle::new("living", Reading::new(30.0, 850.0), true);
    let out = ctl.run_cycle(&cycle, &mut ScriptedPredictor::new(), &mut RecordingSink::new()).unwrap();

    let value: serde_json::Value = serde_json::to_value(&out).unwrap();
    assert_eq!(value["room"], "living");
    assert_eq!(
        value["actions"],
        serde_json::json!(["LightOff", "HeatOff", "AcOn", "BlindsDown"])
    );
}
