mod support;

use nalgebra::Point3;
use serde_json::json;
use support::RecordingSink;
use waypoint_sim::common::DomainError;
use waypoint_sim::domains::trigger::*;

fn ctx() -> TriggerContext<'static> {
    TriggerContext {
        agent_id: "ped-7",
        waypoint_index: 2,
        position: Point3::new(1.0, 0.0, 4.0),
    }
}

#[test]
fn test_event_trigger_reports_given_values() {
    let trigger = Trigger::deserialize(&json!({
        "type": "event",
        "name": "crossing_started",
        "payload": {"lane": 3},
        "delay": 1.5
    }))
    .unwrap();

    assert_eq!(trigger.kind(), TriggerKind::Event);
    match &trigger {
        Trigger::Event { name, payload, delay } => {
            assert_eq!(name, "crossing_started");
            assert_eq!(payload, &json!({"lane": 3}));
            assert_eq!(*delay, 1.5);
        }
        _ => panic!("Expected Event trigger"),
    }
}

#[test]
fn test_control_trigger_reports_given_values() {
    let trigger = Trigger::deserialize(&json!({
        "type": "control",
        "target": "signal-12",
        "policy": [
            {"action": "state", "value": "green"},
            {"action": "wait", "value": 15},
            {"action": "loop"}
        ]
    }))
    .unwrap();

    assert_eq!(trigger.kind(), TriggerKind::Control);
    assert_eq!(
        trigger,
        Trigger::Control {
            target: "signal-12".to_string(),
            policy: vec![
                ControlAction { action: "state".to_string(), value: Some(json!("green")) },
                ControlAction { action: "wait".to_string(), value: Some(json!(15)) },
                ControlAction { action: "loop".to_string(), value: None },
            ],
        }
    );
}

#[test]
fn test_log_trigger_defaults_to_info() {
    let trigger = Trigger::deserialize(&json!({"type": "log", "message": "halfway"})).unwrap();
    assert_eq!(
        trigger,
        Trigger::Log {
            message: "halfway".to_string(),
            level: TriggerLogLevel::Info,
        }
    );
}

#[test]
fn test_trigger_json_round_trip() {
    let definitions = [
        json!({"type": "event", "name": "arrived", "payload": {"k": "v"}, "delay": 0.0}),
        json!({"type": "control", "target": "gate", "policy": [{"action": "open"}]}),
        json!({
            "type": "control",
            "target": "gate",
            "policy": [{"action": "wait", "value": 15}, {"action": "state", "value": "closed"}, {"action": "ramp", "value": 0.5}]
        }),
        json!({"type": "log", "message": "checkpoint", "level": "warn"}),
    ];

    for definition in definitions {
        let trigger = Trigger::deserialize(&definition).unwrap();
        assert_eq!(trigger.to_json(), definition);
        assert_eq!(Trigger::deserialize(&trigger.to_json()).unwrap(), trigger);
    }
}

#[test]
fn test_unknown_kind_is_rejected() {
    let err = Trigger::deserialize(&json!({"type": "teleport", "to": [0, 0, 0]})).unwrap_err();
    assert_eq!(
        err,
        DomainError::UnknownTriggerKind {
            kind: "teleport".to_string()
        }
    );
    assert_eq!(err.to_string(), "Unknown trigger kind 'teleport'");
}

#[test]
fn test_missing_discriminator_names_type_field() {
    let err = Trigger::deserialize(&json!({"name": "arrived"})).unwrap_err();
    assert!(matches!(err, DomainError::TriggerParse { ref field, .. } if field == "type"));

    let err = Trigger::deserialize(&json!({"type": 7})).unwrap_err();
    assert!(matches!(err, DomainError::TriggerParse { ref field, .. } if field == "type"));
}

#[test]
fn test_malformed_fields_are_named() {
    let cases = [
        (json!({"type": "event"}), "name"),
        (json!({"type": "event", "name": ""}), "name"),
        (json!({"type": "event", "name": "x", "delay": -1.0}), "delay"),
        (json!({"type": "event", "name": "x", "delay": "soon"}), "delay"),
        (json!({"type": "control", "policy": [{"action": "a"}]}), "target"),
        (json!({"type": "control", "target": "t"}), "policy"),
        (json!({"type": "control", "target": "t", "policy": []}), "policy"),
        (json!({"type": "control", "target": "t", "policy": [{"value": "1"}]}), "policy[0].action"),
        (json!({"type": "control", "target": "t", "policy": [{"action": "a", "value": [1]}]}), "policy[0].value"),
        (json!({"type": "log"}), "message"),
        (json!({"type": "log", "message": "m", "level": "debug"}), "level"),
        (json!("event"), "trigger"),
    ];

    for (definition, expected) in cases {
        match Trigger::deserialize(&definition) {
            Err(DomainError::TriggerParse { field, .. }) => assert_eq!(field, expected, "for {}", definition),
            other => panic!("Expected TriggerParse for {}, got {:?}", definition, other),
        }
    }
}

#[test]
fn test_fire_dispatches_effect_with_agent_context() {
    let sink = RecordingSink::default();
    let trigger = Trigger::Control {
        target: "signal-12".to_string(),
        policy: vec![ControlAction { action: "state".to_string(), value: Some(json!("red")) }],
    };

    trigger.fire(&ctx(), &sink).unwrap();

    let effects = sink.effects.lock().unwrap();
    assert_eq!(effects.len(), 1);
    match &effects[0] {
        TriggerEffect::Control { agent_id, waypoint_index, target, policy } => {
            assert_eq!(agent_id, "ped-7");
            assert_eq!(*waypoint_index, 2);
            assert_eq!(target, "signal-12");
            assert_eq!(policy.len(), 1);
        }
        other => panic!("Expected Control effect, got {:?}", other),
    }
}

#[test]
fn test_kind_names_parse_back() {
    for kind in TriggerKind::ALL {
        assert_eq!(TriggerKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(TriggerKind::parse("Event"), None);
}

#[test]
fn test_control_values_keep_their_json_type() {
    let definition = json!({"type": "control", "target": "gate", "policy": [{"action": "wait", "value": 15}]});
    let trigger = Trigger::deserialize(&definition).unwrap();

    assert_eq!(trigger.to_json()["policy"][0]["value"], json!(15));
    match &trigger {
        Trigger::Control { policy, .. } => assert_eq!(policy[0].describe(), "wait=15"),
        other => panic!("Expected Control trigger, got {:?}", other),
    }
}
