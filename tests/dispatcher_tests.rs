mod support;

use nalgebra::Point3;
use serde_json::json;
use std::sync::Arc;
use support::RecordingSink;
use waypoint_sim::adapters::inbound::*;
use waypoint_sim::adapters::outbound::{init_noop_logger, InMemoryAgentRegistry};
use waypoint_sim::application::{CommandGateway, TickScheduler};
use waypoint_sim::common::CommandError;
use waypoint_sim::domains::agent::{AgentKind, AgentRegistry, SimAgent};
use waypoint_sim::domains::motion::MotionSettings;
use waypoint_sim::domains::waypoint::ZeroSpeedPolicy;

fn setup() -> (CommandDispatcher, Arc<InMemoryAgentRegistry>, Arc<TickScheduler>) {
    let registry = Arc::new(InMemoryAgentRegistry::new());
    registry.spawn(SimAgent::new(
        "ped-1",
        AgentKind::Pedestrian,
        Point3::origin(),
        MotionSettings::default(),
    ));
    let scheduler = Arc::new(TickScheduler::new(
        Arc::new(RecordingSink::default()),
        init_noop_logger(),
        0.25,
    ));
    let gateway = Arc::new(CommandGateway::new(
        registry.clone(),
        scheduler.clone(),
        init_noop_logger(),
        ZeroSpeedPolicy::Stall,
    ));
    (CommandDispatcher::new(gateway), registry, scheduler)
}

fn follow_line(command: &str, args: serde_json::Value) -> String {
    json!({"command": command, "arguments": args}).to_string()
}

#[test]
fn test_successful_command_returns_null_result() {
    let (dispatcher, _, scheduler) = setup();

    let line = follow_line(
        FOLLOW_WAYPOINTS,
        json!({
            "uid": "ped-1",
            "waypoints": [{"position": {"x": 4.0, "y": 0.0, "z": 0.0}, "speed": 1.0}],
            "loop": true
        }),
    );
    let response = dispatcher.handle_json(&line);

    assert_eq!(response, CommandResponse::ok());
    assert_eq!(response.to_json_line(), r#"{"result":null}"#);
    assert!(scheduler.is_registered("ped-1"));
}

#[test]
fn test_pedestrian_alias_is_accepted() {
    let (dispatcher, registry, _) = setup();

    let line = follow_line(
        PEDESTRIAN_FOLLOW_WAYPOINTS,
        json!({
            "uid": "ped-1",
            "waypoints": [{"position": {"x": 1.0, "y": 1.0, "z": 0.0}, "speed": 0.5}]
        }),
    );
    assert!(dispatcher.handle_json(&line).is_ok());

    // `loop` omitted means a one-shot path
    let handle = registry.lookup("ped-1").unwrap();
    let agent = handle.lock().unwrap();
    assert!(!agent.motion_controller().unwrap().path().unwrap().is_looping());
}

#[test]
fn test_error_response_carries_message() {
    let (dispatcher, _, scheduler) = setup();

    let line = follow_line(FOLLOW_WAYPOINTS, json!({"uid": "ped-1", "waypoints": []}));
    let response = dispatcher.handle_json(&line);

    assert_eq!(response, CommandResponse::Error("Waypoint list is empty".to_string()));
    assert_eq!(response.to_json_line(), r#"{"error":"Waypoint list is empty"}"#);
    assert!(!scheduler.is_registered("ped-1"));
}

#[test]
fn test_unparseable_line_is_answered() {
    let (dispatcher, _, _) = setup();

    match dispatcher.handle_json("{not json") {
        CommandResponse::Error(msg) => assert!(msg.starts_with("Malformed command:"), "{}", msg),
        other => panic!("Expected error response, got {:?}", other),
    }
    assert!(!dispatcher.handle_json(r#"{"arguments": {}}"#).is_ok());
}

#[test]
fn test_unknown_command_is_rejected() {
    let (dispatcher, _, _) = setup();

    let response = dispatcher.handle(&CommandRequest {
        command: "agent/fly".to_string(),
        arguments: json!({}),
    });

    assert_eq!(response, CommandResponse::Error("Unknown command 'agent/fly'".to_string()));
}

#[test]
fn test_request_arguments_are_checked() {
    let cases = [
        (json!({"waypoints": []}), "uid"),
        (json!({"uid": 5, "waypoints": []}), "uid"),
        (json!({"uid": "ped-1"}), "waypoints"),
        (json!({"uid": "ped-1", "waypoints": {}}), "waypoints"),
        (json!({"uid": "ped-1", "waypoints": [], "loop": "yes"}), "loop"),
    ];

    for (args, field) in cases {
        assert_eq!(
            FollowWaypointsRequest::from_arguments(&args),
            Err(CommandError::MalformedRequest { field: field.to_string() }),
            "for {}",
            args
        );
    }

    let request = FollowWaypointsRequest::from_arguments(&json!({
        "uid": "npc-3",
        "waypoints": [{}, {}],
        "loop": null
    }))
    .unwrap();
    assert_eq!(request.uid, "npc-3");
    assert_eq!(request.waypoints.len(), 2);
    assert!(!request.looping);
}

#[test]
fn test_waypoint_errors_reach_the_caller() {
    let (dispatcher, _, _) = setup();

    let line = follow_line(
        FOLLOW_WAYPOINTS,
        json!({
            "uid": "ped-1",
            "waypoints": [{"position": {"x": 0, "y": 0, "z": 0}, "speed": 1, "trigger": {"type": "teleport"}}]
        }),
    );

    assert_eq!(
        dispatcher.handle_json(&line),
        CommandResponse::Error("Invalid waypoint 0: Unknown trigger kind 'teleport'".to_string())
    );
}
