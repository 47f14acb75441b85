#![allow(dead_code)]

use nalgebra::Point3;
use std::sync::{Arc, Mutex};
use waypoint_sim::domains::logger::DomainLogger;
use waypoint_sim::domains::trigger::{EffectError, Trigger, TriggerEffect, TriggerEffectSink};
use waypoint_sim::domains::waypoint::{Waypoint, WaypointPath, ZeroSpeedPolicy};

#[derive(Default)]
pub struct RecordingSink {
    pub effects: Mutex<Vec<TriggerEffect>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.effects.lock().unwrap().len()
    }
}

impl TriggerEffectSink for RecordingSink {
    fn dispatch(&self, effect: TriggerEffect) -> Result<(), EffectError> {
        self.effects.lock().unwrap().push(effect);
        Ok(())
    }
}

#[derive(Default)]
pub struct FailingSink {
    pub attempts: Mutex<usize>,
}

impl TriggerEffectSink for FailingSink {
    fn dispatch(&self, _effect: TriggerEffect) -> Result<(), EffectError> {
        *self.attempts.lock().unwrap() += 1;
        Err(EffectError::Rejected("target offline".to_string()))
    }
}

pub struct CaptureLogger {
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl CaptureLogger {
    pub fn new() -> Self {
        Self { messages: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m.contains(needle))
    }
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

pub fn waypoint(x: f64, y: f64, z: f64, speed: f64, idle: f64, trigger_distance: f64) -> Waypoint {
    Waypoint::new(Point3::new(x, y, z), speed, idle, trigger_distance, None).unwrap()
}

pub fn waypoint_with_trigger(x: f64, y: f64, z: f64, speed: f64, idle: f64, trigger_distance: f64) -> Waypoint {
    let trigger = Trigger::Event {
        name: "arrived".to_string(),
        payload: serde_json::Value::Null,
        delay: 0.0,
    };
    Waypoint::new(Point3::new(x, y, z), speed, idle, trigger_distance, Some(trigger)).unwrap()
}

pub fn path(waypoints: Vec<Waypoint>, looping: bool) -> WaypointPath {
    WaypointPath::new(waypoints, looping, ZeroSpeedPolicy::Stall).unwrap()
}
