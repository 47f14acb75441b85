use super::kinds::{ControlAction, TriggerLogLevel};
use nalgebra::Point3;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// What a trigger knows about the agent that reached its waypoint.
#[derive(Debug, Clone, Copy)]
pub struct TriggerContext<'a> {
    pub agent_id: &'a str,
    pub waypoint_index: usize,
    pub position: Point3<f64>,
}

/// Concrete side effect produced by firing a trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TriggerEffect {
    Event {
        agent_id: String,
        waypoint_index: usize,
        name: String,
        payload: Value,
        delay: f64,
    },
    Control {
        agent_id: String,
        waypoint_index: usize,
        target: String,
        policy: Vec<ControlAction>,
    },
    Log {
        agent_id: String,
        waypoint_index: usize,
        level: TriggerLogLevel,
        message: String,
    },
}

impl TriggerEffect {
    pub fn agent_id(&self) -> &str {
        match self {
            TriggerEffect::Event { agent_id, .. } => agent_id,
            TriggerEffect::Control { agent_id, .. } => agent_id,
            TriggerEffect::Log { agent_id, .. } => agent_id,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    #[error("effect queue is full")]
    QueueFull,

    #[error("effect consumer has shut down")]
    Closed,

    #[error("effect rejected: {0}")]
    Rejected(String),
}

/// Port through which fired triggers reach the rest of the simulation.
/// Implementations must return promptly; they are called from inside a tick.
pub trait TriggerEffectSink: Send + Sync {
    fn dispatch(&self, effect: TriggerEffect) -> Result<(), EffectError>;
}
