use crate::common::DomainEvent;
use crate::domains::trigger::TriggerKind;
use crate::domains::waypoint::Position3D;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MotionEvent {
    PathInstalled {
        agent_id: String,
        waypoint_count: usize,
        looping: bool,
        timestamp: DateTime<Utc>,
    },
    WaypointReached {
        agent_id: String,
        index: usize,
        position: Position3D,
        timestamp: DateTime<Utc>,
    },
    TriggerFired {
        agent_id: String,
        index: usize,
        kind: TriggerKind,
        timestamp: DateTime<Utc>,
    },
    TriggerFailed {
        agent_id: String,
        index: usize,
        kind: TriggerKind,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    WaypointCompleted {
        agent_id: String,
        index: usize,
        timestamp: DateTime<Utc>,
    },
    LoopRestarted {
        agent_id: String,
        timestamp: DateTime<Utc>,
    },
    PathFinished {
        agent_id: String,
        position: Position3D,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for MotionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MotionEvent::PathInstalled { .. } => "PathInstalled",
            MotionEvent::WaypointReached { .. } => "WaypointReached",
            MotionEvent::TriggerFired { .. } => "TriggerFired",
            MotionEvent::TriggerFailed { .. } => "TriggerFailed",
            MotionEvent::WaypointCompleted { .. } => "WaypointCompleted",
            MotionEvent::LoopRestarted { .. } => "LoopRestarted",
            MotionEvent::PathFinished { .. } => "PathFinished",
        }
    }

    fn agent_id(&self) -> &str {
        match self {
            MotionEvent::PathInstalled { agent_id, .. } => agent_id,
            MotionEvent::WaypointReached { agent_id, .. } => agent_id,
            MotionEvent::TriggerFired { agent_id, .. } => agent_id,
            MotionEvent::TriggerFailed { agent_id, .. } => agent_id,
            MotionEvent::WaypointCompleted { agent_id, .. } => agent_id,
            MotionEvent::LoopRestarted { agent_id, .. } => agent_id,
            MotionEvent::PathFinished { agent_id, .. } => agent_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MotionEvent::PathInstalled { timestamp, .. } => *timestamp,
            MotionEvent::WaypointReached { timestamp, .. } => *timestamp,
            MotionEvent::TriggerFired { timestamp, .. } => *timestamp,
            MotionEvent::TriggerFailed { timestamp, .. } => *timestamp,
            MotionEvent::WaypointCompleted { timestamp, .. } => *timestamp,
            MotionEvent::LoopRestarted { timestamp, .. } => *timestamp,
            MotionEvent::PathFinished { timestamp, .. } => *timestamp,
        }
    }
}
