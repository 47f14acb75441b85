use crate::common::{DomainError, DomainResult};
use crate::domains::trigger::Trigger;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// World-space position as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Position3D> for Point3<f64> {
    fn from(p: Position3D) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

impl From<Point3<f64>> for Position3D {
    fn from(p: Point3<f64>) -> Self {
        Self { x: p.x, y: p.y, z: p.z }
    }
}

/// How a waypoint with `speed == 0` is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroSpeedPolicy {
    /// Accepted; the agent only arrives if it is already inside the trigger radius.
    #[default]
    Stall,
    /// Rejected when the path is built.
    Reject,
    /// The agent arrives immediately wherever it currently stands.
    IdleInPlace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    position: Point3<f64>,
    speed: f64,
    idle: f64,
    trigger_distance: f64,
    trigger: Option<Trigger>,
}

impl Waypoint {
    pub fn new(
        position: Point3<f64>,
        speed: f64,
        idle: f64,
        trigger_distance: f64,
        trigger: Option<Trigger>,
    ) -> DomainResult<Self> {
        if !position.iter().all(|c| c.is_finite()) {
            return Err(DomainError::waypoint_field("position", "coordinates must be finite"));
        }
        for (field, value) in [
            ("speed", speed),
            ("idle", idle),
            ("trigger_distance", trigger_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::waypoint_field(
                    field,
                    format!("must be a finite number >= 0, got {}", value),
                ));
            }
        }

        Ok(Self {
            position,
            speed,
            idle,
            trigger_distance,
            trigger,
        })
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn idle(&self) -> f64 {
        self.idle
    }

    /// The single definition of a zero-speed waypoint used by every [`ZeroSpeedPolicy`].
    pub fn has_zero_speed(&self) -> bool {
        self.speed == 0.0
    }

    pub fn trigger_distance(&self) -> f64 {
        self.trigger_distance
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }
}

/// Ordered, non-empty waypoint sequence plus the loop flag.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath {
    sequence: Vec<Waypoint>,
    looping: bool,
}

impl WaypointPath {
    pub fn new(sequence: Vec<Waypoint>, looping: bool, policy: ZeroSpeedPolicy) -> DomainResult<Self> {
        if sequence.is_empty() {
            return Err(DomainError::InvalidPath {
                index: None,
                reason: "waypoint sequence is empty".to_string(),
            });
        }

        if policy == ZeroSpeedPolicy::Reject {
            if let Some(index) = sequence.iter().position(Waypoint::has_zero_speed) {
                return Err(DomainError::InvalidPath {
                    index: Some(index),
                    reason: "speed must be greater than 0".to_string(),
                });
            }
        }

        Ok(Self { sequence, looping })
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always false for a constructed path; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.sequence.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.sequence.len() - 1
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.sequence
    }
}
