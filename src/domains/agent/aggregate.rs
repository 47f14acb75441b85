use crate::domains::motion::{MotionController, MotionSettings, Transform};
use crate::domains::trigger::TriggerEffectSink;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Pedestrian,
    NpcVehicle,
    Ego,
}

impl AgentKind {
    /// Ego vehicles are driven by the system under test, never by scripts.
    pub fn supports_waypoints(&self) -> bool {
        matches!(self, AgentKind::Pedestrian | AgentKind::NpcVehicle)
    }
}

#[derive(Debug, Clone)]
pub struct SimAgent {
    pub uid: String,
    pub kind: AgentKind,
    pub transform: Transform,
    motion: Option<MotionController>,
}

/// Shared handle; the mutex is the per-agent exclusion between command
/// handling and tick processing.
pub type AgentHandle = Arc<Mutex<SimAgent>>;

impl SimAgent {
    pub fn new(uid: impl Into<String>, kind: AgentKind, position: Point3<f64>, settings: MotionSettings) -> Self {
        let uid = uid.into();
        let motion = kind
            .supports_waypoints()
            .then(|| MotionController::new(uid.clone(), settings));

        Self {
            uid,
            kind,
            transform: Transform::at(position),
            motion,
        }
    }

    pub fn into_handle(self) -> AgentHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn position(&self) -> Point3<f64> {
        self.transform.position
    }

    pub fn motion_controller(&self) -> Option<&MotionController> {
        self.motion.as_ref()
    }

    pub fn motion_controller_mut(&mut self) -> Option<&mut MotionController> {
        self.motion.as_mut()
    }

    pub fn update(&mut self, dt: f64, effects: &dyn TriggerEffectSink) {
        if let Some(motion) = self.motion.as_mut() {
            motion.update(&mut self.transform, dt, effects);
        }
    }
}
