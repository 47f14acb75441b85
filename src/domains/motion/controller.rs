use super::events::MotionEvent;
use crate::domains::trigger::{TriggerContext, TriggerEffectSink};
use crate::domains::waypoint::{Waypoint, WaypointPath, ZeroSpeedPolicy};
use chrono::Utc;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    NoPath,
    Traveling,
    ArrivedIdling,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    /// Tolerance for distance and idle-time comparisons.
    pub epsilon: f64,
    pub zero_speed: ZeroSpeedPolicy,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            zero_speed: ZeroSpeedPolicy::default(),
        }
    }
}

/// Kinematic state of an agent as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
}

impl Transform {
    pub fn at(position: Point3<f64>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSnapshot {
    pub phase: MotionPhase,
    pub current_index: Option<usize>,
    pub elapsed_idle: f64,
    pub fired_trigger: bool,
}

/// Per-agent waypoint-following state machine.
///
/// `NoPath -> Traveling -> ArrivedIdling -> (Traveling | Finished)`. Installing a
/// path always restarts at index 0 in `Traveling`, whatever the previous state.
#[derive(Debug, Clone)]
pub struct MotionController {
    agent_id: String,
    settings: MotionSettings,
    path: Option<WaypointPath>,
    current_index: Option<usize>,
    phase: MotionPhase,
    elapsed_idle: f64,
    fired_trigger: bool,
    completed_visits: u64,
    uncommitted_events: Vec<MotionEvent>,
}

impl MotionController {
    pub fn new(agent_id: impl Into<String>, settings: MotionSettings) -> Self {
        Self {
            agent_id: agent_id.into(),
            settings,
            path: None,
            current_index: None,
            phase: MotionPhase::NoPath,
            elapsed_idle: 0.0,
            fired_trigger: false,
            completed_visits: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Replaces any active path and discards all progress on it.
    pub fn install(&mut self, path: WaypointPath) {
        tracing::debug!(
            agent = %self.agent_id,
            waypoints = path.len(),
            looping = path.is_looping(),
            "installing waypoint path"
        );

        self.uncommitted_events.push(MotionEvent::PathInstalled {
            agent_id: self.agent_id.clone(),
            waypoint_count: path.len(),
            looping: path.is_looping(),
            timestamp: Utc::now(),
        });

        self.path = Some(path);
        self.current_index = Some(0);
        self.phase = MotionPhase::Traveling;
        self.elapsed_idle = 0.0;
        self.fired_trigger = false;
        self.completed_visits = 0;
    }

    /// Advances the controller by `dt` seconds. At most one arrival is
    /// processed per call, so a looping path of coincident zero-idle
    /// waypoints cannot spin inside a single tick.
    pub fn update(&mut self, transform: &mut Transform, dt: f64, effects: &dyn TriggerEffectSink) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        match self.phase {
            MotionPhase::NoPath | MotionPhase::Finished => {}
            MotionPhase::Traveling => self.travel(transform, dt, effects),
            MotionPhase::ArrivedIdling => {
                self.elapsed_idle += dt;
                self.try_depart(transform);
            }
        }
    }

    fn travel(&mut self, transform: &mut Transform, dt: f64, effects: &dyn TriggerEffectSink) {
        let (Some(index), Some(waypoint)) = (self.current_index, self.current_waypoint()) else {
            return;
        };
        let (target, speed, radius) = (waypoint.position(), waypoint.speed(), waypoint.trigger_distance());
        let eps = self.settings.epsilon;

        let arrive_in_place = waypoint.has_zero_speed() && self.settings.zero_speed == ZeroSpeedPolicy::IdleInPlace;
        let remaining = if arrive_in_place {
            0.0
        } else {
            let to_target = target - transform.position;
            let distance = to_target.norm();
            let step = speed * dt;

            if step + eps >= distance {
                transform.position = target;
                transform.velocity = Vector3::zeros();
                0.0
            } else {
                let direction = to_target / distance;
                transform.position += direction * step;
                transform.velocity = direction * speed;
                distance - step
            }
        };

        if remaining <= radius + eps {
            self.arrive(index, transform, effects);
            self.try_depart(transform);
        }
    }

    fn arrive(&mut self, index: usize, transform: &mut Transform, effects: &dyn TriggerEffectSink) {
        self.phase = MotionPhase::ArrivedIdling;
        self.elapsed_idle = 0.0;
        transform.velocity = Vector3::zeros();

        tracing::debug!(agent = %self.agent_id, index, "waypoint reached");
        self.uncommitted_events.push(MotionEvent::WaypointReached {
            agent_id: self.agent_id.clone(),
            index,
            position: transform.position.into(),
            timestamp: Utc::now(),
        });

        if self.fired_trigger {
            return;
        }
        let Some(trigger) = self.current_waypoint().and_then(Waypoint::trigger).cloned() else {
            return;
        };

        // Marked before firing: a failing effect still counts as this visit's firing.
        self.fired_trigger = true;
        let ctx = TriggerContext {
            agent_id: &self.agent_id,
            waypoint_index: index,
            position: transform.position,
        };
        let event = match trigger.fire(&ctx, effects) {
            Ok(()) => MotionEvent::TriggerFired {
                agent_id: self.agent_id.clone(),
                index,
                kind: trigger.kind(),
                timestamp: Utc::now(),
            },
            Err(e) => {
                tracing::warn!(agent = %self.agent_id, index, error = %e, "trigger effect failed");
                MotionEvent::TriggerFailed {
                    agent_id: self.agent_id.clone(),
                    index,
                    kind: trigger.kind(),
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                }
            }
        };
        self.uncommitted_events.push(event);
    }

    fn try_depart(&mut self, transform: &Transform) {
        let (Some(path), Some(index)) = (self.path.as_ref(), self.current_index) else {
            return;
        };
        let idle = path.get(index).map(Waypoint::idle).unwrap_or(0.0);
        if self.elapsed_idle + self.settings.epsilon < idle {
            return;
        }

        let is_last = index == path.last_index();
        let looping = path.is_looping();
        let now = Utc::now();

        self.completed_visits += 1;
        self.uncommitted_events.push(MotionEvent::WaypointCompleted {
            agent_id: self.agent_id.clone(),
            index,
            timestamp: now,
        });
        self.elapsed_idle = 0.0;
        self.fired_trigger = false;

        if !is_last {
            self.current_index = Some(index + 1);
            self.phase = MotionPhase::Traveling;
        } else if looping {
            tracing::debug!(agent = %self.agent_id, "path complete, looping to first waypoint");
            self.current_index = Some(0);
            self.phase = MotionPhase::Traveling;
            self.uncommitted_events.push(MotionEvent::LoopRestarted {
                agent_id: self.agent_id.clone(),
                timestamp: now,
            });
        } else {
            tracing::debug!(agent = %self.agent_id, "path finished");
            self.phase = MotionPhase::Finished;
            self.uncommitted_events.push(MotionEvent::PathFinished {
                agent_id: self.agent_id.clone(),
                position: transform.position.into(),
                timestamp: now,
            });
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn elapsed_idle(&self) -> f64 {
        self.elapsed_idle
    }

    pub fn fired_trigger(&self) -> bool {
        self.fired_trigger
    }

    /// Number of idle periods completed since the current path was installed.
    pub fn completed_visits(&self) -> u64 {
        self.completed_visits
    }

    pub fn path(&self) -> Option<&WaypointPath> {
        self.path.as_ref()
    }

    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.path.as_ref()?.get(self.current_index?)
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            phase: self.phase,
            current_index: self.current_index,
            elapsed_idle: self.elapsed_idle,
            fired_trigger: self.fired_trigger,
        }
    }

    pub fn uncommitted_events(&self) -> &[MotionEvent] {
        &self.uncommitted_events
    }

    pub fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }
}
