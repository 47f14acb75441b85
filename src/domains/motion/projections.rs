use super::events::MotionEvent;
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read model summarising how far an agent has progressed along its path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionProgress {
    pub agent_id: String,
    pub waypoint_count: usize,
    pub looping: bool,
    pub waypoints_reached: u64,
    pub triggers_fired: u64,
    pub triggers_failed: u64,
    pub idle_periods_completed: u64,
    pub loops_completed: u64,
    pub last_reached_index: Option<usize>,
    pub finished: bool,
    pub last_updated: DateTime<Utc>,
}

impl MotionProgress {
    pub fn new(agent_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            agent_id,
            waypoint_count: 0,
            looping: false,
            waypoints_reached: 0,
            triggers_fired: 0,
            triggers_failed: 0,
            idle_periods_completed: 0,
            loops_completed: 0,
            last_reached_index: None,
            finished: false,
            last_updated: created_at,
        }
    }

    pub fn apply_event(&mut self, event: &MotionEvent) {
        match event {
            MotionEvent::PathInstalled { waypoint_count, looping, .. } => {
                // A new path starts a fresh count.
                *self = MotionProgress::new(self.agent_id.clone(), self.last_updated);
                self.waypoint_count = *waypoint_count;
                self.looping = *looping;
            }
            MotionEvent::WaypointReached { index, .. } => {
                self.waypoints_reached += 1;
                self.last_reached_index = Some(*index);
            }
            MotionEvent::TriggerFired { .. } => self.triggers_fired += 1,
            MotionEvent::TriggerFailed { .. } => self.triggers_failed += 1,
            MotionEvent::WaypointCompleted { .. } => self.idle_periods_completed += 1,
            MotionEvent::LoopRestarted { .. } => self.loops_completed += 1,
            MotionEvent::PathFinished { .. } => self.finished = true,
        }
        self.last_updated = event.occurred_at();
    }
}

#[derive(Debug, Default)]
pub struct MotionProjectionStore {
    pub progress: HashMap<String, MotionProgress>,
}

impl MotionProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_event(&mut self, event: &MotionEvent) {
        self.progress
            .entry(event.agent_id().to_string())
            .or_insert_with(|| MotionProgress::new(event.agent_id().to_string(), event.occurred_at()))
            .apply_event(event);
    }

    pub fn get(&self, agent_id: &str) -> Option<&MotionProgress> {
        self.progress.get(agent_id)
    }

    pub fn remove(&mut self, agent_id: &str) {
        self.progress.remove(agent_id);
    }
}
