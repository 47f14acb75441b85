use crate::common::{EventEnvelope, EventMetadata};
use crate::domains::agent::{AgentHandle, UpdateScheduler};
use crate::domains::logger::DynLogger;
use crate::domains::motion::{MotionEvent, MotionProgress, MotionProjectionStore};
use crate::domains::trigger::TriggerEffectSink;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Advances every registered agent once per simulation frame and collects the
/// motion notifications they produced. Agents are independent, so the visiting
/// order carries no meaning.
pub struct TickScheduler {
    agents: Mutex<HashMap<String, AgentHandle>>,
    projections: Mutex<MotionProjectionStore>,
    effects: Arc<dyn TriggerEffectSink>,
    logger: DynLogger,
    max_dt: f64,
    ticks: AtomicU64,
}

impl TickScheduler {
    pub fn new(effects: Arc<dyn TriggerEffectSink>, logger: DynLogger, max_dt: f64) -> Self {
        Self {
            agents: Mutex::new(HashMap::new()),
            projections: Mutex::new(MotionProjectionStore::new()),
            effects,
            logger,
            max_dt,
            ticks: AtomicU64::new(0),
        }
    }

    /// Runs one frame. `dt` is clamped to `max_dt`; non-positive or
    /// non-finite values skip the frame entirely.
    pub fn tick(&self, dt: f64) -> Vec<EventEnvelope> {
        if !dt.is_finite() || dt <= 0.0 {
            return Vec::new();
        }
        let dt = dt.min(self.max_dt);
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;

        let agents: Vec<(String, AgentHandle)> = self
            .agents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(uid, handle)| (uid.clone(), handle.clone()))
            .collect();

        let mut notifications = Vec::new();
        for (uid, handle) in agents {
            let events = match handle.lock() {
                Ok(mut agent) => {
                    agent.update(dt, self.effects.as_ref());
                    agent
                        .motion_controller_mut()
                        .map(|motion| {
                            let events = motion.uncommitted_events().to_vec();
                            motion.mark_events_as_committed();
                            events
                        })
                        .unwrap_or_default()
                }
                Err(_) => {
                    self.logger.error(&format!("Skipping agent '{}': state lock poisoned", uid));
                    continue;
                }
            };

            self.publish(tick, events, &mut notifications);
        }

        notifications
    }

    fn publish(&self, tick: u64, events: Vec<MotionEvent>, out: &mut Vec<EventEnvelope>) {
        if events.is_empty() {
            return;
        }

        let mut projections = self.projections.lock().unwrap_or_else(PoisonError::into_inner);
        for event in events {
            projections.apply_event(&event);

            let metadata = EventMetadata {
                tick,
                source: "TickScheduler".to_string(),
            };
            match EventEnvelope::new(&event, metadata) {
                Ok(envelope) => out.push(envelope),
                Err(e) => self.logger.error(&format!("Failed to create event envelope: {}", e)),
            }
        }
    }

    pub fn unregister(&self, uid: &str) -> bool {
        self.projections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uid);
        self.agents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uid)
            .is_some()
    }

    pub fn is_registered(&self, uid: &str) -> bool {
        self.agents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(uid)
    }

    pub fn registered_count(&self) -> usize {
        self.agents.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn progress(&self, uid: &str) -> Option<MotionProgress> {
        self.projections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uid)
            .cloned()
    }
}

impl UpdateScheduler for TickScheduler {
    fn register_for_updates(&self, uid: &str, agent: AgentHandle) {
        let mut agents = self.agents.lock().unwrap_or_else(PoisonError::into_inner);
        match agents.get(uid) {
            Some(existing) if Arc::ptr_eq(existing, &agent) => {}
            Some(_) => {
                // Same uid, different instance: the agent was respawned.
                agents.insert(uid.to_string(), agent);
            }
            None => {
                self.logger.info(&format!("Agent '{}' registered for updates", uid));
                agents.insert(uid.to_string(), agent);
            }
        }
    }
}
