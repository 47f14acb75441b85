use crate::domains::logger::{DomainLogger, DynLogger};
use crate::domains::trigger::{ControlAction, EffectError, TriggerEffect, TriggerEffectSink, TriggerLogLevel};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Applies every effect synchronously by writing it to the domain logger.
pub struct LoggingEffectSink {
    logger: DynLogger,
}

impl LoggingEffectSink {
    pub fn new(logger: DynLogger) -> Self {
        Self { logger }
    }
}

impl TriggerEffectSink for LoggingEffectSink {
    fn dispatch(&self, effect: TriggerEffect) -> Result<(), EffectError> {
        apply_effect(self.logger.as_ref(), &effect);
        Ok(())
    }
}

/// Queues effects for a background worker; never blocks the tick.
/// A full queue is reported as an error rather than waited on.
pub struct ChannelEffectSink {
    sender: mpsc::Sender<TriggerEffect>,
}

impl ChannelEffectSink {
    pub fn new(sender: mpsc::Sender<TriggerEffect>) -> Self {
        Self { sender }
    }
}

impl TriggerEffectSink for ChannelEffectSink {
    fn dispatch(&self, effect: TriggerEffect) -> Result<(), EffectError> {
        self.sender.try_send(effect).map_err(|e| match e {
            TrySendError::Full(_) => EffectError::QueueFull,
            TrySendError::Closed(_) => EffectError::Closed,
        })
    }
}

/// Drains queued effects. Delayed events get their own task so one long
/// delay does not hold up the rest of the queue.
pub fn spawn_effect_worker(mut receiver: mpsc::Receiver<TriggerEffect>, logger: DynLogger) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(effect) = receiver.recv().await {
            match effect {
                TriggerEffect::Event { delay, .. } if delay > 0.0 => match Duration::try_from_secs_f64(delay) {
                    Ok(wait) => {
                        let logger = logger.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(wait).await;
                            apply_effect(logger.as_ref(), &effect);
                        });
                    }
                    Err(_) => {
                        logger.warn(&format!(
                            "Event delay {}s for agent '{}' out of range, firing immediately",
                            delay,
                            effect.agent_id()
                        ));
                        apply_effect(logger.as_ref(), &effect);
                    }
                },
                effect => apply_effect(logger.as_ref(), &effect),
            }
        }
    })
}

fn apply_effect(logger: &dyn DomainLogger, effect: &TriggerEffect) {
    match effect {
        TriggerEffect::Event {
            agent_id,
            waypoint_index,
            name,
            payload,
            ..
        } => logger.info(&format!(
            "[{} @ waypoint {}] event '{}' payload={}",
            agent_id, waypoint_index, name, payload
        )),
        TriggerEffect::Control {
            agent_id,
            waypoint_index,
            target,
            policy,
        } => {
            let actions: Vec<String> = policy.iter().map(ControlAction::describe).collect();
            logger.info(&format!(
                "[{} @ waypoint {}] control '{}': {}",
                agent_id,
                waypoint_index,
                target,
                actions.join(";")
            ));
        }
        TriggerEffect::Log {
            agent_id,
            waypoint_index,
            level,
            message,
        } => {
            let line = format!("[{} @ waypoint {}] {}", agent_id, waypoint_index, message);
            match level {
                TriggerLogLevel::Info => logger.info(&line),
                TriggerLogLevel::Warn => logger.warn(&line),
                TriggerLogLevel::Error => logger.error(&line),
            }
        }
    }
}
