use super::effects::{EffectError, TriggerContext, TriggerEffect, TriggerEffectSink};
use crate::common::{DomainError, DomainResult, FieldScope};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const SCOPE: FieldScope = FieldScope::Trigger;

/// Discriminator values accepted in a trigger's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Event,
    Control,
    Log,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 3] = [TriggerKind::Event, TriggerKind::Control, TriggerKind::Log];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Event => "event",
            TriggerKind::Control => "control",
            TriggerKind::Log => "log",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a control policy. `value` is a JSON string or number, kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlAction {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ControlAction {
    /// `action` or `action=value`, with string values unquoted.
    pub fn describe(&self) -> String {
        match &self.value {
            Some(Value::String(s)) => format!("{}={}", self.action, s),
            Some(v) => format!("{}={}", self.action, v),
            None => self.action.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerLogLevel {
    #[default]
    Info,
    Warn,
    Error,
}

impl TriggerLogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(TriggerLogLevel::Info),
            "warn" => Some(TriggerLogLevel::Warn),
            "error" => Some(TriggerLogLevel::Error),
            _ => None,
        }
    }
}

/// Effect attached to a waypoint, fired once per visit when the agent arrives.
///
/// Serializes back to the same tagged form it is read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Publish a named event, optionally after `delay` seconds.
    Event {
        name: String,
        #[serde(skip_serializing_if = "Value::is_null")]
        payload: Value,
        delay: f64,
    },
    /// Hand a control policy to another controllable in the scene.
    Control {
        target: String,
        policy: Vec<ControlAction>,
    },
    Log {
        message: String,
        level: TriggerLogLevel,
    },
}

impl Trigger {
    /// Factory keyed by the `type` discriminator. Unknown kinds are an error,
    /// never a fallback to some default kind.
    pub fn deserialize(node: &Value) -> DomainResult<Self> {
        if !node.is_object() {
            return Err(SCOPE.error("trigger", "expected an object"));
        }

        let kind_name = SCOPE.required_str(node, "type")?;
        let kind = TriggerKind::parse(kind_name).ok_or_else(|| DomainError::UnknownTriggerKind {
            kind: kind_name.to_string(),
        })?;

        match kind {
            TriggerKind::Event => Self::parse_event(node),
            TriggerKind::Control => Self::parse_control(node),
            TriggerKind::Log => Self::parse_log(node),
        }
    }

    fn parse_event(node: &Value) -> DomainResult<Self> {
        let name = SCOPE.required_str(node, "name")?;
        if name.is_empty() {
            return Err(SCOPE.error("name", "must not be empty"));
        }
        let delay = SCOPE.optional_f64(node, "delay", 0.0)?;
        if delay < 0.0 {
            return Err(SCOPE.error("delay", "must be >= 0"));
        }

        Ok(Trigger::Event {
            name: name.to_string(),
            payload: SCOPE.optional(node, "payload").cloned().unwrap_or(Value::Null),
            delay,
        })
    }

    fn parse_control(node: &Value) -> DomainResult<Self> {
        let target = SCOPE.required_str(node, "target")?;
        let entries = SCOPE
            .required(node, "policy")?
            .as_array()
            .ok_or_else(|| SCOPE.error("policy", "expected an array"))?;
        if entries.is_empty() {
            return Err(SCOPE.error("policy", "must contain at least one action"));
        }

        let mut policy = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let action = entry
                .get("action")
                .and_then(Value::as_str)
                .ok_or_else(|| SCOPE.error(&format!("policy[{}].action", i), "expected a string"))?;
            let value = match entry.get("value") {
                None | Some(Value::Null) => None,
                Some(v @ (Value::String(_) | Value::Number(_))) => Some(v.clone()),
                Some(_) => {
                    return Err(SCOPE.error(
                        &format!("policy[{}].value", i),
                        "expected a string or number",
                    ))
                }
            };
            policy.push(ControlAction {
                action: action.to_string(),
                value,
            });
        }

        Ok(Trigger::Control {
            target: target.to_string(),
            policy,
        })
    }

    fn parse_log(node: &Value) -> DomainResult<Self> {
        let message = SCOPE.required_str(node, "message")?;
        let level = match SCOPE.optional_str(node, "level")? {
            None => TriggerLogLevel::default(),
            Some(s) => TriggerLogLevel::parse(s)
                .ok_or_else(|| SCOPE.error("level", format!("unsupported level '{}'", s)))?,
        };

        Ok(Trigger::Log {
            message: message.to_string(),
            level,
        })
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::Event { .. } => TriggerKind::Event,
            Trigger::Control { .. } => TriggerKind::Control,
            Trigger::Log { .. } => TriggerKind::Log,
        }
    }

    pub fn to_json(&self) -> Value {
        // Every variant is a plain struct of strings, numbers and JSON values.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn effect(&self, ctx: &TriggerContext<'_>) -> TriggerEffect {
        let agent_id = ctx.agent_id.to_string();
        let waypoint_index = ctx.waypoint_index;
        match self {
            Trigger::Event { name, payload, delay } => TriggerEffect::Event {
                agent_id,
                waypoint_index,
                name: name.clone(),
                payload: payload.clone(),
                delay: *delay,
            },
            Trigger::Control { target, policy } => TriggerEffect::Control {
                agent_id,
                waypoint_index,
                target: target.clone(),
                policy: policy.clone(),
            },
            Trigger::Log { message, level } => TriggerEffect::Log {
                agent_id,
                waypoint_index,
                level: *level,
                message: message.clone(),
            },
        }
    }

    /// Hands the effect to the sink and returns immediately. Sinks that need
    /// to wait or do I/O must detach that work themselves.
    pub fn fire(&self, ctx: &TriggerContext<'_>, sink: &dyn TriggerEffectSink) -> Result<(), EffectError> {
        sink.dispatch(self.effect(ctx))
    }
}
