use crate::application::CommandGateway;
use crate::common::{CommandError, CommandResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const FOLLOW_WAYPOINTS: &str = "agent/follow_waypoints";
pub const PEDESTRIAN_FOLLOW_WAYPOINTS: &str = "pedestrian/follow_waypoints";

/// `{"command": "...", "arguments": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Serialized as `{"result": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandResponse {
    Result(Value),
    Error(String),
}

impl CommandResponse {
    pub fn ok() -> Self {
        CommandResponse::Result(Value::Null)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResponse::Result(_))
    }

    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"unserializable response"}"#.to_string())
    }
}

impl From<CommandResult<()>> for CommandResponse {
    fn from(result: CommandResult<()>) -> Self {
        match result {
            Ok(()) => CommandResponse::ok(),
            Err(e) => CommandResponse::Error(e.to_string()),
        }
    }
}

/// Arguments of a follow-waypoints command. Waypoint entries stay untyped
/// here; the gateway validates them one by one.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowWaypointsRequest {
    pub uid: String,
    pub waypoints: Vec<Value>,
    pub looping: bool,
}

impl FollowWaypointsRequest {
    pub fn from_arguments(args: &Value) -> CommandResult<Self> {
        let malformed = |field: &str| CommandError::MalformedRequest {
            field: field.to_string(),
        };

        let uid = args
            .get("uid")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("uid"))?;
        let waypoints = args
            .get("waypoints")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("waypoints"))?;
        let looping = match args.get("loop") {
            None | Some(Value::Null) => false,
            Some(v) => v.as_bool().ok_or_else(|| malformed("loop"))?,
        };

        Ok(Self {
            uid: uid.to_string(),
            waypoints: waypoints.clone(),
            looping,
        })
    }
}

/// Routes named JSON commands to the gateway and turns every outcome,
/// including unparseable input, into a response.
pub struct CommandDispatcher {
    gateway: Arc<CommandGateway>,
}

impl CommandDispatcher {
    pub fn new(gateway: Arc<CommandGateway>) -> Self {
        Self { gateway }
    }

    /// Entry point for raw input lines; invalid UTF-8 is answered, not fatal.
    pub fn handle_bytes(&self, line: &[u8]) -> CommandResponse {
        match std::str::from_utf8(line) {
            Ok(text) => self.handle_json(text),
            Err(e) => CommandResponse::Error(format!("Malformed command: {}", e)),
        }
    }

    pub fn handle_json(&self, line: &str) -> CommandResponse {
        match serde_json::from_str::<CommandRequest>(line) {
            Ok(request) => self.handle(&request),
            Err(e) => CommandResponse::Error(format!("Malformed command: {}", e)),
        }
    }

    pub fn handle(&self, request: &CommandRequest) -> CommandResponse {
        tracing::debug!(command = %request.command, "dispatching command");
        let result = match request.command.as_str() {
            FOLLOW_WAYPOINTS | PEDESTRIAN_FOLLOW_WAYPOINTS => self.follow_waypoints(&request.arguments),
            other => Err(CommandError::UnknownCommand {
                name: other.to_string(),
            }),
        };
        result.into()
    }

    fn follow_waypoints(&self, args: &Value) -> CommandResult<()> {
        let request = FollowWaypointsRequest::from_arguments(args)?;
        self.gateway
            .follow_waypoints(&request.uid, &request.waypoints, request.looping)
    }
}
