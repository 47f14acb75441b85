use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid path{}: {reason}", .index.map(|i| format!(" at waypoint {}", i)).unwrap_or_default())]
    InvalidPath { index: Option<usize>, reason: String },

    #[error("Unknown trigger kind '{kind}'")]
    UnknownTriggerKind { kind: String },

    #[error("Malformed trigger field '{field}': {reason}")]
    TriggerParse { field: String, reason: String },

    #[error("Malformed waypoint field '{field}': {reason}")]
    MalformedField { field: String, reason: String },
}

impl DomainError {
    pub fn trigger_field(field: &str, reason: impl Into<String>) -> Self {
        DomainError::TriggerParse {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn waypoint_field(field: &str, reason: impl Into<String>) -> Self {
        DomainError::MalformedField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures reported back to the caller of an inbound command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Malformed request: missing or invalid '{field}'")]
    MalformedRequest { field: String },

    #[error("Unknown command '{name}'")]
    UnknownCommand { name: String },

    #[error("Waypoint list is empty")]
    EmptyWaypointList,

    #[error("Agent '{uid}' not found")]
    AgentNotFound { uid: String },

    #[error("Agent '{uid}' does not support waypoint following")]
    WrongAgentKind { uid: String },

    #[error("Agent '{uid}' is unavailable")]
    AgentUnavailable { uid: String },

    /// Per-index form of [`CommandError::InvalidPath`]: waypoint `index` could not be
    /// parsed or validated (including its trigger). Use [`CommandError::is_invalid_path`]
    /// to treat both variants alike.
    #[error("Invalid waypoint {index}: {source}")]
    InvalidWaypoint {
        index: usize,
        #[source]
        source: DomainError,
    },

    /// Path-level failure, e.g. a zero-speed waypoint under the reject policy.
    #[error("Invalid waypoint list: {0}")]
    InvalidPath(#[from] DomainError),
}

impl CommandError {
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, CommandError::InvalidWaypoint { .. } | CommandError::InvalidPath(_))
    }

    /// Index of the first offending waypoint, when the failure is tied to one.
    pub fn waypoint_index(&self) -> Option<usize> {
        match self {
            CommandError::InvalidWaypoint { index, .. } => Some(*index),
            CommandError::InvalidPath(DomainError::InvalidPath { index, .. }) => *index,
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type CommandResult<T> = Result<T, CommandError>;
