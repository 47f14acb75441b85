//! Field accessors for weakly-typed JSON payloads.
//!
//! Every accessor names the offending field on failure so the caller can
//! report exactly which part of an inbound request was malformed.

use super::DomainError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScope {
    Waypoint,
    Trigger,
}

impl FieldScope {
    pub fn error(self, field: &str, reason: impl Into<String>) -> DomainError {
        match self {
            FieldScope::Waypoint => DomainError::waypoint_field(field, reason),
            FieldScope::Trigger => DomainError::trigger_field(field, reason),
        }
    }

    /// Absent and explicit `null` are treated the same.
    pub fn optional<'a>(self, node: &'a Value, field: &str) -> Option<&'a Value> {
        node.get(field).filter(|v| !v.is_null())
    }

    pub fn required<'a>(self, node: &'a Value, field: &str) -> Result<&'a Value, DomainError> {
        self.optional(node, field)
            .ok_or_else(|| self.error(field, "field is required"))
    }

    pub fn required_str<'a>(self, node: &'a Value, field: &str) -> Result<&'a str, DomainError> {
        self.required(node, field)?
            .as_str()
            .ok_or_else(|| self.error(field, "expected a string"))
    }

    pub fn optional_str<'a>(
        self,
        node: &'a Value,
        field: &str,
    ) -> Result<Option<&'a str>, DomainError> {
        match self.optional(node, field) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| self.error(field, "expected a string")),
        }
    }

    pub fn required_f64(self, node: &Value, field: &str) -> Result<f64, DomainError> {
        self.required(node, field)?
            .as_f64()
            .ok_or_else(|| self.error(field, "expected a number"))
    }

    pub fn optional_f64(self, node: &Value, field: &str, default: f64) -> Result<f64, DomainError> {
        match self.optional(node, field) {
            None => Ok(default),
            Some(v) => v
                .as_f64()
                .ok_or_else(|| self.error(field, "expected a number")),
        }
    }
}
