// Boundary parsing of waypoint definitions from inbound JSON.
use super::types::{Position3D, Waypoint};
use crate::common::{DomainResult, FieldScope};
use crate::domains::trigger::Trigger;
use serde_json::Value;

const SCOPE: FieldScope = FieldScope::Waypoint;

/// Builds a [`Waypoint`] from one element of the `waypoints` array.
///
/// `position` and `speed` are required. `idle` and `trigger_distance` default to 0,
/// and an absent or `null` trigger means no effect on arrival.
pub fn parse_waypoint(node: &Value) -> DomainResult<Waypoint> {
    if !node.is_object() {
        return Err(SCOPE.error("waypoint", "expected an object"));
    }

    let position = parse_position(SCOPE.required(node, "position")?)?;
    let speed = SCOPE.required_f64(node, "speed")?;
    let idle = SCOPE.optional_f64(node, "idle", 0.0)?;
    let trigger_distance = SCOPE.optional_f64(node, "trigger_distance", 0.0)?;
    let trigger = match SCOPE.optional(node, "trigger") {
        Some(t) => Some(Trigger::deserialize(t)?),
        None => None,
    };

    Waypoint::new(position.into(), speed, idle, trigger_distance, trigger)
}

pub fn parse_position(node: &Value) -> DomainResult<Position3D> {
    let axis = |name: &str| {
        node.get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| SCOPE.error(&format!("position.{}", name), "expected a number"))
    };

    Ok(Position3D::new(axis("x")?, axis("y")?, axis("z")?))
}
