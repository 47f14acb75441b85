use crate::common::{CommandError, CommandResult};
use crate::domains::agent::{AgentHandle, AgentRegistry, SimAgent, UpdateScheduler};
use crate::domains::logger::DynLogger;
use crate::domains::waypoint::{parse_waypoint, Waypoint, WaypointPath, ZeroSpeedPolicy};
use serde_json::Value;
use std::sync::{Arc, MutexGuard};

/// Validates inbound waypoint commands and installs the resulting path on the
/// target agent. Either the whole path is installed or nothing changes.
pub struct CommandGateway {
    registry: Arc<dyn AgentRegistry>,
    scheduler: Arc<dyn UpdateScheduler>,
    logger: DynLogger,
    zero_speed: ZeroSpeedPolicy,
}

impl CommandGateway {
    pub fn new(
        registry: Arc<dyn AgentRegistry>,
        scheduler: Arc<dyn UpdateScheduler>,
        logger: DynLogger,
        zero_speed: ZeroSpeedPolicy,
    ) -> Self {
        Self {
            registry,
            scheduler,
            logger,
            zero_speed,
        }
    }

    pub fn follow_waypoints(&self, uid: &str, waypoint_specs: &[Value], looping: bool) -> CommandResult<()> {
        let result = self.try_follow_waypoints(uid, waypoint_specs, looping);
        match &result {
            Ok(()) => self.logger.info(&format!(
                "Agent '{}' following {} waypoint(s), loop={}",
                uid,
                waypoint_specs.len(),
                looping
            )),
            Err(e) => self.logger.warn(&format!("follow_waypoints rejected for '{}': {}", uid, e)),
        }
        result
    }

    fn try_follow_waypoints(&self, uid: &str, waypoint_specs: &[Value], looping: bool) -> CommandResult<()> {
        if waypoint_specs.is_empty() {
            return Err(CommandError::EmptyWaypointList);
        }

        let handle = self
            .registry
            .lookup(uid)
            .ok_or_else(|| CommandError::AgentNotFound { uid: uid.to_string() })?;

        if Self::lock(uid, &handle)?.motion_controller().is_none() {
            return Err(CommandError::WrongAgentKind { uid: uid.to_string() });
        }

        let path = self.build_path(waypoint_specs, looping)?;

        {
            let mut agent = Self::lock(uid, &handle)?;
            let motion = agent
                .motion_controller_mut()
                .ok_or_else(|| CommandError::WrongAgentKind { uid: uid.to_string() })?;
            motion.install(path);
        }

        self.scheduler.register_for_updates(uid, handle);
        Ok(())
    }

    fn build_path(&self, waypoint_specs: &[Value], looping: bool) -> CommandResult<WaypointPath> {
        let waypoints = waypoint_specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                parse_waypoint(spec).map_err(|source| CommandError::InvalidWaypoint { index, source })
            })
            .collect::<CommandResult<Vec<Waypoint>>>()?;

        Ok(WaypointPath::new(waypoints, looping, self.zero_speed)?)
    }

    fn lock<'a>(uid: &str, handle: &'a AgentHandle) -> CommandResult<MutexGuard<'a, SimAgent>> {
        handle
            .lock()
            .map_err(|_| CommandError::AgentUnavailable { uid: uid.to_string() })
    }
}
