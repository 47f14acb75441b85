use super::aggregate::AgentHandle;

/// Lookup from external agent identifier to live agent. Spawning and
/// despawning belong to the agent lifecycle owner, not to this port.
pub trait AgentRegistry: Send + Sync {
    fn lookup(&self, uid: &str) -> Option<AgentHandle>;
}

/// Per-tick update scheduling. Registering an agent twice is a no-op.
pub trait UpdateScheduler: Send + Sync {
    fn register_for_updates(&self, uid: &str, agent: AgentHandle);
}
