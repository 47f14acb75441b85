use crate::domains::agent::{AgentHandle, AgentRegistry, SimAgent};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Process-wide agent table owned by the agent lifecycle (spawn/despawn).
/// The simulation core only reads it through [`AgentRegistry`].
#[derive(Default)]
pub struct InMemoryAgentRegistry {
    agents: RwLock<HashMap<String, AgentHandle>>,
}

impl InMemoryAgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the agent, replacing any previous agent with the same uid.
    pub fn spawn(&self, agent: SimAgent) -> AgentHandle {
        let uid = agent.uid.clone();
        let handle = agent.into_handle();
        self.agents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uid, handle.clone());
        handle
    }

    pub fn despawn(&self, uid: &str) -> Option<AgentHandle> {
        self.agents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uid)
    }

    pub fn len(&self) -> usize {
        self.agents.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AgentRegistry for InMemoryAgentRegistry {
    fn lookup(&self, uid: &str) -> Option<AgentHandle> {
        self.agents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uid)
            .cloned()
    }
}
