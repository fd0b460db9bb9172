//! Registry of known agents and their response channels.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::util::serde::Hour;

/// A registered agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Unique agent name.
    pub name: String,
    /// Channel the agent listens on for responses.
    pub response_channel_id: String,
    /// Simulated hour of the latest registration.
    pub registered_at_hour: Hour,
    /// How many times the agent has registered.
    pub registrations: u32,
}

/// Result of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First time this name was seen.
    New,
    /// Known name; the channel was replaced.
    Refreshed {
        /// Channel id before this registration.
        previous_channel: String,
    },
}

/// Agent registry keyed by name.
#[derive(Default)]
pub struct AgentDirectory {
    agents: RwLock<HashMap<String, AgentRecord>>,
}

impl AgentDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` or refresh its channel in place.
    pub fn register(&self, name: &str, channel: &str, hour: Hour) -> Registration {
        let mut agents = self.agents.write();
        if let Some(record) = agents.get_mut(name) {
            let previous_channel = std::mem::replace(&mut record.response_channel_id, channel.to_owned());
            record.registered_at_hour = hour;
            record.registrations = record.registrations.saturating_add(1);
            return Registration::Refreshed { previous_channel };
        }
        agents.insert(
            name.to_owned(),
            AgentRecord {
                name: name.to_owned(),
                response_channel_id: channel.to_owned(),
                registered_at_hour: hour,
                registrations: 1,
            },
        );
        Registration::New
    }

    /// Look up an agent.
    pub fn get(&self, name: &str) -> Option<AgentRecord> {
        self.agents.read().get(name).cloned()
    }

    /// Whether `name` has registered.
    pub fn contains(&self, name: &str) -> bool {
        self.agents.read().contains_key(name)
    }

    /// Number of distinct agents.
    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    /// Whether no agent has registered.
    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }

    /// All agents, sorted by name.
    pub fn agents(&self) -> Vec<AgentRecord> {
        let mut agents: Vec<_> = self.agents.read().values().cloned().collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }
}
