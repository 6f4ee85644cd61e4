//! Agent handoff and collaboration requests over the bus

use chrono::Utc;
use shared::{CollabEvent, MessageType, app_error, app_info};

use crate::services::communicator::Communicator;

/// Thin layer that speaks `CollabEvent` payloads through a `Communicator`
#[derive(Clone)]
pub struct AgentCollab {
    communicator: Communicator,
}

impl AgentCollab {
    pub fn new(communicator: Communicator) -> Self {
        Self { communicator }
    }

    /// Send `task` to each target as a `request` carrying a handoff payload
    pub fn handoff<I, S>(&self, from_agent: &str, task: &str, to_agents: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let event = CollabEvent::Handoff {
            task: task.to_string(),
            from: from_agent.to_string(),
        };
        let Some(payload) = self.encode(&event) else {
            return;
        };

        for agent in to_agents {
            let agent = agent.as_ref();
            app_info!(self.communicator.app_id(), "🤝 Handing off task from {} to {}", from_agent, agent);
            self.communicator.send_to(agent, payload.clone(), MessageType::Request);
        }
    }

    /// Broadcast a request for `required_agents` to work on `task`
    pub fn request_collaboration<I, S>(&self, task: &str, required_agents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let event = CollabEvent::CollabRequest {
            task: task.to_string(),
            required_agents: required_agents.into_iter().map(Into::into).collect(),
            timestamp: Utc::now().timestamp_millis(),
        };
        if let Some(payload) = self.encode(&event) {
            self.communicator.broadcast(payload);
        }
    }

    /// Concatenate per-agent responses in the given order
    pub fn merge_responses<A, R>(responses: &[(A, R)]) -> String
    where
        A: AsRef<str>,
        R: AsRef<str>,
    {
        responses
            .iter()
            .map(|(agent, response)| {
                format!("// ============ From {} ============\n{}", agent.as_ref(), response.as_ref())
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn encode(&self, event: &CollabEvent) -> Option<serde_json::Value> {
        match event.to_payload() {
            Ok(payload) => Some(payload),
            Err(e) => {
                app_error!(self.communicator.app_id(), "❌ Failed to encode collaboration event: {}", e);
                None
            }
        }
    }
}
