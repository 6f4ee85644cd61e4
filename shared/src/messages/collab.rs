//! Agent collaboration payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SharedResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CollabEvent {
    /// Task handed from one agent to another, sent point-to-point
    Handoff { task: String, from: String },

    /// Request for several agents to work on a task, broadcast
    #[serde(rename_all = "camelCase")]
    CollabRequest {
        task: String,
        required_agents: Vec<String>,
        timestamp: i64,
    },
}

impl CollabEvent {
    pub fn from_payload(payload: &Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }

    pub fn to_payload(&self) -> SharedResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
