//! Shared-state replication events

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SharedResult;

/// Mutation of the replicated key-value map, broadcast to every peer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StateEvent {
    StateUpdate { key: String, value: Value },
    StateDelete { key: String },
    StateClear,
}

impl StateEvent {
    /// Decode a broadcast payload; payloads of other shapes yield `None`
    pub fn from_payload(payload: &Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }

    pub fn to_payload(&self) -> SharedResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
