//! Relay bookkeeping events addressed to `"hub"`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SharedResult;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HubEvent {
    /// Sent by every instance right after its connection opens
    Register {
        #[serde(rename = "appId")]
        app_id: String,
    },
}

impl HubEvent {
    pub fn from_payload(payload: &Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }

    pub fn to_payload(&self) -> SharedResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
