//! Configuration types for the bus and the response cache

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{SharedError, SharedResult};

pub const DEFAULT_HUB_URL: &str = "ws://localhost:8080";
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const DEFAULT_RECONNECT_BASE_DELAY_MS: u64 = 1000;

pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_CACHE_TTL_MS: i64 = 3_600_000;
pub const DEFAULT_PROMPT_KEY_CHARS: usize = 200;

/// Message bus configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BusConfig {
    /// Relay address used by `connect` when no address is given
    pub endpoint: String,
    pub max_reconnect_attempts: u32,
    pub reconnect_base_delay_ms: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HUB_URL.to_string(),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_base_delay_ms: DEFAULT_RECONNECT_BASE_DELAY_MS,
        }
    }
}

impl BusConfig {
    /// Load from the process environment
    ///
    /// Reads:
    /// - APPCONNECT_HUB_URL
    /// - APPCONNECT_MAX_RECONNECT_ATTEMPTS
    /// - APPCONNECT_RECONNECT_DELAY_MS
    pub fn from_env() -> SharedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("APPCONNECT_HUB_URL") {
            config.endpoint = url;
        }
        if let Some(raw) = lookup("APPCONNECT_MAX_RECONNECT_ATTEMPTS") {
            config.max_reconnect_attempts = parse_field("APPCONNECT_MAX_RECONNECT_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("APPCONNECT_RECONNECT_DELAY_MS") {
            config.reconnect_base_delay_ms = parse_field("APPCONNECT_RECONNECT_DELAY_MS", &raw)?;
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn reconnect_base_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_base_delay_ms)
    }
}

/// Response cache configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl_ms: i64,
    /// Prompt characters kept in the derived key after normalisation
    pub prompt_key_chars: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            ttl_ms: DEFAULT_CACHE_TTL_MS,
            prompt_key_chars: DEFAULT_PROMPT_KEY_CHARS,
        }
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, raw: &str) -> SharedResult<T> {
    raw.trim().parse().map_err(|_| SharedError::InvalidConfig {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
