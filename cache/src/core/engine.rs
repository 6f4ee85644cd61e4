//! Bounded TTL cache with a permanent prewarm registry
//!
//! Lookups through `get_for_agent` consult the prewarm registry first and
//! fall back to the TTL store. The TTL store holds at most `max_entries`
//! entries; inserting a new key at capacity evicts the entry with the oldest
//! creation time (linear scan). An entry is expired once its age is strictly
//! greater than the TTL and is removed by the `get` that observes it.

use shared::CacheConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::core::key::cache_key;
use crate::services::clock::SystemClock;
use crate::traits::Clock;
use crate::types::{CacheLookup, CacheStats, CacheValue, PrewarmEntry, ResponseSource};

/// Token count recorded by `set_agent_response`
pub const APPROXIMATE_RESPONSE_TOKENS: u64 = 150;

struct StoredValue {
    value: CacheValue,
    /// Insertion order; breaks ties between equal creation times
    seq: u64,
}

#[derive(Default)]
struct EngineState {
    entries: HashMap<String, StoredValue>,
    prewarm: HashMap<String, PrewarmEntry>,
    next_seq: u64,
}

/// Explicitly owned response cache
pub struct CacheEngine {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
}

impl Default for CacheEngine {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl CacheEngine {
    /// Engine on the system clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn generate_key(&self, agent: &str, prompt: &str) -> String {
        cache_key(agent, prompt, self.config.prompt_key_chars)
    }

    /// TTL lookup; counts a hit, or evicts the entry when it has expired
    pub fn get(&self, agent: &str, prompt: &str) -> Option<String> {
        self.get_entry(agent, prompt).map(|value| value.response)
    }

    fn get_entry(&self, agent: &str, prompt: &str) -> Option<CacheValue> {
        let key = self.generate_key(agent, prompt);
        let now = self.clock.now_ms();
        let mut state = self.state();

        let Some(stored) = state.entries.get_mut(&key) else {
            debug!(agent, "Cache miss");
            return None;
        };

        if now - stored.value.timestamp_created > self.config.ttl_ms {
            state.entries.remove(&key);
            debug!(agent, "Cache entry expired and evicted");
            return None;
        }

        stored.value.hit_count += 1;
        debug!(agent, hits = stored.value.hit_count, "Cache hit");
        Some(stored.value.clone())
    }

    /// Store a response, evicting the oldest entry when a new key arrives at capacity
    pub fn set(&self, agent: &str, prompt: &str, response: &str, tokens: u64) {
        let key = self.generate_key(agent, prompt);
        let now = self.clock.now_ms();
        let mut state = self.state();

        if !state.entries.contains_key(&key) && state.entries.len() >= self.config.max_entries {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, stored)| (stored.value.timestamp_created, stored.seq))
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
                debug!(evicted = %oldest, "Cache at capacity; evicted oldest entry");
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            key,
            StoredValue {
                value: CacheValue {
                    response: response.to_string(),
                    tokens,
                    timestamp_created: now,
                    hit_count: 0,
                },
                seq,
            },
        );
    }

    /// `set` with an approximate token count
    pub fn set_agent_response(&self, agent: &str, prompt: &str, response: &str) {
        self.set(agent, prompt, response, APPROXIMATE_RESPONSE_TOKENS);
    }

    /// Register a permanent response; never expires, never evicted
    pub fn prewarm(&self, agent: &str, prompt: &str, response: &str) {
        let key = self.generate_key(agent, prompt);
        self.state().prewarm.insert(
            key,
            PrewarmEntry {
                response: response.to_string(),
                agent: agent.to_string(),
                prompt: prompt.to_string(),
            },
        );
    }

    pub fn get_prewarmed(&self, agent: &str, prompt: &str) -> Option<String> {
        let key = self.generate_key(agent, prompt);
        self.state().prewarm.get(&key).map(|entry| entry.response.clone())
    }

    /// Prewarm registry first, then the TTL store
    pub fn get_for_agent(&self, agent: &str, prompt: &str) -> Option<String> {
        self.lookup(agent, prompt).map(|hit| hit.response)
    }

    /// `get_for_agent` that also reports where the response came from
    pub fn lookup(&self, agent: &str, prompt: &str) -> Option<CacheLookup> {
        if let Some(response) = self.get_prewarmed(agent, prompt) {
            debug!(agent, "Prewarm hit");
            return Some(CacheLookup {
                response,
                source: ResponseSource::Prewarm,
                tokens: None,
            });
        }

        self.get_entry(agent, prompt).map(|value| CacheLookup {
            response: value.response,
            source: ResponseSource::Cache,
            tokens: Some(value.tokens),
        })
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state();
        let (total_hits, total_tokens_saved) = state
            .entries
            .values()
            .fold((0u64, 0u64), |(hits, saved), stored| {
                (
                    hits.saturating_add(stored.value.hit_count),
                    saved.saturating_add(stored.value.tokens.saturating_mul(stored.value.hit_count)),
                )
            });

        CacheStats {
            size: state.entries.len(),
            total_hits,
            total_tokens_saved,
            prewarm_count: state.prewarm.len(),
        }
    }

    /// Empty the TTL store; the prewarm registry is kept
    pub fn clear(&self) {
        self.state().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
