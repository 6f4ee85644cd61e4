//! Response cache library
//!
//! This library memoizes generated responses per (agent, prompt) with a
//! bounded TTL store and a permanent prewarm registry, routes uncached
//! requests to a model profile, and wraps both in a get-or-generate service.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use crate::core::{CacheEngine, ModelRouter, cache_key, default_models, seed_default_prewarm};
pub use error::{CacheError, CacheResult};
pub use services::*;
pub use traits::*;
pub use types::*;
