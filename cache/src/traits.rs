//! Trait definitions for dependency injection

use async_trait::async_trait;

use crate::error::CacheResult;
use crate::types::{Generation, GenerationRequest};

/// Wall-clock source for entry ages
#[mockall::automock]
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> i64;
}

/// Produces a response for a cache miss
#[mockall::automock]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> CacheResult<Generation>;
}
