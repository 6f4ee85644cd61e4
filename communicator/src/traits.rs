//! Trait definitions for dependency injection
//!
//! The transport is the only I/O seam of the bus; everything above it works
//! against `Link` channels so it can be driven in-memory by tests.

use async_trait::async_trait;

use crate::error::BusResult;
use crate::types::Link;

/// Opens persistent connections to the relay
#[mockall::automock]
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to `url`; resolves once the connection is usable
    async fn open(&self, url: &str) -> BusResult<Link>;
}
