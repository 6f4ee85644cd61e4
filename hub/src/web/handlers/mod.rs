//! Route handlers

pub mod api;
pub mod relay;

pub use api::*;
pub use relay::*;
