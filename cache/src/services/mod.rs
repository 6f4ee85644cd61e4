//! Cache services implementations

pub mod canned_generator;
pub mod clock;
pub mod response_service;

#[cfg(test)]
pub mod tests;

pub use canned_generator::*;
pub use clock::*;
pub use response_service::*;
