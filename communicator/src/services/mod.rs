//! Bus services built on the `Connector` seam

pub mod collab;
pub mod communicator;
pub mod session;
pub mod shared_state;
pub mod websocket_connector;

#[cfg(test)]
pub mod tests;

pub use collab::*;
pub use communicator::*;
pub use session::*;
pub use shared_state::*;
pub use websocket_connector::*;
