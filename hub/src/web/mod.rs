//! HTTP and WebSocket surface of the hub

pub mod handlers;
