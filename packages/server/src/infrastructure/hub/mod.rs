//! Connection hub implementations.
//!
//! This module provides the concrete implementation of the
//! [`crate::domain::ConnectionRegistry`] and [`crate::domain::MessagePusher`]
//! traits.
//!
//! - `websocket`: WebSocket-backed implementation

pub mod websocket;

pub use websocket::WebSocketConnectionHub;
