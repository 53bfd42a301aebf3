//! kodou push server library.
//!
//! This library implements a minimal real-time push server: clients attach
//! over WebSocket, a single periodic task broadcasts a generated value pair
//! to all connected clients, and a small set of client-originated events is
//! acknowledged back to the sender.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
