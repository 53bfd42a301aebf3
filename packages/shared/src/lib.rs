//! Shared utilities for the kodou push server.
//!
//! Cross-cutting concerns that do not belong to any single layer:
//! clock abstraction and logging setup.

pub mod logger;
pub mod time;
