//! Message pusher trait definition.
//!
//! The domain layer defines the interface it needs for pushing messages to
//! connected clients; the infrastructure layer provides the WebSocket-backed
//! implementation.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tokio::sync::mpsc;

use super::ClientId;

/// Channel used to push serialized messages toward one client's socket
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Errors raised when pushing a message to a single client
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// The client is not registered
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// The client's channel rejected the message (connection gone stale)
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Push access to connected clients.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Push `content` to a single client.
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// Push `content` to every registered client.
    ///
    /// Operates on a stable snapshot of the registry; a failed send to one
    /// client is logged and isolated, never propagated. Returns the number
    /// of clients the message was delivered to.
    async fn broadcast_all(&self, content: &str) -> usize;
}
