//! Connection registry trait definition.
//!
//! The domain layer defines the interface it needs for tracking open
//! connections; the concrete implementation lives in the infrastructure
//! layer (dependency inversion, as with [`super::MessagePusher`]).

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{ClientId, PusherChannel, Timestamp};

/// One registered connection: the outbound channel plus bookkeeping.
pub struct ClientConnection {
    /// Message sender channel for this client
    pub sender: PusherChannel,
    /// When the connection was accepted
    pub connected_at: Timestamp,
}

/// Registry of currently-open connections.
///
/// Invariant: the registry contains exactly the currently-open connections;
/// entries are added on accept and removed on close. All operations are safe
/// to call concurrently with each other.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a connection under `client_id`.
    ///
    /// Returns `false` without touching the registry when the id is already
    /// present (the existing connection wins), `true` when newly added.
    /// Calling it again for a present id is a no-op, not an error.
    async fn register(&self, client_id: ClientId, conn: ClientConnection) -> bool;

    /// Remove the connection under `client_id`; no-op when absent.
    async fn unregister(&self, client_id: &ClientId);

    /// Number of currently-open connections.
    async fn count(&self) -> usize;

    /// Ids of all currently-open connections.
    async fn client_ids(&self) -> Vec<ClientId>;
}
