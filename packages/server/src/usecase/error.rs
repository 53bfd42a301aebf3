//! UseCase error types.

use thiserror::Error;

/// Errors raised while accepting a connection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectError {
    /// Another live connection already uses this client id
    #[error("client id '{0}' is already connected")]
    DuplicateClientId(String),
}
