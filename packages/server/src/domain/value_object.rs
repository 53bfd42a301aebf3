//! Value objects for the push server domain.

use thiserror::Error;
use uuid::Uuid;

/// Validation errors for value object construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Client ID is empty or whitespace-only
    #[error("client id must not be empty")]
    EmptyClientId,

    /// Client ID exceeds the maximum length
    #[error("client id must be at most {max} characters (got {actual})")]
    ClientIdTooLong { max: usize, actual: usize },
}

/// Maximum accepted length for a client-supplied id.
const CLIENT_ID_MAX_LEN: usize = 64;

/// Identifier of one open connection.
///
/// Clients may name themselves via the `client_id` query parameter; clients
/// that do not are assigned a generated id by [`ClientIdFactory`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId {
    value: String,
}

impl ClientId {
    /// Create a new ClientId, validating the raw string
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyClientId);
        }
        if value.len() > CLIENT_ID_MAX_LEN {
            return Err(ValidationError::ClientIdTooLong {
                max: CLIENT_ID_MAX_LEN,
                actual: value.len(),
            });
        }
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Factory for server-assigned client ids (UUID v4)
pub struct ClientIdFactory;

impl ClientIdFactory {
    /// Generate a fresh, unique client id
    pub fn generate() -> ClientId {
        // A UUID string is always non-empty and within the length limit.
        ClientId {
            value: Uuid::new_v4().to_string(),
        }
    }
}

/// Unix timestamp in UTC (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
