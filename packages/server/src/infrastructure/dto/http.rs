//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    /// Always `"running"` while the process serves requests
    pub status: String,
    /// Number of currently-open connections
    pub clients: usize,
    /// Whether the periodic broadcast task is active
    pub background_thread: bool,
    /// Transport the server pushes over
    #[serde(rename = "transportMode")]
    pub transport_mode: String,
}
