//! WebSocket message DTOs.
//!
//! Every message is a single JSON object tagged by a `type` field. Payload
//! fields use the camelCase names the browser client sends.

use serde::{Deserialize, Serialize};

/// Message type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Server -> client periodic value pair (also used for the welcome)
    Message,
    /// Client -> server button toggle
    ToggleButton,
    /// Server -> client button toggle acknowledgment
    ButtonAck,
    /// Client -> server datetime change
    DatetimeChange,
    /// Server -> client datetime change acknowledgment
    DatetimeAck,
}

/// Server -> client broadcast frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseMessage {
    pub r#type: MessageType,
    #[serde(rename = "randomNumber")]
    pub random_number: f64,
    pub boolean: bool,
}

fn default_client_id() -> String {
    "Unknown".to_string()
}

fn default_input_type() -> String {
    "datetime".to_string()
}

/// Client -> server events, tagged by `type`.
///
/// Missing fields default instead of failing: `buttonState` -> `false`,
/// `clientId` -> `"Unknown"`, `inputType` -> `"datetime"`. An unrecognized
/// `type` tag is a deserialization error, which callers log and drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEventDto {
    ToggleButton {
        #[serde(rename = "buttonState", default)]
        button_state: bool,
        #[serde(rename = "clientId", default = "default_client_id")]
        client_id: String,
    },
    DatetimeChange {
        #[serde(rename = "datetimeValue", default)]
        datetime_value: String,
        #[serde(rename = "clientId", default = "default_client_id")]
        client_id: String,
        #[serde(rename = "inputType", default = "default_input_type")]
        input_type: String,
    },
}

/// Server -> client acknowledgment for a button toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonAckMessage {
    pub r#type: MessageType,
    pub received: bool,
    pub state: bool,
    pub timestamp: i64,
}

/// Server -> client acknowledgment for a datetime change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatetimeAckMessage {
    pub r#type: MessageType,
    pub received: bool,
    pub value: String,
    #[serde(rename = "inputType")]
    pub input_type: String,
    pub timestamp: i64,
}
