//! Client-originated events.

/// A typed event received on a connection.
///
/// Field values are already normalized by the wire layer: missing fields
/// were filled with their documented defaults during deserialization.
/// `client_id` is the label the client reports about itself; it is carried
/// for logging and is not required to match the connection's registered id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The client toggled its button
    ToggleButton {
        button_state: bool,
        client_id: String,
    },
    /// The client changed a datetime input
    DatetimeChange {
        datetime_value: String,
        client_id: String,
        input_type: String,
    },
}
