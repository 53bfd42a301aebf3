//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ClientEvent, ClientId, ClientIdFactory},
    infrastructure::dto::websocket::ClientEventDto,
    ui::state::AppState,
    usecase::ConnectError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Optional client-chosen id; a UUID is assigned when absent
    pub client_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert the query parameter into a ClientId, or assign one
    let client_id = match query.client_id {
        Some(raw) => match ClientId::new(raw.clone()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Invalid client_id '{}': {}", raw, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => ClientIdFactory::generate(),
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the connection; this queues the welcome frame and starts the
    // broadcast loop when this is the first client.
    match state.connect_usecase.execute(client_id.clone(), tx).await {
        Ok(_connected_at) => {
            tracing::info!("Client '{}' connected and registered", client_id.as_str());
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, rx)))
        }
        Err(ConnectError::DuplicateClientId(_)) => {
            tracing::warn!(
                "Client with ID '{}' is already connected. Rejecting connection.",
                client_id.as_str()
            );
            Err(StatusCode::CONFLICT)
        }
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This is the only path server-to-client messages travel: the welcome
/// frame, periodic broadcasts, and acknowledgments are all queued on the
/// channel and delivered here in order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: ClientId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let client_id_clone = client_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text: {}", text);

                    // Parse the incoming event; unrecognized or malformed
                    // payloads are logged and dropped, never fatal.
                    let event: ClientEvent = match serde_json::from_str::<ClientEventDto>(&text) {
                        Ok(dto) => dto.into(),
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring unrecognized message from '{}': {}",
                                client_id_clone.as_str(),
                                e
                            );
                            continue;
                        }
                    };

                    if let Err(e) = state_clone
                        .dispatch_event_usecase
                        .execute(&client_id_clone, event)
                        .await
                    {
                        tracing::warn!(
                            "Failed to acknowledge event from '{}': {}",
                            client_id_clone.as_str(),
                            e
                        );
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to deliver queued server-to-client messages
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Unregister and stop the broadcast loop if this was the last client
    state.disconnect_usecase.execute(&client_id).await;
    tracing::info!(
        "Client '{}' disconnected and removed from registry",
        client_id.as_str()
    );
}
