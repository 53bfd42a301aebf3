//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, response::Html};

use crate::{infrastructure::dto::http::HealthDto, ui::state::AppState};

/// Transport reported by `/health`
const TRANSPORT_MODE: &str = "websocket";

/// Liveness page
pub async fn index() -> Html<&'static str> {
    Html(
        "<h1>kodou push server</h1>\
         <p>Server is running and ready for WebSocket connections.</p>\
         <p>Connect to: <code>/ws</code></p>\
         <p>Transport mode: websocket</p>",
    )
}

/// Health check endpoint
///
/// Reads the registry count and broadcast state without mutating them.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let status = state.status_usecase.execute().await;

    Json(HealthDto {
        status: "running".to_string(),
        clients: status.clients,
        background_thread: status.broadcasting,
        transport_mode: TRANSPORT_MODE.to_string(),
    })
}
