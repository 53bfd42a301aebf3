//! Server execution logic.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::infrastructure::hub::WebSocketConnectionHub;
use crate::usecase::{
    BroadcastLoop, ConnectClientUseCase, DisconnectClientUseCase, DispatchEventUseCase,
    GetServerStatusUseCase,
};

use super::{
    handler::{
        http::{health, index},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Grace period for draining connections on shutdown
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// kodou push server
///
/// This struct encapsulates the server wiring and provides a method to run
/// the server until a termination signal arrives.
pub struct Server {
    /// ConnectClientUseCase（接続受付のユースケース）
    connect_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（切断処理のユースケース）
    disconnect_usecase: Arc<DisconnectClientUseCase>,
    /// DispatchEventUseCase（イベント応答のユースケース）
    dispatch_event_usecase: Arc<DispatchEventUseCase>,
    /// GetServerStatusUseCase（状態取得のユースケース）
    status_usecase: Arc<GetServerStatusUseCase>,
    /// 周期ブロードキャストループ（シャットダウン時に停止する）
    broadcast: Arc<BroadcastLoop>,
    /// 接続ハブ（シャットダウン時に全接続を閉じる）
    hub: Arc<WebSocketConnectionHub>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_usecase: Arc<ConnectClientUseCase>,
        disconnect_usecase: Arc<DisconnectClientUseCase>,
        dispatch_event_usecase: Arc<DispatchEventUseCase>,
        status_usecase: Arc<GetServerStatusUseCase>,
        broadcast: Arc<BroadcastLoop>,
        hub: Arc<WebSocketConnectionHub>,
    ) -> Self {
        Self {
            connect_usecase,
            disconnect_usecase,
            dispatch_event_usecase,
            status_usecase,
            broadcast,
            hub,
        }
    }

    /// Run the push server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_usecase: self.connect_usecase,
            disconnect_usecase: self.disconnect_usecase,
            dispatch_event_usecase: self.dispatch_event_usecase,
            status_usecase: self.status_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(index))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("kodou push server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // On the shutdown signal, stop the broadcast loop and drop every
        // connection so the open WebSocket tasks can finish; overrunning the
        // grace period is surfaced, not swallowed.
        let broadcast = self.broadcast;
        let hub = self.hub;
        let shutdown = async move {
            shutdown_signal().await;
            let cleanup = async {
                broadcast.shutdown().await;
                hub.disconnect_all().await;
            };
            if tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, cleanup)
                .await
                .is_err()
            {
                tracing::error!(
                    "Shutdown overran the {}s grace period, forcing termination of outstanding connections",
                    SHUTDOWN_GRACE_PERIOD.as_secs()
                );
            }
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
