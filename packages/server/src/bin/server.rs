//! kodou push server: periodic value-pair broadcast over WebSocket.
//!
//! While at least one client is connected, a value pair is pushed to every
//! client twice per second; client events are acknowledged back to their
//! sender.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kodou-server
//! cargo run --bin kodou-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use kodou_server::{
    infrastructure::hub::WebSocketConnectionHub,
    ui::Server,
    usecase::{
        BroadcastLoop, ConnectClientUseCase, DisconnectClientUseCase, DispatchEventUseCase,
        GetServerStatusUseCase,
    },
};
use kodou_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kodou-server")]
#[command(about = "Real-time push server broadcasting a value pair over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Broadcast tick interval in milliseconds
    #[arg(long, default_value = "500")]
    tick_interval_ms: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Connection hub (registry + pusher)
    // 2. Broadcast loop
    // 3. Clock
    // 4. UseCases
    // 5. Server

    // 1. Create the connection hub
    let hub = Arc::new(WebSocketConnectionHub::new());

    // 2. Create the broadcast loop
    let broadcast = Arc::new(BroadcastLoop::with_period(
        hub.clone(),
        hub.clone(),
        Duration::from_millis(args.tick_interval_ms),
    ));

    // 3. Create the clock
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let connect_usecase = Arc::new(ConnectClientUseCase::new(
        hub.clone(),
        hub.clone(),
        broadcast.clone(),
        clock.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectClientUseCase::new(
        hub.clone(),
        broadcast.clone(),
    ));
    let dispatch_event_usecase = Arc::new(DispatchEventUseCase::new(hub.clone(), clock));
    let status_usecase = Arc::new(GetServerStatusUseCase::new(hub.clone(), broadcast.clone()));

    // 5. Create and run the server
    let server = Server::new(
        connect_usecase,
        disconnect_usecase,
        dispatch_event_usecase,
        status_usecase,
        broadcast,
        hub,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
