//! UseCase layer: the operations the UI layer drives.

mod broadcast;
mod connect_client;
mod disconnect_client;
mod dispatch_event;
mod error;
mod status;

pub use broadcast::{BroadcastLoop, DEFAULT_TICK_INTERVAL};
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use dispatch_event::DispatchEventUseCase;
pub use error::ConnectError;
pub use status::{GetServerStatusUseCase, ServerStatus};
