//! Server state shared by the request handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, DispatchEventUseCase, GetServerStatusUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続受付のユースケース）
    pub connect_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（切断処理のユースケース）
    pub disconnect_usecase: Arc<DisconnectClientUseCase>,
    /// DispatchEventUseCase（イベント応答のユースケース）
    pub dispatch_event_usecase: Arc<DispatchEventUseCase>,
    /// GetServerStatusUseCase（状態取得のユースケース）
    pub status_usecase: Arc<GetServerStatusUseCase>,
}
