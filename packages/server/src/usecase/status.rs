//! UseCase: サーバー状態の読み取り
//!
//! `/health` エンドポイントが参照する読み取り専用のスナップショット。
//! レジストリとブロードキャスト状態を変更しない。

use std::sync::Arc;

use crate::domain::ConnectionRegistry;
use crate::usecase::BroadcastLoop;

/// Read-only snapshot of the server's live state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    /// Number of currently-open connections
    pub clients: usize,
    /// Whether the periodic broadcast task is active
    pub broadcasting: bool,
}

/// サーバー状態取得のユースケース
pub struct GetServerStatusUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// 周期ブロードキャストループ
    broadcast: Arc<BroadcastLoop>,
}

impl GetServerStatusUseCase {
    /// 新しい GetServerStatusUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, broadcast: Arc<BroadcastLoop>) -> Self {
        Self {
            registry,
            broadcast,
        }
    }

    /// 現在の状態スナップショットを返す
    pub async fn execute(&self) -> ServerStatus {
        ServerStatus {
            clients: self.registry.count().await,
            broadcasting: self.broadcast.is_running().await,
        }
    }
}
