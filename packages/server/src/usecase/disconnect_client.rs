//! UseCase: クライアント切断処理
//!
//! 切断通知を受けたらレジストリから外し、ブロードキャストループを
//! 再調停する（最後の 1 人だったら停止する）。

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionRegistry};
use crate::usecase::BroadcastLoop;

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// 周期ブロードキャストループ
    broadcast: Arc<BroadcastLoop>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, broadcast: Arc<BroadcastLoop>) -> Self {
        Self {
            registry,
            broadcast,
        }
    }

    /// 切断を実行
    ///
    /// 登録されていないクライアントの切断は no-op（トランスポート側の
    /// 切断通知が二重に届いてもエラーにしない）。
    pub async fn execute(&self, client_id: &ClientId) {
        self.registry.unregister(client_id).await;
        self.broadcast.sync().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientConnection, Timestamp};
    use crate::infrastructure::hub::WebSocketConnectionHub;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn client_id(raw: &str) -> ClientId {
        ClientId::new(raw.to_string()).unwrap()
    }

    async fn setup_with_clients(
        raw_ids: &[&str],
    ) -> (
        DisconnectClientUseCase,
        Arc<WebSocketConnectionHub>,
        Arc<BroadcastLoop>,
        Vec<mpsc::UnboundedReceiver<String>>,
    ) {
        let hub = Arc::new(WebSocketConnectionHub::new());
        let broadcast = Arc::new(BroadcastLoop::with_period(
            hub.clone(),
            hub.clone(),
            Duration::from_millis(20),
        ));
        let mut receivers = Vec::new();
        for raw in raw_ids {
            let (tx, rx) = mpsc::unbounded_channel();
            hub.register(
                client_id(raw),
                ClientConnection {
                    sender: tx,
                    connected_at: Timestamp::new(0),
                },
            )
            .await;
            receivers.push(rx);
        }
        broadcast.sync().await;
        let usecase = DisconnectClientUseCase::new(hub.clone(), broadcast.clone());
        (usecase, hub, broadcast, receivers)
    }

    #[tokio::test]
    async fn test_disconnect_removes_client_and_keeps_loop_running() {
        // テスト項目: 切断後も他のクライアントがいればループは動き続ける
        // given (前提条件):
        let (usecase, hub, broadcast, _receivers) = setup_with_clients(&["alice", "bob"]).await;
        assert!(broadcast.is_running().await);

        // when (操作):
        usecase.execute(&client_id("alice")).await;

        // then (期待する結果):
        assert_eq!(hub.count().await, 1);
        assert!(broadcast.is_running().await);
    }

    #[tokio::test]
    async fn test_disconnect_last_client_stops_loop() {
        // テスト項目: 最後のクライアント切断でループが停止する
        // given (前提条件):
        let (usecase, hub, broadcast, _receivers) = setup_with_clients(&["alice"]).await;
        assert!(broadcast.is_running().await);

        // when (操作):
        usecase.execute(&client_id("alice")).await;

        // then (期待する結果):
        assert_eq!(hub.count().await, 0);
        assert!(!broadcast.is_running().await);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_client_is_a_noop() {
        // テスト項目: 未登録クライアントの切断は no-op でループに影響しない
        // given (前提条件):
        let (usecase, hub, broadcast, _receivers) = setup_with_clients(&["alice"]).await;

        // when (操作):
        usecase.execute(&client_id("ghost")).await;

        // then (期待する結果):
        assert_eq!(hub.count().await, 1);
        assert!(broadcast.is_running().await);
    }
}
