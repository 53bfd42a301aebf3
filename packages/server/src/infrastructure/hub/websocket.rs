//! WebSocket connection hub.
//!
//! ## 責務
//!
//! - 接続中クライアントの `UnboundedSender` を単一のマップで管理
//! - クライアントへのメッセージ送信（push_to, broadcast_all）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、登録・送信に使用します。
//!
//! 接続の「登録簿」と「送信路」は同じマップなので、両方の trait を
//! 一つの型で実装します。マップのサイズが常に接続中クライアント数と
//! 一致することがこの型の不変条件です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientConnection, ClientId, ConnectionRegistry, MessagePushError, MessagePusher,
};

/// WebSocket-backed connection hub.
///
/// Holds the one shared map of open connections, guarded by a single mutex.
/// All mutation goes through the [`ConnectionRegistry`] operations; fan-out
/// reads a snapshot so that clients closing mid-broadcast cannot disturb the
/// iteration.
pub struct WebSocketConnectionHub {
    /// Connected clients and their outbound channels
    clients: Mutex<HashMap<ClientId, ClientConnection>>,
}

impl WebSocketConnectionHub {
    /// Create a new, empty hub
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every registered connection.
    ///
    /// Used during shutdown: removing an entry drops its sender, which closes
    /// the client's outbound channel and lets its socket task finish.
    pub async fn disconnect_all(&self) {
        let mut clients = self.clients.lock().await;
        let dropped = clients.len();
        clients.clear();
        tracing::info!(dropped, "Disconnected all clients");
    }
}

impl Default for WebSocketConnectionHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionHub {
    async fn register(&self, client_id: ClientId, conn: ClientConnection) -> bool {
        let mut clients = self.clients.lock().await;
        if clients.contains_key(&client_id) {
            return false;
        }
        clients.insert(client_id.clone(), conn);
        tracing::debug!(client_id = client_id.as_str(), "Client registered to hub");
        true
    }

    async fn unregister(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(client_id).is_some() {
            tracing::debug!(
                client_id = client_id.as_str(),
                "Client unregistered from hub"
            );
        }
    }

    async fn count(&self) -> usize {
        let clients = self.clients.lock().await;
        clients.len()
    }

    async fn client_ids(&self) -> Vec<ClientId> {
        let clients = self.clients.lock().await;
        clients.keys().cloned().collect()
    }
}

#[async_trait]
impl MessagePusher for WebSocketConnectionHub {
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(conn) = clients.get(client_id) {
            conn.sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!(client_id = client_id.as_str(), "Pushed message to client");
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                client_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast_all(&self, content: &str) -> usize {
        // Stable snapshot: senders are cloned under the lock, the sends
        // happen outside it.
        let targets: Vec<(ClientId, crate::domain::PusherChannel)> = {
            let clients = self.clients.lock().await;
            clients
                .iter()
                .map(|(id, conn)| (id.clone(), conn.sender.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (client_id, sender) in targets {
            // 一部の送信失敗を許容（切断通知は別経路で処理される）
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!(
                    client_id = client_id.as_str(),
                    error = %e,
                    "Failed to push broadcast to client"
                );
            } else {
                delivered += 1;
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketConnectionHub の登録・解除・カウントの整合性
    // - push_to: 特定のクライアントへの送信
    // - broadcast_all: 全クライアントへの送信と部分失敗の隔離
    //
    // 【なぜこのテストが必要か】
    // - ハブは接続数とブロードキャスト状態遷移の唯一の情報源
    // - マップサイズ == 接続中クライアント数の不変条件を保証する必要がある
    // - 切断途中のクライアントがブロードキャストを壊さないことを検証する
    //
    // 【どのようなシナリオをテストするか】
    // 1. 登録・解除とカウントの整合性（冪等性を含む）
    // 2. push_to の成功・失敗ケース
    // 3. broadcast_all の成功ケースと部分失敗ケース
    // ========================================

    fn test_conn() -> (ClientConnection, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ClientConnection {
                sender: tx,
                connected_at: Timestamp::new(1000),
            },
            rx,
        )
    }

    fn client_id(raw: &str) -> ClientId {
        ClientId::new(raw.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_count() {
        // テスト項目: 登録するとカウントが増える
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        assert_eq!(hub.count().await, 0);

        // when (操作):
        let (conn, _rx) = test_conn();
        let added = hub.register(client_id("alice"), conn).await;

        // then (期待する結果):
        assert!(added);
        assert_eq!(hub.count().await, 1);
    }

    #[tokio::test]
    async fn test_register_same_id_is_a_noop() {
        // テスト項目: 登録済み ID の再登録は no-op で既存接続が残る
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (conn1, mut rx1) = test_conn();
        assert!(hub.register(client_id("alice"), conn1).await);

        // when (操作):
        let (conn2, _rx2) = test_conn();
        let added = hub.register(client_id("alice"), conn2).await;

        // then (期待する結果): カウントは 1 のまま、送信は元の接続に届く
        assert!(!added);
        assert_eq!(hub.count().await, 1);
        hub.push_to(&client_id("alice"), "hello").await.unwrap();
        assert_eq!(rx1.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_removes_client() {
        // テスト項目: 解除するとカウントが減る
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (conn, _rx) = test_conn();
        hub.register(client_id("alice"), conn).await;

        // when (操作):
        hub.unregister(&client_id("alice")).await;

        // then (期待する結果):
        assert_eq!(hub.count().await, 0);
    }

    #[tokio::test]
    async fn test_unregister_absent_client_is_a_noop() {
        // テスト項目: 未登録クライアントの解除は no-op でエラーにならない
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();

        // when (操作):
        hub.unregister(&client_id("ghost")).await;

        // then (期待する結果):
        assert_eq!(hub.count().await, 0);
    }

    #[tokio::test]
    async fn test_client_ids_lists_registered_clients() {
        // テスト項目: client_ids が登録中の全クライアント ID を返す
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (conn1, _rx1) = test_conn();
        let (conn2, _rx2) = test_conn();
        hub.register(client_id("alice"), conn1).await;
        hub.register(client_id("bob"), conn2).await;

        // when (操作):
        let ids = hub.client_ids().await;

        // then (期待する結果):
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&client_id("alice")));
        assert!(ids.contains(&client_id("bob")));
    }

    #[tokio::test]
    async fn test_push_to_unknown_client_fails() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();

        // when (操作):
        let result = hub.push_to(&client_id("ghost"), "hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_client() {
        // テスト項目: 全クライアントにブロードキャストが届く
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (conn1, mut rx1) = test_conn();
        let (conn2, mut rx2) = test_conn();
        hub.register(client_id("alice"), conn1).await;
        hub.register(client_id("bob"), conn2).await;

        // when (操作):
        let delivered = hub.broadcast_all("pulse").await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(rx1.recv().await, Some("pulse".to_string()));
        assert_eq!(rx2.recv().await, Some("pulse".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_all_isolates_dead_connection() {
        // テスト項目: 受信側が消えた接続があっても他への配送は継続する
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (conn1, mut rx1) = test_conn();
        let (conn2, rx2) = test_conn();
        hub.register(client_id("alice"), conn1).await;
        hub.register(client_id("bob"), conn2).await;
        drop(rx2); // bob's socket task is gone

        // when (操作):
        let delivered = hub.broadcast_all("pulse").await;

        // then (期待する結果): alice には届き、bob の失敗は隔離される
        assert_eq!(delivered, 1);
        assert_eq!(rx1.recv().await, Some("pulse".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_all_with_no_clients() {
        // テスト項目: クライアントがいなくてもブロードキャストはエラーにならない
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();

        // when (操作):
        let delivered = hub.broadcast_all("pulse").await;

        // then (期待する結果):
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_disconnect_all_closes_channels() {
        // テスト項目: disconnect_all で全接続のチャンネルが閉じる
        // given (前提条件):
        let hub = WebSocketConnectionHub::new();
        let (conn1, mut rx1) = test_conn();
        let (conn2, mut rx2) = test_conn();
        hub.register(client_id("alice"), conn1).await;
        hub.register(client_id("bob"), conn2).await;

        // when (操作):
        hub.disconnect_all().await;

        // then (期待する結果): レジストリは空になり、受信側はチャンネル閉鎖を観測する
        assert_eq!(hub.count().await, 0);
        assert_eq!(rx1.recv().await, None);
        assert_eq!(rx2.recv().await, None);
    }
}
