//! UseCase: クライアント接続処理
//!
//! 接続受付時のライフサイクル処理をまとめる：
//! 1. レジストリへの登録（重複 ID は拒否）
//! 2. 新規クライアントだけへのウェルカムフレーム送信
//! 3. ブロードキャストループの再調停（最初の 1 人なら起動）
//!
//! ウェルカムはループを起動する前に送信キューへ積む。ループを起動する
//! 接続（最初の 1 人）では周期フレームより必ず先に届く。

use std::sync::Arc;

use kodou_shared::time::Clock;

use crate::domain::{ClientConnection, ClientId, ConnectionRegistry, MessagePusher, PusherChannel, Timestamp};
use crate::infrastructure::dto::websocket::{MessageType, PulseMessage};
use crate::usecase::BroadcastLoop;

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    pusher: Arc<dyn MessagePusher>,
    /// 周期ブロードキャストループ
    broadcast: Arc<BroadcastLoop>,
    /// サーバー時刻の供給源
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        pusher: Arc<dyn MessagePusher>,
        broadcast: Arc<BroadcastLoop>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            broadcast,
            clock,
        }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 接続するクライアントの ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続成功（接続時刻を返す）
    /// * `Err(ConnectError)` - 同じ ID の接続が既に存在する
    pub async fn execute(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let conn = ClientConnection {
            sender,
            connected_at,
        };

        // 1. Register; the registry operation itself is idempotent, a live
        //    duplicate is reported back as a conflict.
        if !self.registry.register(client_id.clone(), conn).await {
            return Err(ConnectError::DuplicateClientId(
                client_id.as_str().to_string(),
            ));
        }

        // 2. Welcome frame for this client only, queued before the loop is
        //    (re)started (current toggle value, fresh random number).
        let frame = self.broadcast.welcome_frame().await;
        let welcome = serde_json::to_string(&PulseMessage {
            r#type: MessageType::Message,
            random_number: frame.random_number,
            boolean: frame.boolean,
        })
        .unwrap();
        if let Err(e) = self.pusher.push_to(&client_id, &welcome).await {
            tracing::warn!(
                client_id = client_id.as_str(),
                error = %e,
                "Failed to push welcome frame"
            );
        }

        // 3. First connection starts the broadcast loop.
        self.broadcast.sync().await;

        Ok(connected_at)
    }
}
