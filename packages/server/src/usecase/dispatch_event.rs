//! UseCase: クライアントイベントの応答処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DispatchEventUseCase::execute() メソッド
//! - イベントごとの ACK 生成と、送信元だけへのユニキャスト送信
//!
//! ### なぜこのテストが必要か
//! - ACK が「送信元のみ」に届くことはブロードキャストと混同しやすい
//! - ACK のタイムスタンプがサーバー時計から採られることを保証
//! - 欠損フィールドの既定値が ACK に正しく反映されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：toggle_button / datetime_change の ACK
//! - 異常系：送信先チャンネルが既に閉じている場合

use std::sync::Arc;

use kodou_shared::time::Clock;

use crate::domain::{ClientEvent, ClientId, MessagePushError, MessagePusher};
use crate::infrastructure::dto::websocket::{ButtonAckMessage, DatetimeAckMessage, MessageType};

/// クライアントイベント応答のユースケース
pub struct DispatchEventUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    pusher: Arc<dyn MessagePusher>,
    /// サーバー時刻の供給源
    clock: Arc<dyn Clock>,
}

impl DispatchEventUseCase {
    /// 新しい DispatchEventUseCase を作成
    pub fn new(pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self { pusher, clock }
    }

    /// イベントを処理し、送信元の接続だけに ACK を返す
    ///
    /// # Arguments
    ///
    /// * `origin` - イベントを受信した接続の ID（ACK の宛先）
    /// * `event` - 正規化済みのクライアントイベント
    pub async fn execute(
        &self,
        origin: &ClientId,
        event: ClientEvent,
    ) -> Result<(), MessagePushError> {
        let timestamp = self.clock.now_millis();

        let ack = match event {
            ClientEvent::ToggleButton {
                button_state,
                client_id,
            } => {
                tracing::info!("Button toggled by client '{}': {}", client_id, button_state);
                serde_json::to_string(&ButtonAckMessage {
                    r#type: MessageType::ButtonAck,
                    received: true,
                    state: button_state,
                    timestamp,
                })
                .unwrap()
            }
            ClientEvent::DatetimeChange {
                datetime_value,
                client_id,
                input_type,
            } => {
                tracing::info!(
                    "Client '{}' changed {}: {}",
                    client_id,
                    input_type,
                    datetime_value
                );
                serde_json::to_string(&DatetimeAckMessage {
                    r#type: MessageType::DatetimeAck,
                    received: true,
                    value: datetime_value,
                    input_type,
                    timestamp,
                })
                .unwrap()
            }
        };

        self.pusher.push_to(origin, &ack).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMessagePusher;
    use kodou_shared::time::FixedClock;
    use mockall::predicate;

    fn client_id(raw: &str) -> ClientId {
        ClientId::new(raw.to_string()).unwrap()
    }

    fn create_test_usecase(pusher: MockMessagePusher) -> DispatchEventUseCase {
        DispatchEventUseCase::new(Arc::new(pusher), Arc::new(FixedClock::new(1700000000000)))
    }

    #[tokio::test]
    async fn test_toggle_button_acks_to_originator_only() {
        // テスト項目: toggle_button の ACK が送信元だけに 1 回届く
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .with(
                predicate::eq(client_id("alice")),
                predicate::function(|content: &str| {
                    let ack: ButtonAckMessage = serde_json::from_str(content).unwrap();
                    ack.r#type == MessageType::ButtonAck
                        && ack.received
                        && ack.state
                        && ack.timestamp == 1700000000000
                }),
            )
            .times(1)
            .returning(|_, _| Ok(()));
        // broadcast_all は一切呼ばれない
        pusher.expect_broadcast_all().times(0);
        let usecase = create_test_usecase(pusher);

        // when (操作):
        let result = usecase
            .execute(
                &client_id("alice"),
                ClientEvent::ToggleButton {
                    button_state: true,
                    client_id: "alice".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_datetime_change_ack_echoes_normalized_fields() {
        // テスト項目: datetime_change の ACK が正規化済みフィールドを反映する
        // given (前提条件): inputType 欠損は正規化層で "datetime" になっている
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .with(
                predicate::eq(client_id("bob")),
                predicate::function(|content: &str| {
                    let ack: DatetimeAckMessage = serde_json::from_str(content).unwrap();
                    ack.r#type == MessageType::DatetimeAck
                        && ack.received
                        && ack.value == "2025-01-01T00:00"
                        && ack.input_type == "datetime"
                        && ack.timestamp == 1700000000000
                }),
            )
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = create_test_usecase(pusher);

        // when (操作):
        let result = usecase
            .execute(
                &client_id("bob"),
                ClientEvent::DatetimeChange {
                    datetime_value: "2025-01-01T00:00".to_string(),
                    client_id: "Unknown".to_string(),
                    input_type: "datetime".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_push_failure_is_reported_to_caller() {
        // テスト項目: 送信失敗はエラーとして呼び出し元に返る
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .times(1)
            .returning(|_, _| Err(MessagePushError::PushFailed("channel closed".to_string())));
        let usecase = create_test_usecase(pusher);

        // when (操作):
        let result = usecase
            .execute(
                &client_id("alice"),
                ClientEvent::ToggleButton {
                    button_state: false,
                    client_id: "Unknown".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_err());
    }
}
