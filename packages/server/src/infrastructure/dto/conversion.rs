//! Conversion logic between DTOs and domain values.

use crate::domain::ClientEvent;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientEventDto> for ClientEvent {
    fn from(dto: dto::ClientEventDto) -> Self {
        match dto {
            dto::ClientEventDto::ToggleButton {
                button_state,
                client_id,
            } => Self::ToggleButton {
                button_state,
                client_id,
            },
            dto::ClientEventDto::DatetimeChange {
                datetime_value,
                client_id,
                input_type,
            } => Self::DatetimeChange {
                datetime_value,
                client_id,
                input_type,
            },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<ClientEvent> for dto::ClientEventDto {
    fn from(event: ClientEvent) -> Self {
        match event {
            ClientEvent::ToggleButton {
                button_state,
                client_id,
            } => Self::ToggleButton {
                button_state,
                client_id,
            },
            ClientEvent::DatetimeChange {
                datetime_value,
                client_id,
                input_type,
            } => Self::DatetimeChange {
                datetime_value,
                client_id,
                input_type,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_toggle_button_to_domain() {
        // テスト項目: DTO の toggle_button がドメインイベントに変換される
        // given (前提条件):
        let dto_event = dto::ClientEventDto::ToggleButton {
            button_state: true,
            client_id: "alice".to_string(),
        };

        // when (操作):
        let event: ClientEvent = dto_event.into();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::ToggleButton {
                button_state: true,
                client_id: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_dto_datetime_change_to_domain() {
        // テスト項目: DTO の datetime_change がドメインイベントに変換される
        // given (前提条件):
        let dto_event = dto::ClientEventDto::DatetimeChange {
            datetime_value: "2025-01-01T00:00".to_string(),
            client_id: "bob".to_string(),
            input_type: "date".to_string(),
        };

        // when (操作):
        let event: ClientEvent = dto_event.into();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::DatetimeChange {
                datetime_value: "2025-01-01T00:00".to_string(),
                client_id: "bob".to_string(),
                input_type: "date".to_string(),
            }
        );
    }

    #[test]
    fn test_domain_toggle_button_to_dto() {
        // テスト項目: ドメインイベントが DTO に変換される
        // given (前提条件):
        let event = ClientEvent::ToggleButton {
            button_state: false,
            client_id: "carol".to_string(),
        };

        // when (操作):
        let dto_event: dto::ClientEventDto = event.into();

        // then (期待する結果):
        assert_eq!(
            dto_event,
            dto::ClientEventDto::ToggleButton {
                button_state: false,
                client_id: "carol".to_string(),
            }
        );
    }
}
