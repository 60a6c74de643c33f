//! WebSocket Event DTOs - frames exchanged with connected clients

use crate::dtos::NotificationDTO;
use serde::{Deserialize, Serialize};

/// Server to client, serialized as
/// { "type": "Notification", "data": { ... } }
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum WsEventDTO {
    Notification(NotificationDTO),
    UnreadCount { unread: i64 },
    Error { code: u16, message: String },
}

/// Client to server, same envelope as [`WsEventDTO`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum WsClientEventDTO {
    MarkRead { notification_id: i64 },
    MarkAllRead,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_use_type_envelope() {
        let event: WsClientEventDTO =
            serde_json::from_str(r#"{"type": "MarkRead", "data": {"notification_id": 4}}"#).unwrap();
        assert_eq!(event, WsClientEventDTO::MarkRead { notification_id: 4 });

        let event: WsClientEventDTO = serde_json::from_str(r#"{"type": "MarkAllRead"}"#).unwrap();
        assert_eq!(event, WsClientEventDTO::MarkAllRead);
    }

    #[test]
    fn unread_count_serializes_with_data() {
        let json = serde_json::to_value(WsEventDTO::UnreadCount { unread: 3 }).unwrap();
        assert_eq!(json["type"], "UnreadCount");
        assert_eq!(json["data"]["unread"], 3);
    }
}
