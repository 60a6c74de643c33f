//! Integration tests for the live notification socket
//!
//! The first tests drive the registry directly through the shared state,
//! the last ones open a real socket against a server bound to a random port.

mod common;

#[cfg(test)]
mod ws_tests {
    use super::common::*;
    use algorithms_server::dtos::WsEventDTO;
    use algorithms_server::entities::NotificationKind;
    use algorithms_server::ws::{InternalSignal, UserMap};
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;

    #[tokio::test]
    async fn test_usermap_duplicate_connection_overwrites() {
        let user_map = UserMap::new();

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        user_map.register_online(1, tx1);
        let (tx2, _rx2) = mpsc::unbounded_channel();
        user_map.register_online(1, tx2);

        assert!(user_map.is_user_online(&1));
        assert_eq!(user_map.online_count(), 1);
        // the replaced connection is told to shut down
        assert!(matches!(rx1.try_recv(), Ok(InternalSignal::Shutdown)));
    }

    #[tokio::test]
    async fn test_follow_pushes_to_online_user() {
        let (server, state, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        state.users_online.register_online(alice.id, tx);

        server
            .post(&format!("/users/{}/follow", alice.id))
            .authorization_bearer(&bob.token)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        match rx.try_recv() {
            Ok(InternalSignal::Event(WsEventDTO::Notification(notification))) => {
                assert_eq!(notification.kind, NotificationKind::Follow);
                assert_eq!(notification.actor_id, Some(bob.id));
                assert!(!notification.is_read);
            }
            _ => panic!("Expected a notification event"),
        }
    }

    #[tokio::test]
    async fn test_offline_user_still_gets_stored_notification() {
        let (server, state, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        assert!(!state.users_online.is_user_online(&alice.id));

        server
            .post(&format!("/users/{}/follow", alice.id))
            .authorization_bearer(&bob.token)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let count = server
            .get("/notifications/unread_count")
            .authorization_bearer(&alice.token)
            .await
            .json::<Value>();
        assert_eq!(count["unread"], 1);
    }

    #[tokio::test]
    async fn test_account_deletion_disconnects() {
        let (server, state, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        state.users_online.register_online(alice.id, tx);

        server
            .delete("/users/me")
            .authorization_bearer(&alice.token)
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        assert!(!state.users_online.is_user_online(&alice.id));
        assert!(matches!(rx.try_recv(), Ok(InternalSignal::Shutdown)));
    }

    // ============================================================
    // Real socket
    // ============================================================

    async fn spawn_server(state: Arc<algorithms_server::AppState>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has an address");
        let app = algorithms_server::create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });
        format!("ws://{}/ws", addr)
    }

    type Socket = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect(url: &str, token: &str) -> Socket {
        let mut request = url.into_client_request().expect("Valid websocket url");
        request.headers_mut().insert(
            "authorization",
            format!("Bearer {}", token).parse().expect("Valid header"),
        );
        let (socket, _) = tokio_tungstenite::connect_async(request)
            .await
            .expect("Failed to connect");
        socket
    }

    /// Next text frame as JSON, skipping control frames
    async fn next_event(socket: &mut Socket) -> Value {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Socket closed")
                .expect("Socket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).expect("Frame is JSON");
            }
        }
    }

    #[tokio::test]
    async fn test_socket_requires_token() {
        let (_, state, _) = setup().await;
        let url = spawn_server(state).await;

        let result = tokio_tungstenite::connect_async(url.as_str()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_socket_push_and_mark_read() {
        let (server, state, _) = setup().await;
        let alice = register_and_login(&server, "alice").await;
        let bob = register_and_login(&server, "bob").await;
        let url = spawn_server(state.clone()).await;

        let mut socket = connect(&url, &alice.token).await;
        let greeting = next_event(&mut socket).await;
        assert_eq!(greeting, json!({ "type": "UnreadCount", "data": { "unread": 0 } }));

        server
            .post(&format!("/users/{}/follow", alice.id))
            .authorization_bearer(&bob.token)
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let pushed = next_event(&mut socket).await;
        assert_eq!(pushed["type"], "Notification");
        assert_eq!(pushed["data"]["kind"], "follow");
        let notification_id = pushed["data"]["notification_id"].as_i64().unwrap();

        socket
            .send(Message::Text(
                json!({ "type": "MarkRead", "data": { "notification_id": notification_id } })
                    .to_string()
                    .into(),
            ))
            .await
            .unwrap();

        let updated = next_event(&mut socket).await;
        assert_eq!(updated["type"], "Notification");
        assert_eq!(updated["data"]["is_read"], true);
        let count = next_event(&mut socket).await;
        assert_eq!(count, json!({ "type": "UnreadCount", "data": { "unread": 0 } }));

        socket
            .send(Message::Text(r#"{"type": "Dance"}"#.into()))
            .await
            .unwrap();
        let error = next_event(&mut socket).await;
        assert_eq!(error["type"], "Error");
        assert_eq!(error["data"]["code"], 400);
    }
}
