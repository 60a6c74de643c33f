//! WebSocket Connection Management - one writer and one listener per socket

use crate::ws::{RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use crate::{
    AppState,
    dtos::{NotificationDTO, WsClientEventDTO, WsEventDTO},
    ws::usermap::InternalSignal,
};
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Duration, interval, timeout};
use tracing::{error, info, instrument, warn};

#[instrument(skip(ws, state), fields(user_id))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user_id: i64) {
    info!("WebSocket connection established");

    let (ws_tx, ws_rx) = ws.split();

    // the write task owns the receiver, everything else pushes through int_tx
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    state.users_online.register_online(user_id, int_tx.clone());

    // greet with the current unread count so the badge is right from the start
    match state.notifications.count_unread(&user_id).await {
        Ok(unread) => {
            let _ = int_tx.send(InternalSignal::Event(WsEventDTO::UnreadCount { unread }));
        }
        Err(e) => warn!("Failed to count unread notifications: {:?}", e),
    }

    tokio::spawn(listen_ws(user_id, ws_rx, int_tx, state));
    tokio::spawn(write_ws(ws_tx, int_rx));
}

#[instrument(skip(websocket_tx, internal_rx))]
pub async fn write_ws(
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<InternalSignal>,
) {
    info!("Write task started");

    while let Some(signal) = internal_rx.recv().await {
        match signal {
            InternalSignal::Shutdown => {
                info!("Shutdown signal received");
                break;
            }
            InternalSignal::Event(event) => {
                if send_event(&mut websocket_tx, &event).await.is_err() {
                    warn!("Failed to send event, closing connection");
                    break;
                }
            }
        }
    }

    let _ = websocket_tx.send(Message::Close(None)).await;
    info!("Write task terminated");
}

async fn send_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &WsEventDTO,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await
}

#[instrument(skip(websocket_rx, internal_tx, state), fields(user_id))]
pub async fn listen_ws(
    user_id: i64,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, websocket_rx.next()).await {
            Ok(Some(msg_result)) => {
                rate_limiter.tick().await;

                let msg = match msg_result {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<WsClientEventDTO>(&text) {
                        Ok(event) => process_client_event(&state, user_id, event, &internal_tx).await,
                        Err(_) => {
                            warn!("Failed to deserialize client event");
                            let _ = internal_tx.send(InternalSignal::Event(WsEventDTO::Error {
                                code: 400,
                                message: "Unknown event".to_string(),
                            }));
                        }
                    },
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(timeout_secs = TIMEOUT_DURATION_SECONDS, "Connection timeout");
                break;
            }
        }
    }

    info!("Cleaning up connection");
    let _ = internal_tx.send(InternalSignal::Shutdown);
    state.users_online.remove_from_online(&user_id, &internal_tx);
    info!("Listen task terminated");
}

/// Applies a client event and answers on the same connection
async fn process_client_event(
    state: &AppState,
    user_id: i64,
    event: WsClientEventDTO,
    internal_tx: &UnboundedSender<InternalSignal>,
) {
    let result = match event {
        WsClientEventDTO::MarkRead { notification_id } => {
            match state.notifications.mark_read(&notification_id, &user_id).await {
                Ok(Some(notification)) => {
                    let _ = internal_tx.send(InternalSignal::Event(WsEventDTO::Notification(
                        NotificationDTO::from(notification),
                    )));
                    Ok(())
                }
                Ok(None) => {
                    let _ = internal_tx.send(InternalSignal::Event(WsEventDTO::Error {
                        code: 404,
                        message: "Notification not found".to_string(),
                    }));
                    return;
                }
                Err(e) => Err(e),
            }
        }
        WsClientEventDTO::MarkAllRead => state
            .notifications
            .mark_all_read(&user_id)
            .await
            .map(|_| ()),
    };

    let unread = match result {
        Ok(()) => state.notifications.count_unread(&user_id).await,
        Err(e) => Err(e),
    };

    let reply = match unread {
        Ok(unread) => WsEventDTO::UnreadCount { unread },
        Err(e) => {
            error!("Failed to apply client event: {:?}", e);
            WsEventDTO::Error {
                code: 500,
                message: "Internal server error".to_string(),
            }
        }
    };
    let _ = internal_tx.send(InternalSignal::Event(reply));
}
