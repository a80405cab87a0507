use axum::{
    extract::{
        Extension, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use super::hub::BroadcastHub;

pub async fn handle_subscribe(
    ws: WebSocketUpgrade,
    Extension(hub): Extension<Arc<BroadcastHub>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| subscriber_session(socket, hub))
}

/// Per-client push loop. Forwards every update in publish order; ends when the
/// client disconnects or falls behind the hub buffer.
async fn subscriber_session(mut socket: WebSocket, hub: Arc<BroadcastHub>) {
    let mut rx = hub.subscribe();
    tracing::info!("Subscriber connected ({} total)", hub.subscriber_count());

    loop {
        match rx.recv().await {
            Ok(update) => {
                let text = match serde_json::to_string(&update) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!("Failed to serialize ranking update: {}", e);
                        continue;
                    }
                };

                if socket.send(Message::Text(text)).await.is_err() {
                    // Client went away; the write failure is our disconnect signal
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Dropping slow subscriber ({} updates behind)", skipped);
                let _ = socket
                    .send(Message::Close(None))
                    .await;
                break;
            }
            Err(RecvError::Closed) => break,
        }
    }

    tracing::info!("Subscriber disconnected ({} total)", hub.subscriber_count());
}
