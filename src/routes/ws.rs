// WebSocket handler: push each published widget view

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::WidgetView;
use crate::surface::WidgetSurface;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) async fn ws_widget(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let surface = state.surface.clone();
    ws.on_upgrade(move |socket| async move {
        let mut rx = surface.subscribe();
        if let Err(e) = stream_widget(socket, &mut rx, surface).await {
            tracing::info!("Widget stream error: {}", e);
        }
    })
}

/// Sends `view` as a JSON text frame. `Ok(false)` means the client is gone or too slow.
async fn send_view(socket: &mut WebSocket, view: &WidgetView) -> anyhow::Result<bool> {
    let json = serde_json::to_string(view)?;
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}

async fn stream_widget(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<WidgetView>,
    surface: Arc<WidgetSurface>,
) -> anyhow::Result<()> {
    tracing::info!("Client connected to widget stream");

    // Current frame first so the page never waits a full poll interval.
    if !send_view(&mut socket, &surface.view()).await? {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(view) => {
                        if !send_view(&mut socket, &view).await? {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/widget client lagged, skipped {} views", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}
