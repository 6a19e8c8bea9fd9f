//! WebSocket handler for a room's engine.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/{roomName}`
//! 2. Server subscribes to the room's table and forwards every changed
//!    snapshot as a text frame, starting with the current one
//! 3. Text frames from the client are engine commands:
//!    `{"engineCommand":"bet","seatId":-1,"user":"alice","chips":40}`
//! 4. `stopEngine` stops the room's engine and ends the connection
//!
//! Commands that can't be understood are answered with
//! `{"type":"error","message":"..."}` and never reach the engine.

use axum::{
    Extension,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use holdem_engine::{Command, EngineCommand, TableHandle};
use serde::Serialize;
use tokio::sync::mpsc;

use super::{AppState, request_id::RequestId};

/// Stops the room's engine instead of being queued.
pub const STOP_ENGINE_COMMAND: &str = "stopEngine";

/// Frames the server sends that aren't snapshots
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Error { message: String },
}

/// What a client text frame asks for
#[derive(Debug, PartialEq)]
enum ClientMessage {
    StopEngine,
    Command(Command),
}

fn parse_client_message(text: &str) -> Result<ClientMessage, String> {
    let command: EngineCommand =
        serde_json::from_str(text).map_err(|e| format!("Invalid message format: {e}"))?;
    if command.engine_command == STOP_ENGINE_COMMAND {
        return Ok(ClientMessage::StopEngine);
    }
    Command::try_from(command)
        .map(ClientMessage::Command)
        .map_err(|e| e.to_string())
}

/// Upgrade HTTP connection to WebSocket for a room's engine.
///
/// # Response
///
/// On success, upgrades connection to WebSocket protocol (101 Switching Protocols).
/// Returns `404 Not Found` if no engine runs for the room.
pub async fn websocket_handler(
    Path(room_name): Path<String>,
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let Some(table) = state.table_manager.get_table(&room_name).await else {
        return (
            StatusCode::NOT_FOUND,
            format!("No engine running for room {room_name}"),
        )
            .into_response();
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    tracing::info!(request_id = %request_id.as_str(), "WebSocket upgrade for room {}", room_name);
    ws.on_upgrade(move |socket| handle_socket(socket, table, state))
}

async fn send_error(outbound: &mpsc::Sender<Message>, message: String) {
    let frame = ServerMessage::Error { message };
    if let Ok(json) = serde_json::to_string(&frame) {
        let _ = outbound.send(Message::Text(json.into())).await;
    }
}

/// Forwards snapshots and queued frames to the client until either side
/// goes away.
async fn forward_to_client(
    mut sender: SplitSink<WebSocket, Message>,
    mut snapshots: mpsc::Receiver<holdem_engine::TableSnapshot>,
    mut outbound: mpsc::Receiver<Message>,
) {
    loop {
        let message = tokio::select! {
            snapshot = snapshots.recv() => match snapshot {
                Some(snapshot) => match serde_json::to_string(&snapshot) {
                    Ok(json) => Message::Text(json.into()),
                    Err(e) => {
                        tracing::error!("Failed to serialize snapshot: {}", e);
                        continue;
                    }
                },
                // The table stopped
                None => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            },
            Some(message) = outbound.recv() => message,
        };

        if sender.send(message).await.is_err() {
            break;
        }
    }
}

async fn handle_socket(socket: WebSocket, table: TableHandle, state: AppState) {
    let room_name = table.room_name().to_string();
    let (sender, mut receiver) = socket.split();

    let snapshots = match table.subscribe().await {
        Ok(snapshots) => snapshots,
        Err(e) => {
            tracing::warn!("Room {} closed before subscribing: {}", room_name, e);
            return;
        }
    };

    let (outbound_tx, outbound_rx) = mpsc::channel::<Message>(32);
    let send_task = tokio::spawn(forward_to_client(sender, snapshots, outbound_rx));

    tracing::info!("WebSocket connected: room={}", room_name);

    while let Some(msg) = receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket error in room {}: {}", room_name, e);
                break;
            }
        };

        match parse_client_message(text.as_str()) {
            Ok(ClientMessage::StopEngine) => {
                tracing::info!("Stopping engine for room {} on client request", room_name);
                if let Err(e) = state.table_manager.close_table(&room_name).await {
                    tracing::warn!("Failed to stop room {}: {}", room_name, e);
                }
                break;
            }
            Ok(ClientMessage::Command(command)) => {
                if table.queue_command(command).await.is_err() {
                    break;
                }
            }
            Err(message) => {
                tracing::debug!("Rejected frame in room {}: {}", room_name, message);
                send_error(&outbound_tx, message).await;
            }
        }
    }

    send_task.abort();
    tracing::info!("WebSocket disconnected: room={}", room_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_engine::CommandKind;

    #[test]
    fn test_parse_command() {
        let parsed =
            parse_client_message(r#"{"engineCommand":"bet","user":"alice","chips":40}"#).unwrap();
        assert_eq!(
            parsed,
            ClientMessage::Command(Command::new("alice", CommandKind::Bet(40)))
        );
    }

    #[test]
    fn test_parse_stop_engine() {
        let parsed = parse_client_message(r#"{"engineCommand":"stopEngine"}"#).unwrap();
        assert_eq!(parsed, ClientMessage::StopEngine);
    }

    #[test]
    fn test_parse_rejects_bad_frames() {
        let err = parse_client_message("not json").unwrap_err();
        assert!(err.starts_with("Invalid message format"));

        let err = parse_client_message(r#"{"engineCommand":"shove","user":"bob"}"#).unwrap_err();
        assert!(err.contains("shove"));
    }

    #[test]
    fn test_error_frame_shape() {
        let json = serde_json::to_value(ServerMessage::Error {
            message: "nope".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "error", "message": "nope"}));
    }
}
