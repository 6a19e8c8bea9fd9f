//! Engine lifecycle API handlers.
//!
//! One engine runs per room. These endpoints start, list and stop them;
//! play itself happens over the room's WebSocket.
//!
//! # Examples
//!
//! Start an engine:
//! ```bash
//! curl -X POST http://localhost:6969/start-engine \
//!   -H "Content-Type: application/json" \
//!   -d '{"roomName": "main", "smallBlind": 1, "bigBlind": 2}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use holdem_engine::{TableManagerError, TableMetadata, entities::Usd};
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEngineRequest {
    pub room_name: String,
    pub small_blind: Usd,
    pub big_blind: Usd,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(error: TableManagerError) -> ApiError {
    let status = match &error {
        TableManagerError::DuplicateRoom(_) => StatusCode::CONFLICT,
        TableManagerError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        TableManagerError::TableNotFound(_) => StatusCode::NOT_FOUND,
        TableManagerError::TableClosed(_) => StatusCode::GONE,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Start an engine for a room.
///
/// # Response
///
/// Returns `201 Created`:
/// ```json
/// { "message": "Started engine for room main" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Empty room name or invalid blinds
/// - `409 Conflict`: An engine is already running for the room
pub async fn start_engine(
    State(state): State<AppState>,
    Json(request): Json<StartEngineRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let config =
        state
            .defaults
            .table_config(request.room_name, request.small_blind, request.big_blind);

    let table = state
        .table_manager
        .create_table(config)
        .await
        .map_err(|e| {
            tracing::warn!("Refused to start engine: {}", e);
            error_response(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Started engine for room {}", table.room_name()),
        }),
    ))
}

/// List running engines, sorted by room name.
pub async fn list_engines(State(state): State<AppState>) -> Json<Vec<TableMetadata>> {
    Json(state.table_manager.list_tables().await)
}

/// Stop the engine for a room.
///
/// # Errors
///
/// - `404 Not Found`: No engine is running for the room
pub async fn stop_engine(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .table_manager
        .close_table(&room_name)
        .await
        .map_err(error_response)?;

    Ok(Json(MessageResponse {
        message: format!("Stopped engine for room {room_name}"),
    }))
}
