//! HTTP/WebSocket API for the table server.
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health               - Server health status
//! POST   /start-engine         - Start an engine for a room
//! GET    /engines              - List running engines
//! DELETE /engines/{roomName}   - Stop a room's engine
//! GET    /ws/{roomName}        - WebSocket: commands in, snapshots out
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod engines;
pub mod request_id;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{delete, get, post},
};
use holdem_engine::TableManager;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::config::TableDefaults;

/// Application state shared across all HTTP handlers and WebSocket connections.
///
/// Cloned for each request; the table registry behind `TableManager` is
/// shared.
#[derive(Clone)]
pub struct AppState {
    pub table_manager: TableManager,
    /// Settings applied to every table started through the API
    pub defaults: TableDefaults,
}

impl AppState {
    pub fn new(table_manager: TableManager, defaults: TableDefaults) -> Self {
        Self {
            table_manager,
            defaults,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use he_server::{api::{create_router, AppState}, config::TableDefaults};
/// # use holdem_engine::{EngineTiming, TableManager};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let state = AppState::new(TableManager::new(EngineTiming::dev()), TableDefaults::default());
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:6969").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/start-engine", post(engines::start_engine))
        .route("/engines", get(engines::list_engines))
        .route("/engines/{room_name}", delete(engines::stop_engine))
        .route("/ws/{room_name}", get(websocket::websocket_handler))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(request_id::request_id_middleware)),
        )
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","version":"0.1.0","tables":2,"timestamp":"2026-10-16T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "tables": state.table_manager.active_table_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
