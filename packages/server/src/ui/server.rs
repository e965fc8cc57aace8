//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AllowedOrigins, ServerConfig};

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router
///
/// - `GET /ws`: WebSocket event channel
/// - `GET /api/health`: liveness probe
/// - `GET /api/rooms`: lobby snapshot with member counts
pub fn build_router(state: Arc<AppState>, allowed_origins: &AllowedOrigins) -> Router {
    let allow_origin = match allowed_origins {
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(origins) => AllowOrigin::list(origins.clone()),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Group-chat relay server
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(repository, message_pusher, clock, &config));
/// Server::new(state, config).run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl Server {
    pub fn new(state: Arc<AppState>, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state, &self.config.allowed_origins);

        let bind_addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!(
            "Limits: {} payload bytes, {} message chars, {} members per room",
            self.config.max_payload_bytes,
            self.config.max_message_chars,
            self.config
                .max_room_members
                .map_or_else(|| "unlimited".to_string(), |max| max.to_string())
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
