//! Ephemeral group-chat relay.
//!
//! Clients connect over WebSocket, join named rooms under a self-chosen
//! identity and exchange messages and inline files. Nothing is persisted.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server
//! cargo run --bin roomcast-server -- --host 0.0.0.0 --port 3001 --max-room-members 50
//! ```

use std::sync::Arc;

use clap::Parser;
use roomcast_server::{
    config::Args,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server},
};
use roomcast_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Clock
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Create Repository (in-memory room directory)
    let repository = Arc::new(InMemoryRoomRepository::with_max_members(
        config.max_room_members,
    ));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create Clock
    let clock = Arc::new(SystemClock::new(config.utc_offset));

    // 4. Create AppState
    let state = Arc::new(AppState::new(repository, message_pusher, clock, &config));

    // 5. Run Server
    let server = Server::new(state, config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
