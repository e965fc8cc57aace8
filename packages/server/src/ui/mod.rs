//! UI layer: HTTP routes and the per-connection WebSocket loop.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, build_router};
pub use state::AppState;
