//! Ephemeral group-chat relay.
//!
//! Clients create or join named rooms, exchange text messages and inline file
//! payloads, and receive presence notices when peers join or leave. Nothing
//! outlives the process.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
