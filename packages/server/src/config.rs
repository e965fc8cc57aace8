//! Server configuration.
//!
//! Command-line flags fall back to `ROOMCAST_*` environment variables, then to
//! the defaults below. [`Args::into_config`] validates the result.

use axum::http::HeaderValue;
use chrono::{FixedOffset, Offset, Utc};
use clap::Parser;
use roomcast_shared::time::offset_from_hours;
use thiserror::Error;

/// Inline payload cap used when none is configured (10 MB)
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10_000_000;

/// Timestamp offset used when none is configured (UTC+9)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Room for the JSON envelope around an inline file payload
pub const ENVELOPE_ALLOWANCE_BYTES: usize = 64 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(name = "roomcast-server")]
#[command(about = "Ephemeral group-chat relay over WebSocket", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "ROOMCAST_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "ROOMCAST_PORT", default_value_t = 3001)]
    pub port: u16,

    /// Largest accepted inline file payload, in bytes
    #[arg(long, env = "ROOMCAST_MAX_PAYLOAD_BYTES", default_value_t = DEFAULT_MAX_PAYLOAD_BYTES)]
    pub max_payload_bytes: usize,

    /// Longest accepted chat message, in characters
    #[arg(long, env = "ROOMCAST_MAX_MESSAGE_CHARS", default_value_t = 4000)]
    pub max_message_chars: usize,

    /// Per-room member limit (unlimited when omitted)
    #[arg(long, env = "ROOMCAST_MAX_ROOM_MEMBERS")]
    pub max_room_members: Option<usize>,

    /// Allowed cross-origin caller; repeat for several (any origin when omitted)
    #[arg(
        long = "allowed-origin",
        env = "ROOMCAST_ALLOWED_ORIGINS",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,

    /// Offset from UTC used for message timestamps, in hours
    #[arg(
        long,
        env = "ROOMCAST_UTC_OFFSET_HOURS",
        default_value_t = DEFAULT_UTC_OFFSET_HOURS,
        allow_negative_numbers = true
    )]
    pub utc_offset_hours: i32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "ROOMCAST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max payload size must be greater than zero")]
    ZeroPayloadLimit,

    #[error("max message length must be greater than zero")]
    ZeroMessageLimit,

    #[error("UTC offset must be within ±23 hours (got {0})")]
    InvalidUtcOffset(i32),

    #[error("invalid allowed origin '{0}'")]
    InvalidOrigin(String),
}

/// Cross-origin policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_payload_bytes: usize,
    pub max_message_chars: usize,
    pub max_room_members: Option<usize>,
    pub allowed_origins: AllowedOrigins,
    pub utc_offset: FixedOffset,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Largest WebSocket frame accepted by the transport
    pub fn max_frame_bytes(&self) -> usize {
        self.max_payload_bytes.saturating_add(ENVELOPE_ALLOWANCE_BYTES)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_message_chars: 4000,
            max_room_members: None,
            allowed_origins: AllowedOrigins::Any,
            utc_offset: offset_from_hours(DEFAULT_UTC_OFFSET_HOURS).unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl Args {
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::ZeroPayloadLimit);
        }
        if self.max_message_chars == 0 {
            return Err(ConfigError::ZeroMessageLimit);
        }
        let utc_offset = offset_from_hours(self.utc_offset_hours)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_hours))?;

        let origins: Vec<String> = self
            .allowed_origins
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let allowed_origins = if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            AllowedOrigins::Any
        } else {
            let mut values = Vec::with_capacity(origins.len());
            for origin in origins {
                let value = HeaderValue::from_str(&origin)
                    .map_err(|_| ConfigError::InvalidOrigin(origin.clone()))?;
                values.push(value);
            }
            AllowedOrigins::List(values)
        };

        Ok(ServerConfig {
            host: self.host,
            port: self.port,
            max_payload_bytes: self.max_payload_bytes,
            max_message_chars: self.max_message_chars,
            max_room_members: self.max_room_members,
            allowed_origins,
            utc_offset,
        })
    }
}
