//! Value objects
//!
//! Every value crossing the protocol boundary is wrapped here so that the
//! directory and the use cases only ever see validated data.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use roomcast_shared::time::format_clock_time;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of room names and identities (in characters)
pub const MAX_NAME_CHARS: usize = 64;

/// Maximum length of a shared file's name (in characters)
pub const MAX_FILE_NAME_CHARS: usize = 255;

fn validate_label(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValueObjectError::TooLong { field, max });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValueObjectError::ControlCharacter(field));
    }

    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Transport-level identifier of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Assign a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Room name, the directory key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_label("room", value, MAX_NAME_CHARS).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-supplied display identity, unique only within one room
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_label("identity", value, MAX_NAME_CHARS).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chat message text
///
/// Must contain something other than whitespace; the text itself is relayed
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("message"));
        }
        Ok(Self(value))
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Display name of a shared file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName(String);

impl FileName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_label("fileName", value, MAX_FILE_NAME_CHARS).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Inline-encoded file content (e.g. `data:image/png;base64,...`)
///
/// The payload is opaque to the relay; only its size matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload(String);

impl FilePayload {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("fileData"));
        }
        Ok(Self(value))
    }

    /// Size of the encoded payload in bytes
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Server-observed wall-clock time, rendered `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockTime(String);

impl ClockTime {
    pub fn from_datetime(time: &DateTime<FixedOffset>) -> Self {
        Self(format_clock_time(time))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
