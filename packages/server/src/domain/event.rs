//! Server → client events.
//!
//! Use cases describe what happened with these values; the message pusher
//! decides how they are encoded on the wire.

use super::value_object::{ClockTime, FileName, FilePayload, Identity, MessageBody, RoomName};

/// Text message relayed to the other members of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub room: RoomName,
    pub author: Identity,
    pub body: MessageBody,
    pub time: ClockTime,
}

/// Inline file relayed to the other members of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileShare {
    pub room: RoomName,
    pub author: Identity,
    pub file_name: FileName,
    pub payload: FilePayload,
    pub time: ClockTime,
}

/// Presence notice shown when someone joins or leaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceNotice {
    pub message: String,
    pub time: ClockTime,
}

impl PresenceNotice {
    pub fn joined(identity: &Identity, time: ClockTime) -> Self {
        Self {
            message: format!("{} joined the room.", identity),
            time,
        }
    }

    pub fn left(identity: &Identity, time: ClockTime) -> Self {
        Self {
            message: format!("{} left the room.", identity),
            time,
        }
    }
}

/// Every event the relay sends to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Full snapshot of room names
    RoomList(Vec<RoomName>),
    /// Join confirmation, to the joining connection only
    JoinedSuccess(RoomName),
    /// Explicit leave confirmation, to the leaving connection only
    LeftSuccess(RoomName),
    /// Non-fatal rejection, to the requesting connection only
    Error(String),
    ReceiveMessage(TextMessage),
    ReceiveFile(FileShare),
    UserJoined(PresenceNotice),
    UserLeft(PresenceNotice),
}

impl OutboundEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomList(_) => "room_list",
            Self::JoinedSuccess(_) => "joined_success",
            Self::LeftSuccess(_) => "left_success",
            Self::Error(_) => "error_msg",
            Self::ReceiveMessage(_) => "receive_message",
            Self::ReceiveFile(_) => "receive_file",
            Self::UserJoined(_) => "user_joined",
            Self::UserLeft(_) => "user_left",
        }
    }
}
