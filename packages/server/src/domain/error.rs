//! Domain error types.

use thiserror::Error;

use super::value_object::RoomName;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Empty (or whitespace-only) input
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Input longer than the allowed number of characters
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Input contains control characters
    #[error("{0} must not contain control characters")]
    ControlCharacter(&'static str),
}

/// Reasons a join is refused by the room directory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The identity already belongs to the target room
    #[error("You have already joined this room.")]
    AlreadyMember,

    /// The connection is bound to a room and must leave it first
    #[error("You are already in room '{0}'. Leave it before joining another room.")]
    AlreadyInRoom(RoomName),

    /// The target room reached its member limit
    #[error("Room is full ({0} members).")]
    RoomFull(usize),
}

/// Message delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No outbound channel registered for the connection
    #[error("Connection '{0}' is not registered")]
    ClientNotFound(String),

    /// The outbound channel is closed
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// The event could not be encoded
    #[error("Failed to encode event: {0}")]
    Encode(String),
}
