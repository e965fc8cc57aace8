//! UseCase errors.
//!
//! `Display` output is sent verbatim to the requesting connection as `error_msg`.

use thiserror::Error;

use crate::domain::{JoinError, RoomName};

/// The sender is not allowed to post to the requested room
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("Join a room before sending.")]
    NotInRoom,

    #[error("You are not a member of room '{0}'.")]
    RoomMismatch(RoomName),

    #[error("Author does not match the identity you joined with.")]
    AuthorMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error(transparent)]
    Rejected(#[from] JoinError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("Message is too long (max {max} characters).")]
    MessageTooLong { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadFileError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("File is too large ({size} bytes, max {max} bytes).")]
    PayloadTooLarge { size: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveRoomError {
    #[error("You are not in a room.")]
    NotInRoom,
}
