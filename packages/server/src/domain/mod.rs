//! Domain layer: room membership rules and the seams the use cases depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Binding, Departure, Room, RoomDirectory, RoomSummary};
pub use error::{JoinError, MessagePushError, ValueObjectError};
pub use event::{FileShare, OutboundEvent, PresenceNotice, TextMessage};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use repository::RoomRepository;
pub use value_object::{
    ClockTime, ConnectionId, FileName, FilePayload, Identity, MessageBody, RoomName,
};
