//! UseCase layer: one struct per protocol operation.

mod binding;
mod broadcast;
mod connect_client;
mod disconnect_client;
mod error;
mod get_rooms;
mod join_room;
mod leave_room;
mod send_message;
mod upload_file;

#[cfg(test)]
pub(crate) mod test_support;

pub use binding::require_binding;
pub use broadcast::{BroadcastRouter, MembershipGuard};
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{
    BindingError, JoinRoomError, LeaveRoomError, SendMessageError, UploadFileError,
};
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use send_message::{SendMessageCommand, SendMessageUseCase};
pub use upload_file::{UploadFileCommand, UploadFileUseCase};
