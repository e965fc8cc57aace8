//! Sender checks shared by the message and file relays.

use crate::domain::{Binding, ConnectionId, Identity, RoomName, RoomRepository};

use super::error::BindingError;

/// Resolve the sender's binding and check it against the request.
///
/// The request must target the room the connection is bound to. A claimed
/// author, when present, must equal the bound identity.
pub async fn require_binding(
    repository: &dyn RoomRepository,
    connection_id: &ConnectionId,
    room: &RoomName,
    author: Option<&Identity>,
) -> Result<Binding, BindingError> {
    let binding = repository
        .binding(connection_id)
        .await
        .ok_or(BindingError::NotInRoom)?;

    if &binding.room != room {
        return Err(BindingError::RoomMismatch(room.clone()));
    }
    if author.is_some_and(|author| author != &binding.identity) {
        return Err(BindingError::AuthorMismatch);
    }

    Ok(binding)
}
