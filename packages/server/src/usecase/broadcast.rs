//! Broadcast Router
//!
//! Resolves a room to the connections currently bound to it and hands the
//! event to the message pusher. Never mutates directory or connection state.
//!
//! Membership changes run under [`MembershipGuard`]: the directory mutation,
//! the `room_list` snapshot and its enqueue happen inside one critical
//! section, so every connection sees the lists in the order the directory
//! applied the changes.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, OutboundEvent, RoomName, RoomRepository,
};

pub struct BroadcastRouter {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    membership: Mutex<()>,
}

/// Held for the whole of a join, a departure or a room-list reply.
pub struct MembershipGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl BroadcastRouter {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            membership: Mutex::new(()),
        }
    }

    /// Wait for any other membership change to finish announcing.
    pub async fn lock_membership(&self) -> MembershipGuard<'_> {
        MembershipGuard {
            _guard: self.membership.lock().await,
        }
    }

    /// Deliver to every connection bound to `room` except `sender`.
    ///
    /// Returns the number of connections reached.
    pub async fn to_room_except_sender(
        &self,
        room: &RoomName,
        sender: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let targets: Vec<ConnectionId> = self
            .repository
            .connections_in(room)
            .await
            .into_iter()
            .filter(|target| target != sender)
            .collect();

        self.message_pusher.broadcast(targets, event).await
    }

    /// Deliver to every connection bound to `room`
    pub async fn to_room(
        &self,
        room: &RoomName,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let targets = self.repository.connections_in(room).await;
        self.message_pusher.broadcast(targets, event).await
    }

    /// Deliver to every live connection, bound or not
    pub async fn global(&self, event: &OutboundEvent) -> Result<usize, MessagePushError> {
        self.message_pusher.broadcast_all(event).await
    }

    pub async fn to_connection(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, event).await
    }

    /// Send the current room-name list to everyone.
    ///
    /// Takes the guard so the snapshot cannot be overtaken by a later change.
    pub async fn announce_room_list(&self, _membership: &MembershipGuard<'_>) {
        let rooms = self.repository.list_rooms().await;
        if let Err(e) = self.global(&OutboundEvent::RoomList(rooms)).await {
            tracing::warn!("Failed to broadcast room_list: {}", e);
        }
    }
}
