//! UseCase: ルームからの退出
//!
//! The same departure path serves an explicit `leave_room` and an implicit
//! leave on disconnect.

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{
    ClockTime, ConnectionId, Departure, OutboundEvent, PresenceNotice, RoomName, RoomRepository,
};

use super::{BroadcastRouter, error::LeaveRoomError};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    router: Arc<BroadcastRouter>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        router: Arc<BroadcastRouter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            router,
            clock,
        }
    }

    /// Explicit leave; confirms with `left_success` to the requester.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<RoomName, LeaveRoomError> {
        let departure = self
            .depart(connection_id)
            .await
            .ok_or(LeaveRoomError::NotInRoom)?;

        if let Err(e) = self
            .router
            .to_connection(connection_id, &OutboundEvent::LeftSuccess(departure.room.clone()))
            .await
        {
            tracing::warn!("Failed to confirm leave to '{}': {}", connection_id, e);
        }

        Ok(departure.room)
    }

    /// Release the connection's binding and tell everyone who needs to know.
    ///
    /// Remaining members get `user_left`, every connection gets the updated
    /// `room_list`. Returns `None` (and sends nothing) for an unbound
    /// connection, so running it twice is harmless.
    pub async fn depart(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let membership = self.router.lock_membership().await;
        let departure = self.repository.release(connection_id).await?;
        tracing::info!(
            "'{}' left room '{}'{}",
            departure.identity,
            departure.room,
            if departure.room_closed {
                " (room closed)"
            } else {
                ""
            }
        );

        let notice = PresenceNotice::left(
            &departure.identity,
            ClockTime::from_datetime(&self.clock.now()),
        );
        if let Err(e) = self
            .router
            .to_room(&departure.room, &OutboundEvent::UserLeft(notice))
            .await
        {
            tracing::warn!(
                "Failed to broadcast user_left for '{}': {}",
                departure.identity,
                e
            );
        }

        self.router.announce_room_list(&membership).await;

        Some(departure)
    }
}
