//! UseCase: ルーム一覧の取得

use std::sync::Arc;

use crate::domain::{ConnectionId, OutboundEvent, RoomName, RoomRepository};

use super::BroadcastRouter;

pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    router: Arc<BroadcastRouter>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, router: Arc<BroadcastRouter>) -> Self {
        Self { repository, router }
    }

    /// Send the current room-name snapshot to the requester only
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<RoomName> {
        // Ordered against the room_list announcements
        let _membership = self.router.lock_membership().await;
        let rooms = self.repository.list_rooms().await;

        if let Err(e) = self
            .router
            .to_connection(connection_id, &OutboundEvent::RoomList(rooms.clone()))
            .await
        {
            tracing::warn!("Failed to send room_list to '{}': {}", connection_id, e);
        }
        rooms
    }
}
