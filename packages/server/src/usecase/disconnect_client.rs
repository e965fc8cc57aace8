//! UseCase: 接続の切断処理
//!
//! Transport loss is an implicit leave. The connection is unregistered first
//! so the departure broadcasts only target live connections.

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, MessagePusher};

use super::LeaveRoomUseCase;

/// 切断のユースケース
pub struct DisconnectClientUseCase {
    leave_room: Arc<LeaveRoomUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(leave_room: Arc<LeaveRoomUseCase>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            leave_room,
            message_pusher,
        }
    }

    /// Tear down a connection; returns the departure if it was bound
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        self.message_pusher.unregister_client(connection_id).await;
        self.leave_room.depart(connection_id).await
    }
}
