//! UseCase: 接続の受付

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// Accept a connection in the **Unbound** state
pub struct ConnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Assign an identifier and register the connection's outbound channel
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        connection_id
    }
}
