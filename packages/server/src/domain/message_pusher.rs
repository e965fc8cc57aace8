//! MessagePusher trait 定義
//!
//! Outbound delivery to live connections. The UI layer creates one channel
//! per socket and registers its sending half here.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, OutboundEvent};

/// Sending half of a connection's outbound queue (encoded frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Delivers events to connections. Fire-and-forget: no acknowledgement, no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound channel of a newly accepted connection
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Drop the outbound channel of a closed connection
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Deliver to one connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// Deliver to each target; unknown or closed targets are skipped.
    ///
    /// Returns the number of connections the event was handed to.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError>;

    /// Deliver to every registered connection, bound or not
    async fn broadcast_all(&self, event: &OutboundEvent) -> Result<usize, MessagePushError>;
}
