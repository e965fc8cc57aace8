//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    Binding, ConnectionId, Departure, Identity, JoinError, RoomName, RoomSummary,
};

/// Room Repository trait
///
/// The single serialization point for the room directory and the connection
/// state table. Each method is one atomic step: implementations must not let
/// two calls observe or mutate the state concurrently.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Names of rooms with at least one member
    async fn list_rooms(&self) -> Vec<RoomName>;

    /// Atomically check membership and bind the connection
    async fn join(
        &self,
        connection_id: ConnectionId,
        room: RoomName,
        identity: Identity,
    ) -> Result<(), JoinError>;

    /// Remove a membership (idempotent), returning the connection that held it
    async fn leave(&self, room: &RoomName, identity: &Identity) -> Option<ConnectionId>;

    /// Leave whatever room the connection is bound to
    async fn release(&self, connection_id: &ConnectionId) -> Option<Departure>;

    /// Identities in a room (empty if absent)
    async fn members(&self, room: &RoomName) -> Vec<Identity>;

    /// Connections bound to a room (empty if absent)
    async fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId>;

    /// Current binding of a connection
    async fn binding(&self, connection_id: &ConnectionId) -> Option<Binding>;

    /// Room names with member counts
    async fn summaries(&self) -> Vec<RoomSummary>;
}
