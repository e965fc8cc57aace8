//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomDirectory` を一つの `Mutex` で保護し、全ての操作をこのロック一つで
//! 直列化します。join の「確認してから追加」はロックを保持したまま行われるため、
//! 同じ (room, identity) への同時 join は必ず一方だけが成功します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Binding, ConnectionId, Departure, Identity, JoinError, RoomDirectory, RoomName,
    RoomRepository, RoomSummary,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    directory: Arc<Mutex<RoomDirectory>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(directory: Arc<Mutex<RoomDirectory>>) -> Self {
        Self { directory }
    }

    /// Empty directory with the given per-room member limit
    pub fn with_max_members(max_members: Option<usize>) -> Self {
        Self::new(Arc::new(Mutex::new(RoomDirectory::with_max_members(
            max_members,
        ))))
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::with_max_members(None)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn list_rooms(&self) -> Vec<RoomName> {
        let directory = self.directory.lock().await;
        directory.list_rooms()
    }

    async fn join(
        &self,
        connection_id: ConnectionId,
        room: RoomName,
        identity: Identity,
    ) -> Result<(), JoinError> {
        let mut directory = self.directory.lock().await;
        directory.join(connection_id, room, identity)
    }

    async fn leave(&self, room: &RoomName, identity: &Identity) -> Option<ConnectionId> {
        let mut directory = self.directory.lock().await;
        directory.leave(room, identity)
    }

    async fn release(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let mut directory = self.directory.lock().await;
        directory.release(connection_id)
    }

    async fn members(&self, room: &RoomName) -> Vec<Identity> {
        let directory = self.directory.lock().await;
        directory.members(room)
    }

    async fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId> {
        let directory = self.directory.lock().await;
        directory.connections_in(room)
    }

    async fn binding(&self, connection_id: &ConnectionId) -> Option<Binding> {
        let directory = self.directory.lock().await;
        directory.binding(connection_id).cloned()
    }

    async fn summaries(&self) -> Vec<RoomSummary> {
        let directory = self.directory.lock().await;
        directory.summaries()
    }
}
