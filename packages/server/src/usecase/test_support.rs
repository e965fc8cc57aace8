//! Fixtures shared by the use-case tests.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use roomcast_shared::time::{FixedClock, offset_from_hours};
use serde_json::Value;
use tokio::sync::{Notify, mpsc};

use crate::{
    domain::{
        ConnectionId, Identity, MessagePushError, MessagePusher, OutboundEvent, PusherChannel,
        RoomName,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
    },
};

use super::BroadcastRouter;

/// 2023-01-01 12:00:00 +09:00
pub const NOON_MILLIS: i64 = 1_672_542_000_000;

pub struct Harness {
    pub repository: Arc<InMemoryRoomRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_max_members(None)
    }

    pub fn with_max_members(max_members: Option<usize>) -> Self {
        let offset = offset_from_hours(9).unwrap();
        Self {
            repository: Arc::new(InMemoryRoomRepository::with_max_members(max_members)),
            pusher: Arc::new(WebSocketMessagePusher::default()),
            clock: Arc::new(FixedClock::from_millis(NOON_MILLIS, offset).unwrap()),
        }
    }

    pub fn router(&self) -> Arc<BroadcastRouter> {
        Arc::new(BroadcastRouter::new(
            self.repository.clone(),
            self.pusher.clone(),
        ))
    }

    /// Register a fresh connection and return its outbound queue
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        self.pusher.register_client(connection_id, tx).await;
        (connection_id, rx)
    }
}

/// Everything queued for a connection so far, decoded
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        events.push(serde_json::from_str(&frame).unwrap());
    }
    events
}

/// Event names in delivery order
pub fn names(events: &[Value]) -> Vec<String> {
    events
        .iter()
        .map(|event| event["event"].as_str().unwrap().to_string())
        .collect()
}

pub fn room(name: &str) -> RoomName {
    RoomName::new(name.to_string()).unwrap()
}

pub fn identity(name: &str) -> Identity {
    Identity::new(name.to_string()).unwrap()
}

/// Which delivery the [`StallingPusher`] holds back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stall {
    Broadcast,
    BroadcastAll,
}

/// Real pusher that parks the first matching delivery until released,
/// standing in for a task preempted mid-fan-out.
pub struct StallingPusher {
    pub inner: WebSocketMessagePusher,
    stall: Stall,
    armed: AtomicBool,
    stalled: Notify,
    released: Notify,
}

impl StallingPusher {
    pub fn new(stall: Stall) -> Self {
        Self {
            inner: WebSocketMessagePusher::default(),
            stall,
            armed: AtomicBool::new(true),
            stalled: Notify::new(),
            released: Notify::new(),
        }
    }

    /// Resolves once a delivery is parked
    pub async fn wait_until_stalled(&self) {
        self.stalled.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    async fn hold(&self, kind: Stall) {
        if kind == self.stall && self.armed.swap(false, Ordering::SeqCst) {
            self.stalled.notify_one();
            self.released.notified().await;
        }
    }
}

#[async_trait]
impl MessagePusher for StallingPusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.inner.register_client(connection_id, sender).await;
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.inner.unregister_client(connection_id).await;
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        self.inner.push_to(connection_id, event).await
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        self.hold(Stall::Broadcast).await;
        self.inner.broadcast(targets, event).await
    }

    async fn broadcast_all(&self, event: &OutboundEvent) -> Result<usize, MessagePushError> {
        self.hold(Stall::BroadcastAll).await;
        self.inner.broadcast_all(event).await
    }
}
