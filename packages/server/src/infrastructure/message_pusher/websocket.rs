//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `OutboundEvent` を JSON に変換し、対象の接続へ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui::handler::websocket`）で行われます。
//! この実装は生成された sender を受け取り、送信キューに積むだけです。
//! ブロードキャストではイベントを一度だけエンコードし、各接続には文字列のコピーを渡します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    /// Number of registered connections
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(event))
            .map_err(|e| MessagePushError::Encode(e.to_string()))
    }

    fn deliver(
        clients: &HashMap<ConnectionId, PusherChannel>,
        target: &ConnectionId,
        frame: &str,
        event_name: &str,
    ) -> bool {
        let Some(sender) = clients.get(target) else {
            tracing::warn!(
                "Connection '{}' not found during {} broadcast, skipping",
                target,
                event_name
            );
            return false;
        };

        // ブロードキャストでは一部の送信失敗を許容
        if let Err(e) = sender.send(frame.to_string()) {
            tracing::warn!("Failed to push {} to '{}': {}", event_name, target, e);
            return false;
        }
        true
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;

        tracing::debug!("Pushed {} to '{}'", event.name(), connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let delivered = targets
            .iter()
            .filter(|target| Self::deliver(&clients, target, &frame, event.name()))
            .count();

        tracing::debug!(
            "Broadcasted {} to {}/{} connections",
            event.name(),
            delivered,
            targets.len()
        );
        Ok(delivered)
    }

    async fn broadcast_all(&self, event: &OutboundEvent) -> Result<usize, MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let delivered = clients
            .keys()
            .filter(|target| Self::deliver(&clients, target, &frame, event.name()))
            .count();

        tracing::debug!("Broadcasted {} to {} connections", event.name(), delivered);
        Ok(delivered)
    }
}
