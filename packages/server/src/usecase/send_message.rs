//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者以外の同じルームのメンバーにだけ届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とファンアウト
//! - 異常系：未参加の接続、別ルーム宛て、author の詐称、長すぎる本文
//! - エッジケース：送信者のみがルームにいる場合（配信対象なし）

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{
    ClockTime, ConnectionId, Identity, MessageBody, OutboundEvent, RoomName, RoomRepository,
    TextMessage,
};

use super::{BroadcastRouter, error::SendMessageError, require_binding};

/// Validated `send_message` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub room: RoomName,
    /// Author claimed by the client, if any
    pub author: Option<Identity>,
    pub body: MessageBody,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    router: Arc<BroadcastRouter>,
    clock: Arc<dyn Clock>,
    max_message_chars: usize,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        router: Arc<BroadcastRouter>,
        clock: Arc<dyn Clock>,
        max_message_chars: usize,
    ) -> Self {
        Self {
            repository,
            router,
            clock,
            max_message_chars,
        }
    }

    /// メッセージ送信を実行
    ///
    /// The relayed message carries the sender's bound identity and the
    /// server's clock. Returns the number of connections it was handed to.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        command: SendMessageCommand,
    ) -> Result<usize, SendMessageError> {
        let binding = require_binding(
            self.repository.as_ref(),
            &connection_id,
            &command.room,
            command.author.as_ref(),
        )
        .await?;

        if command.body.char_count() > self.max_message_chars {
            return Err(SendMessageError::MessageTooLong {
                max: self.max_message_chars,
            });
        }

        let message = TextMessage {
            room: binding.room,
            author: binding.identity,
            body: command.body,
            time: ClockTime::from_datetime(&self.clock.now()),
        };

        match self
            .router
            .to_room_except_sender(
                &message.room,
                &connection_id,
                &OutboundEvent::ReceiveMessage(message.clone()),
            )
            .await
        {
            Ok(delivered) => {
                tracing::debug!(
                    "Relayed message from '{}' in '{}' to {} connections",
                    message.author,
                    message.room,
                    delivered
                );
                Ok(delivered)
            }
            Err(e) => {
                tracing::warn!("Failed to relay message from '{}': {}", message.author, e);
                Ok(0)
            }
        }
    }
}
