//! UseCase: ファイル送信処理
//!
//! File content travels inline through the same fan-out path as text, so the
//! size cap is checked first, before the directory is even consulted.

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{
    ClockTime, ConnectionId, FileName, FilePayload, FileShare, Identity, OutboundEvent,
    RoomName, RoomRepository,
};

use super::{BroadcastRouter, error::UploadFileError, require_binding};

/// Validated `upload_file` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFileCommand {
    pub room: RoomName,
    /// Author claimed by the client, if any
    pub author: Option<Identity>,
    pub file_name: FileName,
    pub payload: FilePayload,
}

/// ファイル送信のユースケース
pub struct UploadFileUseCase {
    repository: Arc<dyn RoomRepository>,
    router: Arc<BroadcastRouter>,
    clock: Arc<dyn Clock>,
    max_payload_bytes: usize,
}

impl UploadFileUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        router: Arc<BroadcastRouter>,
        clock: Arc<dyn Clock>,
        max_payload_bytes: usize,
    ) -> Self {
        Self {
            repository,
            router,
            clock,
            max_payload_bytes,
        }
    }

    /// ファイル送信を実行
    ///
    /// Returns the number of connections the file was handed to.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        command: UploadFileCommand,
    ) -> Result<usize, UploadFileError> {
        let size = command.payload.byte_len();
        if size > self.max_payload_bytes {
            tracing::warn!(
                "Rejected {} byte upload from '{}' (max {})",
                size,
                connection_id,
                self.max_payload_bytes
            );
            return Err(UploadFileError::PayloadTooLarge {
                size,
                max: self.max_payload_bytes,
            });
        }

        let binding = require_binding(
            self.repository.as_ref(),
            &connection_id,
            &command.room,
            command.author.as_ref(),
        )
        .await?;

        let file = FileShare {
            room: binding.room,
            author: binding.identity,
            file_name: command.file_name,
            payload: command.payload,
            time: ClockTime::from_datetime(&self.clock.now()),
        };
        let (room, author, file_name) = (
            file.room.clone(),
            file.author.clone(),
            file.file_name.clone(),
        );

        match self
            .router
            .to_room_except_sender(&room, &connection_id, &OutboundEvent::ReceiveFile(file))
            .await
        {
            Ok(delivered) => {
                tracing::info!(
                    "Relayed file '{}' ({} bytes) from '{}' in '{}' to {} connections",
                    file_name.as_str(),
                    size,
                    author,
                    room,
                    delivered
                );
                Ok(delivered)
            }
            Err(e) => {
                tracing::warn!("Failed to relay file from '{}': {}", author, e);
                Ok(0)
            }
        }
    }
}
