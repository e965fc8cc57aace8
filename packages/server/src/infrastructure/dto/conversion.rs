//! Conversion logic between domain values and DTOs.

use crate::domain::{FileShare, OutboundEvent, PresenceNotice, RoomSummary, TextMessage};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain → DTO
// ========================================

impl From<&TextMessage> for dto::ChatMessageDto {
    fn from(model: &TextMessage) -> Self {
        Self {
            room: model.room.as_str().to_string(),
            author: model.author.as_str().to_string(),
            message: model.body.as_str().to_string(),
            time: model.time.as_str().to_string(),
        }
    }
}

impl From<&FileShare> for dto::FileMessageDto {
    fn from(model: &FileShare) -> Self {
        Self {
            room: model.room.as_str().to_string(),
            author: model.author.as_str().to_string(),
            file_name: model.file_name.as_str().to_string(),
            file_data: model.payload.as_str().to_string(),
            time: model.time.as_str().to_string(),
        }
    }
}

impl From<&PresenceNotice> for dto::NoticeDto {
    fn from(model: &PresenceNotice) -> Self {
        Self {
            message: model.message.clone(),
            time: model.time.as_str().to_string(),
        }
    }
}

impl From<&OutboundEvent> for dto::ServerEvent {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::RoomList(rooms) => Self::RoomList(
                rooms
                    .iter()
                    .map(|room| room.as_str().to_string())
                    .collect(),
            ),
            OutboundEvent::JoinedSuccess(room) => Self::JoinedSuccess(room.as_str().to_string()),
            OutboundEvent::LeftSuccess(room) => Self::LeftSuccess(room.as_str().to_string()),
            OutboundEvent::Error(message) => Self::ErrorMsg(message.clone()),
            OutboundEvent::ReceiveMessage(message) => Self::ReceiveMessage(message.into()),
            OutboundEvent::ReceiveFile(file) => Self::ReceiveFile(file.into()),
            OutboundEvent::UserJoined(notice) => Self::UserJoined(notice.into()),
            OutboundEvent::UserLeft(notice) => Self::UserLeft(notice.into()),
        }
    }
}

impl From<RoomSummary> for http::RoomSummaryDto {
    fn from(model: RoomSummary) -> Self {
        Self {
            name: model.name.into_string(),
            member_count: model.member_count,
        }
    }
}
