//! WebSocket event envelope DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.
//! Events without a payload omit `data`.

use serde::{Deserialize, Serialize};

/// Client → server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    GetRooms,
    JoinRoom(JoinRoomPayload),
    LeaveRoom,
    SendMessage(SendMessagePayload),
    UploadFile(UploadFilePayload),
}

impl ClientEvent {
    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetRooms => "get_rooms",
            Self::JoinRoom(_) => "join_room",
            Self::LeaveRoom => "leave_room",
            Self::SendMessage(_) => "send_message",
            Self::UploadFile(_) => "upload_file",
        }
    }
}

/// Missing fields decode as empty strings so validation can name them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    #[serde(default)]
    pub room: String,
    #[serde(default, alias = "userId")]
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendMessagePayload {
    #[serde(default)]
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Client clock; ignored by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFilePayload {
    #[serde(default)]
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_data: String,
    /// Client clock; ignored by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Server → client events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    RoomList(Vec<String>),
    JoinedSuccess(String),
    LeftSuccess(String),
    ErrorMsg(String),
    ReceiveMessage(ChatMessageDto),
    ReceiveFile(FileMessageDto),
    UserJoined(NoticeDto),
    UserLeft(NoticeDto),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub room: String,
    pub author: String,
    pub message: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMessageDto {
    pub room: String,
    pub author: String,
    pub file_name: String,
    pub file_data: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeDto {
    pub message: String,
    pub time: String,
}
