//! Shared application state.

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{MessagePusher, RoomRepository},
    usecase::{
        BroadcastRouter, ConnectClientUseCase, DisconnectClientUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase, UploadFileUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続受付のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// UploadFileUseCase（ファイル送信のユースケース）
    pub upload_file_usecase: Arc<UploadFileUseCase>,
    /// Direct replies such as `error_msg`
    pub router: Arc<BroadcastRouter>,
    /// Lobby snapshots for the HTTP API
    pub repository: Arc<dyn RoomRepository>,
    /// Largest WebSocket frame accepted from a client
    pub max_frame_bytes: usize,
}

impl AppState {
    /// Wire every use case against one repository, one pusher and one clock
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: &ServerConfig,
    ) -> Self {
        let router = Arc::new(BroadcastRouter::new(
            repository.clone(),
            message_pusher.clone(),
        ));
        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            router.clone(),
            clock.clone(),
        ));

        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                leave_room_usecase.clone(),
                message_pusher,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone(), router.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                router.clone(),
                clock.clone(),
            )),
            leave_room_usecase,
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                router.clone(),
                clock.clone(),
                config.max_message_chars,
            )),
            upload_file_usecase: Arc::new(UploadFileUseCase::new(
                repository.clone(),
                router.clone(),
                clock,
                config.max_payload_bytes,
            )),
            router,
            repository,
            max_frame_bytes: config.max_frame_bytes(),
        }
    }
}
