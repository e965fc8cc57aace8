//! UseCase: ルームへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加成功時の通知（joined_success / room_list / user_joined）
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームの作成、既存ルームへの参加
//! - 異常系：同じ identity の重複参加、既に別ルームに参加中の接続、満員のルーム
//! - 並行系：参加の room_list 配信中に別の接続が退出する

use std::sync::Arc;

use roomcast_shared::time::Clock;

use crate::domain::{
    ClockTime, ConnectionId, Identity, OutboundEvent, PresenceNotice, RoomName, RoomRepository,
};

use super::{BroadcastRouter, error::JoinRoomError};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    router: Arc<BroadcastRouter>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        router: Arc<BroadcastRouter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            router,
            clock,
        }
    }

    /// 参加を実行
    ///
    /// On success the requester gets `joined_success`, every connection gets
    /// the new `room_list`, and the room's other members get `user_joined`.
    /// On failure nothing is mutated and nothing is sent.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room: RoomName,
        identity: Identity,
    ) -> Result<(), JoinRoomError> {
        let membership = self.router.lock_membership().await;
        self.repository
            .join(connection_id, room.clone(), identity.clone())
            .await?;
        tracing::info!("'{}' joined room '{}' ({})", identity, room, connection_id);

        if let Err(e) = self
            .router
            .to_connection(&connection_id, &OutboundEvent::JoinedSuccess(room.clone()))
            .await
        {
            tracing::warn!("Failed to confirm join to '{}': {}", connection_id, e);
        }

        self.router.announce_room_list(&membership).await;

        let notice = PresenceNotice::joined(&identity, ClockTime::from_datetime(&self.clock.now()));
        if let Err(e) = self
            .router
            .to_room_except_sender(&room, &connection_id, &OutboundEvent::UserJoined(notice))
            .await
        {
            tracing::warn!("Failed to broadcast user_joined for '{}': {}", identity, e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{JoinError, MessagePusher},
        usecase::{
            LeaveRoomUseCase,
            test_support::{Harness, Stall, StallingPusher, drain, identity, names, room},
        },
    };
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    fn usecase(harness: &Harness) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            harness.repository.clone(),
            harness.router(),
            harness.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_first_join_creates_room() {
        // テスト項目: 最初の参加でルームが作成され、参加者に通知される
        // given (前提条件):
        let harness = Harness::new();
        let usecase = usecase(&harness);
        let (alice, mut alice_rx) = harness.connect().await;
        let (_lobby, mut lobby_rx) = harness.connect().await;

        // when (操作):
        let result = usecase
            .execute(alice, room("general"), identity("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert_eq!(harness.repository.list_rooms().await, vec![room("general")]);
        assert_eq!(
            drain(&mut alice_rx),
            vec![
                json!({"event": "joined_success", "data": "general"}),
                json!({"event": "room_list", "data": ["general"]}),
            ]
        );
        // 未参加の接続にもルーム一覧だけは届く
        assert_eq!(names(&drain(&mut lobby_rx)), vec!["room_list"]);
    }

    #[tokio::test]
    async fn test_duplicate_join_is_rejected_without_side_effects() {
        // テスト項目: 同じ identity の重複参加は AlreadyMember になり何も送られない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = usecase(&harness);
        let (alice, mut alice_rx) = harness.connect().await;
        usecase
            .execute(alice, room("general"), identity("alice"))
            .await
            .unwrap();
        drain(&mut alice_rx);
        let (impostor, mut impostor_rx) = harness.connect().await;

        // when (操作):
        let result = usecase
            .execute(impostor, room("general"), identity("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::Rejected(JoinError::AlreadyMember)));
        assert_eq!(harness.repository.list_rooms().await, vec![room("general")]);
        assert!(drain(&mut alice_rx).is_empty());
        assert!(drain(&mut impostor_rx).is_empty());
    }

    #[tokio::test]
    async fn test_second_member_triggers_user_joined_for_existing_members() {
        // テスト項目: 2 人目の参加で既存メンバーにだけ user_joined が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = usecase(&harness);
        let (alice, mut alice_rx) = harness.connect().await;
        let (bob, mut bob_rx) = harness.connect().await;
        let (carol, mut carol_rx) = harness.connect().await;
        usecase
            .execute(alice, room("general"), identity("alice"))
            .await
            .unwrap();
        usecase
            .execute(carol, room("random"), identity("carol"))
            .await
            .unwrap();
        drain(&mut alice_rx);
        drain(&mut bob_rx);
        drain(&mut carol_rx);

        // when (操作):
        usecase
            .execute(bob, room("general"), identity("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        let alice_events = drain(&mut alice_rx);
        assert_eq!(names(&alice_events), vec!["room_list", "user_joined"]);
        assert_eq!(
            alice_events[1]["data"],
            json!({"message": "bob joined the room.", "time": "12:00"})
        );
        assert_eq!(names(&drain(&mut bob_rx)), vec!["joined_success", "room_list"]);
        assert_eq!(names(&drain(&mut carol_rx)), vec!["room_list"]);
    }

    #[tokio::test]
    async fn test_bound_connection_cannot_join_another_room() {
        // テスト項目: 参加中の接続は leave せずに別ルームへ参加できない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = usecase(&harness);
        let (alice, _alice_rx) = harness.connect().await;
        usecase
            .execute(alice, room("general"), identity("alice"))
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(alice, room("random"), identity("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(JoinRoomError::Rejected(JoinError::AlreadyInRoom(room("general"))))
        );
        assert_eq!(harness.repository.list_rooms().await, vec![room("general")]);
    }

    #[tokio::test]
    async fn test_join_full_room_is_rejected() {
        // テスト項目: 満員のルームには参加できない
        // given (前提条件):
        let harness = Harness::with_max_members(Some(1));
        let usecase = usecase(&harness);
        let (alice, _alice_rx) = harness.connect().await;
        let (bob, _bob_rx) = harness.connect().await;
        usecase
            .execute(alice, room("general"), identity("alice"))
            .await
            .unwrap();

        // when (操作):
        let result = usecase.execute(bob, room("general"), identity("bob")).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::Rejected(JoinError::RoomFull(1))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Room is full (1 members)."
        );
    }

    #[tokio::test]
    async fn test_interleaved_join_and_leave_end_on_current_room_list() {
        // テスト項目: 参加と退出が交錯しても、各接続が最後に受け取る room_list は現在のルーム一覧と一致する
        // given (前提条件): carol だけが random にいる
        let harness = Harness::new();
        let pusher = Arc::new(StallingPusher::new(Stall::BroadcastAll));
        let router = Arc::new(BroadcastRouter::new(
            harness.repository.clone(),
            pusher.clone(),
        ));
        let join = Arc::new(JoinRoomUseCase::new(
            harness.repository.clone(),
            router.clone(),
            harness.clock.clone(),
        ));
        let leave = Arc::new(LeaveRoomUseCase::new(
            harness.repository.clone(),
            router,
            harness.clock.clone(),
        ));
        let alice = ConnectionId::generate();
        let carol = ConnectionId::generate();
        let lobby = ConnectionId::generate();
        let mut queues = Vec::new();
        for connection_id in [alice, carol, lobby] {
            let (tx, rx) = mpsc::unbounded_channel();
            pusher.register_client(connection_id, tx).await;
            queues.push(rx);
        }
        harness
            .repository
            .join(carol, room("random"), identity("carol"))
            .await
            .unwrap();

        // when (操作): alice の参加が room_list の配信で止まっている間に carol が退出
        let joining = tokio::spawn({
            let join = join.clone();
            async move { join.execute(alice, room("general"), identity("alice")).await }
        });
        pusher.wait_until_stalled().await;
        let leaving = tokio::spawn({
            let leave = leave.clone();
            async move { leave.execute(&carol).await }
        });
        tokio::task::yield_now().await;
        pusher.release();
        joining.await.unwrap().unwrap();
        leaving.await.unwrap().unwrap();

        // then (期待する結果): 変更が適用された順に一覧が届く
        assert_eq!(harness.repository.list_rooms().await, vec![room("general")]);
        for rx in queues.iter_mut() {
            let lists: Vec<Value> = drain(rx)
                .into_iter()
                .filter(|event| event["event"] == "room_list")
                .map(|event| event["data"].clone())
                .collect();
            assert_eq!(
                lists,
                vec![json!(["general", "random"]), json!(["general"])]
            );
        }
    }
}
