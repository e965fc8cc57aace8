//! Room directory and connection state.
//!
//! `RoomDirectory` owns both the room → members map and the connection →
//! binding table. Every mutation updates the two together, so a connection's
//! binding and the membership it claims can never disagree.
//!
//! ## Invariants
//!
//! - a room is present iff its member set is non-empty
//! - an identity appears at most once per room
//! - a connection is bound to at most one room

use std::collections::{BTreeMap, HashMap};

use super::{
    error::JoinError,
    value_object::{ConnectionId, Identity, RoomName},
};

/// A named room and its current members.
///
/// Each member identity maps to the connection holding it, which is what the
/// broadcast router fans out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: RoomName,
    members: BTreeMap<Identity, ConnectionId>,
}

impl Room {
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: BTreeMap::new(),
        }
    }

    /// Add a member, enforcing per-room identity uniqueness and the optional capacity
    pub fn add_member(
        &mut self,
        identity: Identity,
        connection_id: ConnectionId,
        capacity: Option<usize>,
    ) -> Result<(), JoinError> {
        if self.members.contains_key(&identity) {
            return Err(JoinError::AlreadyMember);
        }
        if let Some(capacity) = capacity
            && self.members.len() >= capacity
        {
            return Err(JoinError::RoomFull(capacity));
        }

        self.members.insert(identity, connection_id);
        Ok(())
    }

    /// Remove a member, returning the connection that held it
    pub fn remove_member(&mut self, identity: &Identity) -> Option<ConnectionId> {
        self.members.remove(identity)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member identities, sorted
    pub fn identities(&self) -> Vec<Identity> {
        self.members.keys().cloned().collect()
    }

    /// Connections bound to this room
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.members.values().copied().collect()
    }
}

/// Room/identity pair a connection is bound to after a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub room: RoomName,
    pub identity: Identity,
}

/// Result of releasing a bound connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomName,
    pub identity: Identity,
    /// Whether the room was deleted because it became empty
    pub room_closed: bool,
}

/// Lobby view of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub name: RoomName,
    pub member_count: usize,
}

/// Room Directory together with the Connection State table.
#[derive(Debug, Clone, Default)]
pub struct RoomDirectory {
    rooms: BTreeMap<RoomName, Room>,
    connections: HashMap<ConnectionId, Binding>,
    /// Per-room member limit; `None` means unlimited
    max_members: Option<usize>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_members(max_members: Option<usize>) -> Self {
        Self {
            max_members,
            ..Self::default()
        }
    }

    /// Names of rooms that currently have at least one member, sorted
    pub fn list_rooms(&self) -> Vec<RoomName> {
        self.rooms.keys().cloned().collect()
    }

    /// Bind `connection_id` to `identity` in `room`, creating the room on first join.
    ///
    /// Nothing is mutated when the join is refused.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room: RoomName,
        identity: Identity,
    ) -> Result<(), JoinError> {
        if let Some(binding) = self.connections.get(&connection_id) {
            return Err(JoinError::AlreadyInRoom(binding.room.clone()));
        }

        // Check before creating so a refused join never leaves an empty room behind
        if let Some(existing) = self.rooms.get_mut(&room) {
            existing.add_member(identity.clone(), connection_id, self.max_members)?;
        } else {
            let mut created = Room::new(room.clone());
            created.add_member(identity.clone(), connection_id, self.max_members)?;
            self.rooms.insert(room.clone(), created);
        }

        self.connections
            .insert(connection_id, Binding { room, identity });
        Ok(())
    }

    /// Remove `identity` from `room`, deleting the room once it is empty.
    ///
    /// Idempotent: unknown rooms and non-members are ignored. The connection
    /// that held the membership is unbound and returned.
    pub fn leave(&mut self, room: &RoomName, identity: &Identity) -> Option<ConnectionId> {
        let entry = self.rooms.get_mut(room)?;
        let connection_id = entry.remove_member(identity)?;
        if entry.is_empty() {
            self.rooms.remove(room);
        }
        self.connections.remove(&connection_id);
        Some(connection_id)
    }

    /// Leave whatever room `connection_id` is bound to.
    ///
    /// Returns `None` when the connection is unbound.
    pub fn release(&mut self, connection_id: &ConnectionId) -> Option<Departure> {
        let binding = self.connections.get(connection_id)?.clone();
        self.leave(&binding.room, &binding.identity);

        Some(Departure {
            room_closed: !self.rooms.contains_key(&binding.room),
            room: binding.room,
            identity: binding.identity,
        })
    }

    /// Identities in `room`; empty when the room does not exist
    pub fn members(&self, room: &RoomName) -> Vec<Identity> {
        self.rooms
            .get(room)
            .map(Room::identities)
            .unwrap_or_default()
    }

    /// Connections bound to `room`; empty when the room does not exist
    pub fn connections_in(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(Room::connections)
            .unwrap_or_default()
    }

    pub fn binding(&self, connection_id: &ConnectionId) -> Option<&Binding> {
        self.connections.get(connection_id)
    }

    pub fn summaries(&self) -> Vec<RoomSummary> {
        self.rooms
            .values()
            .map(|room| RoomSummary {
                name: room.name.clone(),
                member_count: room.member_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn identity(name: &str) -> Identity {
        Identity::new(name.to_string()).unwrap()
    }

    /// Every room in the directory is non-empty and every binding has a matching membership
    fn assert_consistent(directory: &RoomDirectory) {
        for (name, entry) in &directory.rooms {
            assert!(!entry.is_empty(), "room '{}' is empty", name);
        }
        for (connection_id, binding) in &directory.connections {
            let entry = directory
                .rooms
                .get(&binding.room)
                .expect("binding points at a missing room");
            assert_eq!(entry.members.get(&binding.identity), Some(connection_id));
        }
        let member_total: usize = directory.rooms.values().map(Room::member_count).sum();
        assert_eq!(member_total, directory.connections.len());
    }

    #[test]
    fn test_join_creates_room() {
        // テスト項目: 最初の join でルームが作成される
        // given (前提条件):
        let mut directory = RoomDirectory::new();

        // when (操作):
        let result = directory.join(ConnectionId::generate(), room("general"), identity("alice"));

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert_eq!(directory.list_rooms(), vec![room("general")]);
        assert_eq!(directory.members(&room("general")), vec![identity("alice")]);
        assert_consistent(&directory);
    }

    #[test]
    fn test_join_same_identity_twice_is_rejected() {
        // テスト項目: 同じ identity で同じルームに 2 回 join すると AlreadyMember
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        directory
            .join(ConnectionId::generate(), room("general"), identity("alice"))
            .unwrap();

        // when (操作):
        let second = ConnectionId::generate();
        let result = directory.join(second, room("general"), identity("alice"));

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::AlreadyMember));
        assert_eq!(directory.members(&room("general")).len(), 1);
        assert!(directory.binding(&second).is_none());
        assert_consistent(&directory);
    }

    #[test]
    fn test_same_identity_in_different_rooms() {
        // テスト項目: identity の一意性はルーム単位でのみ強制される
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        directory
            .join(ConnectionId::generate(), room("general"), identity("alice"))
            .unwrap();

        // when (操作):
        let result = directory.join(ConnectionId::generate(), room("random"), identity("alice"));

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert_eq!(directory.list_rooms(), vec![room("general"), room("random")]);
        assert_consistent(&directory);
    }

    #[test]
    fn test_bound_connection_cannot_join_again() {
        // テスト項目: 既にルームに入っている接続は別ルームに join できない
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        let connection_id = ConnectionId::generate();
        directory
            .join(connection_id, room("general"), identity("alice"))
            .unwrap();

        // when (操作):
        let result = directory.join(connection_id, room("random"), identity("alice"));

        // then (期待する結果): random は作成されない
        assert_eq!(result, Err(JoinError::AlreadyInRoom(room("general"))));
        assert_eq!(directory.list_rooms(), vec![room("general")]);
        assert_consistent(&directory);
    }

    #[test]
    fn test_join_full_room_is_rejected() {
        // テスト項目: 上限人数に達したルームへの join は RoomFull
        // given (前提条件):
        let mut directory = RoomDirectory::with_max_members(Some(2));
        directory
            .join(ConnectionId::generate(), room("general"), identity("alice"))
            .unwrap();
        directory
            .join(ConnectionId::generate(), room("general"), identity("bob"))
            .unwrap();

        // when (操作):
        let result = directory.join(ConnectionId::generate(), room("general"), identity("charlie"));

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::RoomFull(2)));
        assert_eq!(directory.members(&room("general")).len(), 2);
        assert_consistent(&directory);
    }

    #[test]
    fn test_zero_capacity_never_creates_room() {
        // テスト項目: 拒否された join で空のルームが残らない
        // given (前提条件):
        let mut directory = RoomDirectory::with_max_members(Some(0));

        // when (操作):
        let result = directory.join(ConnectionId::generate(), room("general"), identity("alice"));

        // then (期待する結果):
        assert_eq!(result, Err(JoinError::RoomFull(0)));
        assert!(directory.list_rooms().is_empty());
    }

    #[test]
    fn test_leave_last_member_deletes_room() {
        // テスト項目: 最後のメンバーが抜けるとルームが削除される
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        let connection_id = ConnectionId::generate();
        directory
            .join(connection_id, room("general"), identity("alice"))
            .unwrap();

        // when (操作):
        let released = directory.leave(&room("general"), &identity("alice"));

        // then (期待する結果):
        assert_eq!(released, Some(connection_id));
        assert!(directory.list_rooms().is_empty());
        assert!(directory.binding(&connection_id).is_none());
        assert_consistent(&directory);
    }

    #[test]
    fn test_leave_is_idempotent() {
        // テスト項目: 存在しないルーム・メンバーの leave は状態を変えない
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        directory
            .join(ConnectionId::generate(), room("general"), identity("alice"))
            .unwrap();
        let before_rooms = directory.list_rooms();
        let before_members = directory.members(&room("general"));

        // when (操作):
        let unknown_member = directory.leave(&room("general"), &identity("bob"));
        let unknown_room = directory.leave(&room("nowhere"), &identity("alice"));

        // then (期待する結果):
        assert_eq!(unknown_member, None);
        assert_eq!(unknown_room, None);
        assert_eq!(directory.list_rooms(), before_rooms);
        assert_eq!(directory.members(&room("general")), before_members);
        assert_consistent(&directory);
    }

    #[test]
    fn test_release_returns_departure() {
        // テスト項目: 接続の解放でバインド中のルームから抜ける
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        directory.join(alice, room("general"), identity("alice")).unwrap();
        directory.join(bob, room("general"), identity("bob")).unwrap();

        // when (操作):
        let departure = directory.release(&alice);

        // then (期待する結果): bob が残るのでルームは維持される
        assert_eq!(
            departure,
            Some(Departure {
                room: room("general"),
                identity: identity("alice"),
                room_closed: false,
            })
        );
        assert_eq!(directory.list_rooms(), vec![room("general")]);
        assert_eq!(directory.connections_in(&room("general")), vec![bob]);

        let last = directory.release(&bob).unwrap();
        assert!(last.room_closed);
        assert!(directory.list_rooms().is_empty());
        assert_consistent(&directory);
    }

    #[test]
    fn test_release_unbound_connection() {
        // テスト項目: 未バインドの接続を解放しても何も起きない
        // given (前提条件):
        let mut directory = RoomDirectory::new();

        // when (操作):
        let departure = directory.release(&ConnectionId::generate());

        // then (期待する結果):
        assert_eq!(departure, None);
    }

    #[test]
    fn test_connections_in_is_scoped_to_room() {
        // テスト項目: 接続一覧は指定ルームのものだけ返される
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        let carol = ConnectionId::generate();
        directory.join(alice, room("general"), identity("alice")).unwrap();
        directory.join(bob, room("general"), identity("bob")).unwrap();
        directory.join(carol, room("random"), identity("carol")).unwrap();

        // when (操作):
        let general = directory.connections_in(&room("general"));

        // then (期待する結果):
        assert_eq!(general.len(), 2);
        assert!(general.contains(&alice));
        assert!(general.contains(&bob));
        assert!(!general.contains(&carol));
        assert!(directory.connections_in(&room("nowhere")).is_empty());
    }

    #[test]
    fn test_summaries_report_member_counts() {
        // テスト項目: ルームごとの人数が集計される
        // given (前提条件):
        let mut directory = RoomDirectory::new();
        directory
            .join(ConnectionId::generate(), room("general"), identity("alice"))
            .unwrap();
        directory
            .join(ConnectionId::generate(), room("general"), identity("bob"))
            .unwrap();
        directory
            .join(ConnectionId::generate(), room("random"), identity("carol"))
            .unwrap();

        // when (操作):
        let summaries = directory.summaries();

        // then (期待する結果):
        assert_eq!(
            summaries,
            vec![
                RoomSummary {
                    name: room("general"),
                    member_count: 2
                },
                RoomSummary {
                    name: room("random"),
                    member_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_interleaved_operations_keep_invariants() {
        // テスト項目: join / leave / release を交互に行っても不変条件が保たれる
        // given (前提条件):
        let mut directory = RoomDirectory::with_max_members(Some(3));
        let connections: Vec<ConnectionId> = (0..6).map(|_| ConnectionId::generate()).collect();
        let names = ["alice", "bob", "alice", "carol", "dave", "bob"];
        let rooms = ["general", "general", "random", "general", "general", "random"];

        // when (操作):
        for ((connection_id, name), room_name) in connections.iter().zip(names).zip(rooms) {
            let _ = directory.join(*connection_id, room(room_name), identity(name));
            assert_consistent(&directory);
        }
        directory.release(&connections[0]);
        assert_consistent(&directory);
        directory.leave(&room("random"), &identity("alice"));
        assert_consistent(&directory);
        let _ = directory.join(connections[4], room("general"), identity("dave"));
        assert_consistent(&directory);

        // then (期待する結果):
        assert_eq!(
            directory.members(&room("general")),
            vec![identity("bob"), identity("carol"), identity("dave")]
        );
        assert_eq!(directory.members(&room("random")), vec![identity("bob")]);
    }
}
