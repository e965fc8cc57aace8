//! インメモリ実装（再起動で全て消える）

mod room;

pub use room::InMemoryRoomRepository;
