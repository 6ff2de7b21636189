//! UseCase layer: the game coordinator and the operations it runs.

pub mod broadcast;
pub mod coordinator;
pub mod matchmaking;
pub mod query;
pub mod round_engine;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast::Broadcaster;
pub use coordinator::{Command, Coordinator, CoordinatorHandle};
pub use query::{LobbySnapshot, RankedPlayer, RoomDetail, RoomSummary};
