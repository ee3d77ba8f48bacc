//! Persistence seam for the engine.
//!
//! A game is two records plus a player collection: the public game document,
//! the hidden board, and one player record per joined identity. Writes go
//! through [`GameStore::commit`], which applies a [`Transaction`] only if the
//! game is still at the version the transaction was computed from.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use crate::data::{GameRecord, HiddenBoard, PlayerRecord};

mod memory;

pub use memory::MemoryStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("game was modified concurrently")]
    Conflict,
    #[error("game {0} does not exist")]
    Missing(String),
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Consistent read of everything a move touches, tagged with the version it was read at.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: u64,
    pub game: GameRecord,
    pub hidden: Option<Arc<HiddenBoard>>,
    pub players: HashMap<String, PlayerRecord>,
}

/// Writes that must land together or not at all.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub expected_version: u64,
    pub game: Option<GameRecord>,
    pub players: Vec<(String, PlayerRecord)>,
}

impl Transaction {
    pub fn at(version: u64) -> Self {
        Self {
            expected_version: version,
            ..Default::default()
        }
    }

    pub fn put_game(mut self, game: GameRecord) -> Self {
        self.game = Some(game);
        self
    }

    pub fn put_player(mut self, uid: impl Into<String>, player: PlayerRecord) -> Self {
        self.players.push((uid.into(), player));
        self
    }
}

#[rocket::async_trait]
pub trait GameStore: Send + Sync {
    /// Persists a new game and returns its generated id.
    async fn create(
        &self,
        game: GameRecord,
        hidden: HiddenBoard,
        creator: PlayerRecord,
    ) -> Result<String, StoreError>;

    async fn load(&self, game_id: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Returns the new version on success.
    async fn commit(&self, game_id: &str, transaction: Transaction) -> Result<u64, StoreError>;
}
