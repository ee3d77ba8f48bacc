#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use minefield_common::models::{PlayMoveRequest, Pos};
use minefield_server::{
    data::{GameRecord, HiddenBoard, PlayerRecord, PublicBoard},
    identity::Identity,
    logic::{Engine, EngineSettings},
    store::{GameStore, MemoryStore, Snapshot, StoreError, Transaction},
};

pub fn pos(row: usize, col: usize) -> Pos {
    Pos { row, col }
}

pub fn reveal(row: usize, col: usize) -> PlayMoveRequest {
    PlayMoveRequest {
        reveal: pos(row, col),
        ..Default::default()
    }
}

pub fn settings(retry_limit: u32) -> EngineSettings {
    EngineSettings {
        retry_limit,
        retry_backoff: Duration::ZERO,
        max_board_cells: 10_000,
    }
}

/// Stores a game with a known layout, created by `creator`.
pub async fn seed_game(store: &dyn GameStore, hidden: HiddenBoard, creator: &str) -> String {
    let game = GameRecord {
        created_at: Utc::now(),
        creator: creator.to_string(),
        board: PublicBoard::hidden(hidden.dims()),
        mines: hidden.mine_count(),
        moves: Vec::new(),
    };
    store
        .create(game, hidden, PlayerRecord::new(&Identity::new(creator)))
        .await
        .unwrap()
}

pub fn engine_with(store: Arc<dyn GameStore>) -> Engine {
    Engine::new(store, settings(16))
}

/// Wraps a [`MemoryStore`] to simulate lost races and corrupted writes.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub conflicts: AtomicU32,
    pub drop_hidden: bool,
    pub commits: AtomicU32,
}

impl FaultyStore {
    pub fn with_conflicts(conflicts: u32) -> Self {
        Self {
            conflicts: AtomicU32::new(conflicts),
            ..Default::default()
        }
    }

    pub fn without_hidden() -> Self {
        Self {
            drop_hidden: true,
            ..Default::default()
        }
    }
}

#[rocket::async_trait]
impl GameStore for FaultyStore {
    async fn create(
        &self,
        game: GameRecord,
        hidden: HiddenBoard,
        creator: PlayerRecord,
    ) -> Result<String, StoreError> {
        self.inner.create(game, hidden, creator).await
    }

    async fn load(&self, game_id: &str) -> Result<Option<Snapshot>, StoreError> {
        let mut snapshot = self.inner.load(game_id).await?;
        if self.drop_hidden
            && let Some(snapshot) = snapshot.as_mut()
        {
            snapshot.hidden = None;
        }
        Ok(snapshot)
    }

    async fn commit(&self, game_id: &str, transaction: Transaction) -> Result<u64, StoreError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::Conflict);
        }
        self.inner.commit(game_id, transaction).await
    }
}
