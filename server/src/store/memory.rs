use std::{collections::HashMap, sync::Arc};

use dashmap::{DashMap, Entry};
use nanoid::nanoid;
use tracing::{debug, instrument, warn};

use super::{GameStore, Snapshot, StoreError, Transaction};
use crate::data::{GameRecord, HiddenBoard, PlayerRecord};

const INITIAL_ID_LENGTH: usize = 10;
const MAX_ATTEMPTS_PER_LENGTH: usize = 10;

#[derive(Debug)]
struct Document {
    version: u64,
    game: GameRecord,
    players: HashMap<String, PlayerRecord>,
}

/// Process-local store. Each game document is guarded by its map shard, so a
/// commit's version check and its writes happen under one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: DashMap<String, Document>,
    hidden: DashMap<String, Arc<HiddenBoard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[rocket::async_trait]
impl GameStore for MemoryStore {
    #[instrument(level = "trace", skip_all)]
    async fn create(
        &self,
        game: GameRecord,
        hidden: HiddenBoard,
        creator: PlayerRecord,
    ) -> Result<String, StoreError> {
        let mut id_length = INITIAL_ID_LENGTH;

        loop {
            for _ in 0..MAX_ATTEMPTS_PER_LENGTH {
                let id = nanoid!(id_length);
                match self.games.entry(id.clone()) {
                    Entry::Occupied(_) => {
                        debug!("Game ID collision, trying another: {}", id);
                        continue;
                    }
                    Entry::Vacant(entry) => {
                        // Hidden board first: a visible game must always have one.
                        self.hidden.insert(id.clone(), Arc::new(hidden));
                        let players = HashMap::from([(game.creator.clone(), creator)]);
                        entry.insert(Document {
                            version: 0,
                            game,
                            players,
                        });
                        return Ok(id);
                    }
                }
            }

            warn!(
                "Exhausted ID attempts at length {}, increasing to {}",
                id_length,
                id_length + 1
            );
            id_length += 1;
        }
    }

    async fn load(&self, game_id: &str) -> Result<Option<Snapshot>, StoreError> {
        let Some(document) = self.games.get(game_id) else {
            return Ok(None);
        };

        Ok(Some(Snapshot {
            version: document.version,
            game: document.game.clone(),
            hidden: self.hidden.get(game_id).map(|board| board.value().clone()),
            players: document.players.clone(),
        }))
    }

    async fn commit(&self, game_id: &str, transaction: Transaction) -> Result<u64, StoreError> {
        let mut document = self
            .games
            .get_mut(game_id)
            .ok_or_else(|| StoreError::Missing(game_id.to_string()))?;

        if document.version != transaction.expected_version {
            debug!(
                "Rejecting commit on {}: expected version {}, found {}",
                game_id, transaction.expected_version, document.version
            );
            return Err(StoreError::Conflict);
        }

        if let Some(game) = transaction.game {
            document.game = game;
        }
        for (uid, player) in transaction.players {
            document.players.insert(uid, player);
        }
        document.version += 1;

        Ok(document.version)
    }
}
