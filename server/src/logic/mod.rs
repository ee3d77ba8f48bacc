use std::{sync::Arc, time::Duration};

use chrono::Utc;
use minefield_common::{
    models::{GameParams, GameView, PlayMoveRequest, PlayerView, Pos, RevealedTile, Tile},
    protocol::GameUpdate,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::Config,
    data::{GameRecord, PlayerRecord, PublicBoard},
    error::{GameError, Result},
    identity::Identity,
    notify::{Notifier, Subscription},
    store::{GameStore, Snapshot, StoreError, Transaction},
};

pub mod generator;
pub mod reveal;
mod session;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Extra attempts after the first when a commit loses a race.
    pub retry_limit: u32,
    pub retry_backoff: Duration,
    pub max_board_cells: usize,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            retry_limit: config.move_retry_limit,
            retry_backoff: config.move_retry_backoff,
            max_board_cells: config.max_board_cells,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Applies game operations against a [`GameStore`] as optimistic transactions
/// and publishes every committed change.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn GameStore>,
    notifier: Notifier,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(store: Arc<dyn GameStore>, settings: EngineSettings) -> Self {
        Self {
            store,
            notifier: Notifier::new(),
            settings,
        }
    }

    /// Updates committed to `game_id` from now on.
    pub async fn subscribe(&self, game_id: &str) -> Result<Subscription> {
        self.load(game_id).await?;
        Ok(self.notifier.subscribe(game_id))
    }

    /// Rejects board parameters [`Engine::new_game`] would refuse, without generating anything.
    pub fn check_params(&self, params: &GameParams) -> Result<()> {
        generator::validate(params, self.settings.max_board_cells).map(|_| ())
    }

    #[instrument(level = "trace", skip(self, creator), fields(creator = %creator.uid))]
    pub async fn new_game(&self, creator: &Identity, params: GameParams) -> Result<String> {
        let (hidden, board) = {
            let mut rng = rand::rng();
            generator::generate(&params, self.settings.max_board_cells, &mut rng)?
        };

        let game = GameRecord {
            created_at: Utc::now(),
            creator: creator.uid.clone(),
            board,
            mines: hidden.mine_count(),
            moves: Vec::new(),
        };

        let id = self
            .store
            .create(game, hidden, PlayerRecord::new(creator))
            .await
            .map_err(|e| GameError::Internal(format!("failed to create game: {}", e)))?;

        info!(
            "Created game {}: {}x{} with {} mines for {}",
            id, params.height, params.width, params.mines, creator.uid
        );
        Ok(id)
    }

    /// Applies one reveal (and any accompanying flag changes) for a joined player.
    #[instrument(level = "trace", skip(self, request), fields(row = request.reveal.row, col = request.reveal.col))]
    pub async fn play_move(
        &self,
        game_id: &str,
        uid: &str,
        request: &PlayMoveRequest,
    ) -> Result<Vec<RevealedTile>> {
        let ((revealed, player, board, moves), version) = self
            .transact(game_id, |snapshot| {
                let hidden = snapshot.hidden.as_deref().ok_or_else(|| {
                    GameError::Internal(format!("game {} has no hidden board", game_id))
                })?;
                let mut player = member(snapshot, uid)?.clone();
                let mut game = snapshot.game.clone();

                apply_flags(&mut game.board, &request.add_flags, &request.remove_flags)?;

                let reveal = request.reveal;
                let dims = game.board.dims();
                if !dims.contains(reveal) {
                    return Err(GameError::InvalidArgument(format!(
                        "move {} is outside the {}x{} board",
                        reveal, dims.height, dims.width
                    )));
                }

                let cascade = reveal::resolve(hidden, &mut game.board, reveal)?;
                game.moves.push(reveal);
                player.score += cascade.score;

                let outcome = (
                    cascade.tiles,
                    player.view(uid),
                    game.board.rows(),
                    game.moves.len(),
                );
                let transaction = Transaction::at(snapshot.version)
                    .put_game(game)
                    .put_player(uid, player);
                Ok((transaction, outcome))
            })
            .await?;

        debug!(
            "Player {} revealed {} tiles in game {}",
            uid,
            revealed.len(),
            game_id
        );
        self.notifier.publish(
            game_id,
            GameUpdate::MovePlayed {
                version,
                player,
                reveal: request.reveal,
                revealed: revealed.clone(),
                board,
                moves,
            },
        );
        Ok(revealed)
    }

    pub async fn game_view(&self, game_id: &str, uid: &str) -> Result<GameView> {
        let snapshot = self.load(game_id).await?;
        member(&snapshot, uid)?;

        let game = snapshot.game;
        let dims = game.board.dims();
        Ok(GameView {
            game_id: game_id.to_string(),
            created_at: game.created_at.to_rfc3339(),
            creator: game.creator,
            height: dims.height,
            width: dims.width,
            mines: game.mines,
            board: game.board.rows(),
            moves: game.moves,
        })
    }

    /// Joined players, highest score first.
    pub async fn players(&self, game_id: &str, uid: &str) -> Result<Vec<PlayerView>> {
        let snapshot = self.load(game_id).await?;
        member(&snapshot, uid)?;

        let mut players: Vec<PlayerView> = snapshot
            .players
            .iter()
            .map(|(uid, player)| player.view(uid))
            .collect();
        players.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.uid.cmp(&b.uid)));
        Ok(players)
    }

    async fn load(&self, game_id: &str) -> Result<Snapshot> {
        self.store
            .load(game_id)
            .await
            .map_err(|e| GameError::Internal(e.to_string()))?
            .ok_or_else(|| GameError::NotFound(game_id.to_string()))
    }

    /// Read-modify-write loop. `plan` computes the writes from a fresh snapshot
    /// on every attempt, so a retried operation never reuses stale state.
    /// Returns the plan's outcome with the version the commit produced.
    async fn transact<T, F>(&self, game_id: &str, mut plan: F) -> Result<(T, u64)>
    where
        F: FnMut(&Snapshot) -> Result<(Transaction, T)> + Send,
        T: Send,
    {
        let attempts = self.settings.retry_limit.saturating_add(1);

        for attempt in 0..attempts {
            if attempt > 0 && !self.settings.retry_backoff.is_zero() {
                tokio::time::sleep(backoff_delay(self.settings.retry_backoff, attempt)).await;
            }

            let snapshot = self.load(game_id).await?;
            let (transaction, outcome) = plan(&snapshot)?;

            match self.store.commit(game_id, transaction).await {
                Ok(version) => {
                    debug!("Committed game {} at version {}", game_id, version);
                    return Ok((outcome, version));
                }
                Err(StoreError::Conflict) => {
                    debug!(
                        "Conflict on game {} (attempt {} of {}), retrying",
                        game_id,
                        attempt + 1,
                        attempts
                    );
                }
                Err(StoreError::Missing(id)) => return Err(GameError::NotFound(id)),
                Err(e) => return Err(GameError::Internal(e.to_string())),
            }
        }

        warn!(
            "Giving up on game {} after {} conflicting attempts",
            game_id, attempts
        );
        Err(GameError::Internal(format!(
            "game {} is too busy, gave up after {} attempts",
            game_id, attempts
        )))
    }
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}

fn member<'a>(snapshot: &'a Snapshot, uid: &str) -> Result<&'a PlayerRecord> {
    snapshot.players.get(uid).ok_or_else(|| {
        GameError::PermissionDenied(format!("{} has not joined this game", uid))
    })
}

fn apply_flags(board: &mut PublicBoard, add: &[Pos], remove: &[Pos]) -> Result<()> {
    for &pos in add {
        if board.get(pos) != Some(Tile::Hidden) {
            return Err(GameError::InvalidArgument(format!(
                "cannot flag {}: not a hidden tile",
                pos
            )));
        }
        board.set(pos, Tile::Flagged);
    }

    for &pos in remove {
        if board.get(pos) != Some(Tile::Flagged) {
            return Err(GameError::InvalidArgument(format!(
                "cannot unflag {}: not a flagged tile",
                pos
            )));
        }
        board.set(pos, Tile::Hidden);
    }

    Ok(())
}
