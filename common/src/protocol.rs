use serde::{Deserialize, Serialize};

use crate::models::{PlayerView, Pos, RevealedTile, Tile};

/// Published to subscribers of a game after every successful commit.
///
/// `version` is the store version the commit produced. Updates for one game
/// may arrive out of order under contention; the highest version is current.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum GameUpdate {
    #[serde(rename = "move")]
    MovePlayed {
        version: u64,
        player: PlayerView,
        reveal: Pos,
        revealed: Vec<RevealedTile>,
        board: Vec<Vec<Tile>>,
        moves: usize,
    },
    #[serde(rename = "join")]
    PlayerJoined { version: u64, player: PlayerView },
}
