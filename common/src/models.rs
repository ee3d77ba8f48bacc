use std::fmt;

use serde::{Deserialize, Serialize};

/// Publicly visible state of a single tile.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "state")]
pub enum Tile {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "flagged")]
    Flagged,
    #[serde(rename = "mine")]
    Mine,
    #[serde(rename = "revealed")]
    Revealed { adjacent: u8 },
}

impl Tile {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Tile::Hidden)
    }
}

/// Zero-indexed board coordinate.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A tile disclosed by a move, in reveal order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealedTile {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

impl RevealedTile {
    pub fn pos(&self) -> Pos {
        Pos {
            row: self.row,
            col: self.col,
        }
    }
}

/// Every field is required; a body missing one is rejected before any game is made.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct GameParams {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayMoveRequest {
    pub reveal: Pos,
    #[serde(default)]
    pub add_flags: Vec<Pos>,
    #[serde(default)]
    pub remove_flags: Vec<Pos>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameIdResponse {
    pub game_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayMoveResponse {
    pub moves: Vec<RevealedTile>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub uid: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub score: i64,
}

/// Everything a joined player may see about a game. Never carries hidden state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: String,
    pub created_at: String,
    pub creator: String,
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    pub board: Vec<Vec<Tile>>,
    pub moves: Vec<Pos>,
}

/// Stable, client-facing classification of a failed request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    #[serde(rename = "invalid-argument")]
    InvalidArgument,
    #[serde(rename = "not-found")]
    NotFound,
    #[serde(rename = "permission-denied")]
    PermissionDenied,
    #[serde(rename = "internal")]
    Internal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}
