use chrono::{DateTime, Utc};
use minefield_common::models::{PlayerView, Pos, Tile};

use crate::identity::Identity;

/// Neighbour offsets as (drow, dcol), clockwise starting north.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
}

impl Dimensions {
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn cells(&self) -> usize {
        self.height * self.width
    }

    pub fn index(&self, pos: Pos) -> usize {
        pos.row * self.width + pos.col
    }

    pub fn pos(&self, index: usize) -> Pos {
        Pos {
            row: index / self.width,
            col: index % self.width,
        }
    }

    /// In-bounds 8-neighbourhood of `pos`, always in the same order.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let row = pos.row.checked_add_signed(dr)?;
            let col = pos.col.checked_add_signed(dc)?;
            let neighbor = Pos { row, col };
            self.contains(neighbor).then_some(neighbor)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenTile {
    Mine,
    Adjacent(u8),
}

impl HiddenTile {
    pub fn disclose(self) -> Tile {
        match self {
            HiddenTile::Mine => Tile::Mine,
            HiddenTile::Adjacent(adjacent) => Tile::Revealed { adjacent },
        }
    }
}

/// Authoritative mine layout. Never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenBoard {
    dims: Dimensions,
    tiles: Vec<HiddenTile>,
}

impl HiddenBoard {
    pub(crate) fn empty(dims: Dimensions) -> Self {
        Self {
            dims,
            tiles: vec![HiddenTile::Adjacent(0); dims.cells()],
        }
    }

    /// Builds a board with mines at exactly the given positions.
    /// Out-of-bounds positions are ignored and duplicates count once.
    pub fn from_mines(height: usize, width: usize, mines: &[Pos]) -> Self {
        let mut board = Self::empty(Dimensions { height, width });
        for &pos in mines {
            if board.dims.contains(pos) {
                board.place_mine(pos);
            }
        }
        board
    }

    /// Returns `false` if the cell already held a mine.
    pub(crate) fn place_mine(&mut self, pos: Pos) -> bool {
        let index = self.dims.index(pos);
        if self.tiles[index] == HiddenTile::Mine {
            return false;
        }
        self.tiles[index] = HiddenTile::Mine;

        for neighbor in self.dims.neighbors(pos) {
            let index = self.dims.index(neighbor);
            if let HiddenTile::Adjacent(count) = &mut self.tiles[index] {
                *count += 1;
            }
        }
        true
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn get(&self, pos: Pos) -> Option<HiddenTile> {
        self.dims
            .contains(pos)
            .then(|| self.tiles[self.dims.index(pos)])
    }

    pub fn mine_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| **tile == HiddenTile::Mine)
            .count()
    }
}

/// What every joined player is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicBoard {
    dims: Dimensions,
    tiles: Vec<Tile>,
}

impl PublicBoard {
    pub fn hidden(dims: Dimensions) -> Self {
        Self {
            dims,
            tiles: vec![Tile::Hidden; dims.cells()],
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.dims
            .contains(pos)
            .then(|| self.tiles[self.dims.index(pos)])
    }

    /// Caller guarantees `pos` is in bounds.
    pub(crate) fn set(&mut self, pos: Pos, tile: Tile) {
        let index = self.dims.index(pos);
        self.tiles[index] = tile;
    }

    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.tiles
            .chunks(self.dims.width)
            .map(|chunk| chunk.to_vec())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub created_at: DateTime<Utc>,
    pub creator: String,
    pub board: PublicBoard,
    pub mines: usize,
    pub moves: Vec<Pos>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub score: i64,
}

impl PlayerRecord {
    pub fn new(identity: &Identity) -> Self {
        Self {
            name: identity.name.clone(),
            picture: identity.picture.clone(),
            email: identity.email.clone(),
            score: 0,
        }
    }

    pub fn view(&self, uid: &str) -> PlayerView {
        PlayerView {
            uid: uid.to_string(),
            name: self.name.clone(),
            picture: self.picture.clone(),
            email: self.email.clone(),
            score: self.score,
        }
    }
}
