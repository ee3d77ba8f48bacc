use std::collections::VecDeque;

use minefield_common::models::{Pos, RevealedTile, Tile};

use crate::{
    data::{HiddenBoard, PublicBoard},
    error::{GameError, Result},
};

pub const MINE_PENALTY: i64 = -10;
pub const SAFE_REWARD: i64 = 1;

/// Outcome of a single reveal: tiles in reveal order and the score they earn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    pub tiles: Vec<RevealedTile>,
    pub score: i64,
}

/// Breadth-first reveal from `start`, expanding through zero-count tiles.
///
/// Mutates `public` in place. Fails without touching `public` if `start` is
/// out of bounds or not hidden.
pub fn resolve(hidden: &HiddenBoard, public: &mut PublicBoard, start: Pos) -> Result<Cascade> {
    if public.get(start) != Some(Tile::Hidden) {
        return Err(GameError::InvalidMove(start));
    }

    let dims = public.dims();
    if hidden.dims() != dims {
        return Err(GameError::Internal(format!(
            "hidden board is {}x{} but public board is {}x{}",
            hidden.dims().height,
            hidden.dims().width,
            dims.height,
            dims.width
        )));
    }

    let mut cascade = Cascade {
        tiles: Vec::new(),
        score: 0,
    };
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        // Reached earlier through another neighbour.
        if public.get(pos) != Some(Tile::Hidden) {
            continue;
        }
        let Some(value) = hidden.get(pos).map(|tile| tile.disclose()) else {
            return Err(GameError::Internal(format!(
                "hidden board has no tile at {}",
                pos
            )));
        };

        public.set(pos, value);
        cascade.tiles.push(RevealedTile {
            row: pos.row,
            col: pos.col,
            value,
        });
        cascade.score += match value {
            Tile::Mine => MINE_PENALTY,
            _ => SAFE_REWARD,
        };

        if value == (Tile::Revealed { adjacent: 0 }) {
            queue.extend(
                dims.neighbors(pos)
                    .filter(|&n| public.get(n) == Some(Tile::Hidden)),
            );
        }
    }

    Ok(cascade)
}
