use minefield_common::models::GameParams;
use rand::Rng;
use tracing::debug;

use crate::{
    data::{Dimensions, HiddenBoard, PublicBoard},
    error::{GameError, Result},
};

/// Places exactly `params.mines` distinct mines uniformly at random.
///
/// Cells are drawn with replacement; a draw that lands on an existing mine is
/// discarded. Terminates because `mines < height * width` is enforced.
pub fn generate<R: Rng + ?Sized>(
    params: &GameParams,
    max_cells: usize,
    rng: &mut R,
) -> Result<(HiddenBoard, PublicBoard)> {
    let dims = validate(params, max_cells)?;

    let mut hidden = HiddenBoard::empty(dims);
    let mut placed = 0;
    let mut collisions = 0usize;
    while placed < params.mines {
        let pos = dims.pos(rng.random_range(0..dims.cells()));
        if hidden.place_mine(pos) {
            placed += 1;
        } else {
            collisions += 1;
        }
    }

    debug!(
        "Generated {}x{} board with {} mines ({} collisions)",
        dims.height, dims.width, placed, collisions
    );
    Ok((hidden, PublicBoard::hidden(dims)))
}

pub(crate) fn validate(params: &GameParams, max_cells: usize) -> Result<Dimensions> {
    if params.height == 0 || params.width == 0 {
        return Err(GameError::InvalidArgument(format!(
            "board dimensions must be positive, got {}x{}",
            params.height, params.width
        )));
    }

    let cells = params
        .height
        .checked_mul(params.width)
        .filter(|&cells| cells <= max_cells)
        .ok_or_else(|| {
            GameError::InvalidArgument(format!(
                "board of {}x{} exceeds the {} cell limit",
                params.height, params.width, max_cells
            ))
        })?;

    if params.mines >= cells {
        return Err(GameError::InvalidArgument(format!(
            "{} mines do not fit a board of {} cells",
            params.mines, cells
        )));
    }

    Ok(Dimensions {
        height: params.height,
        width: params.width,
    })
}
