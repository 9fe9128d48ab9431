use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Index;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use mode::*;
pub use timer::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod mode;
mod timer;
mod types;

/// The fixed set of mined coordinates for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Wraps a mask indexed `[x, y]`. Either axis longer than [`Coord::MAX`] is rejected.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (x, y) = mine_mask.dim();
        if Coord::try_from(x).is_err() || Coord::try_from(y).is_err() {
            return Err(GameError::InvalidMode);
        }
        Ok(Self::from_sized_mask(mine_mask))
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(grid_index(size));

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::OutOfBounds);
            }
            mine_mask[grid_index(coords)] = true;
        }

        Ok(Self::from_sized_mask(mine_mask))
    }

    /// Caller guarantees both axes fit a [`Coord`], so the mine count fits a [`CellCount`].
    pub(crate) fn from_sized_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Self {
            mine_mask,
            mine_count: mine_count as CellCount,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.mine_mask.dim();
        (x as Coord, y as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (x, y) = self.size();
        CellCount::from(x) * CellCount::from(y)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Number of mines among the orthogonal neighbors of `coords`.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let mut count = 0;
        for pos in neighbors(coords, self.size()) {
            if self[pos] {
                count += 1;
            }
        }
        count
    }

    /// Mined coordinates in row-major order.
    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        let (size_x, size_y) = self.size();
        (0..size_y)
            .flat_map(move |y| (0..size_x).map(move |x| (x, y)))
            .filter(|&coords| self[coords])
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[grid_index(coords)]
    }
}
