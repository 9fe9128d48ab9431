use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible state of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub has_mine: bool,
    pub state: CellState,
}

/// How the game stands after an operation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    Won,
    Lost,
}

/// Minimal update a view needs to re-render after an engine call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Cells whose [`CellState`] changed, in the order they changed.
    pub changed: Vec<Coord2>,
    /// Every mine on the board, filled in only by the call that ended the game.
    pub exposed_mines: Vec<Coord2>,
    pub outcome: Outcome,
}

impl ChangeSet {
    pub(crate) fn unchanged(outcome: Outcome) -> Self {
        Self {
            outcome,
            ..Default::default()
        }
    }

    /// Whether this change could have caused an update to the view.
    pub fn has_update(&self) -> bool {
        !self.changed.is_empty() || !self.exposed_mines.is_empty()
    }
}
