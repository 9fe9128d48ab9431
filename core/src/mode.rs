use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::*;

static PRESETS: [(&str, Mode); 3] = [
    ("easy", Mode::EASY),
    ("normal", Mode::NORMAL),
    ("hard", Mode::HARD),
];

/// Board dimensions and mine count for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub name: Cow<'static, str>,
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl Mode {
    pub const DEFAULT_KEY: &'static str = "easy";

    pub const EASY: Mode = Mode::preset("Easy", 9, 9, 10);
    pub const NORMAL: Mode = Mode::preset("Normal", 16, 16, 40);
    pub const HARD: Mode = Mode::preset("Hard", 30, 16, 99);

    const fn preset(name: &'static str, width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            name: Cow::Borrowed(name),
            width,
            height,
            mines,
        }
    }

    /// Builds a custom mode, rejecting empty boards and boards that cannot hold every mine.
    pub fn custom(
        name: impl Into<Cow<'static, str>>,
        width: Coord,
        height: Coord,
        mines: CellCount,
    ) -> Result<Self> {
        let mode = Self {
            name: name.into(),
            width,
            height,
            mines,
        };
        mode.validate()?;
        Ok(mode)
    }

    /// Registered presets in menu order, keyed by their lookup name.
    pub fn presets() -> &'static [(&'static str, Mode)] {
        &PRESETS
    }

    pub fn from_key(key: &str) -> Result<Self> {
        PRESETS
            .iter()
            .find(|(preset_key, _)| *preset_key == key)
            .map(|(_, mode)| mode.clone())
            .ok_or_else(|| GameError::UnknownMode(key.into()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.mines > self.total_cells() {
            Err(GameError::InvalidMode)
        } else {
            Ok(())
        }
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_cells(&self) -> CellCount {
        self.width as CellCount * self.height as CellCount
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        x < self.width && y < self.height
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// Row-major key of a cell, `y * width + x`.
    pub fn linear_index(&self, (x, y): Coord2) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::EASY
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mode ({} x {}, {} mines)",
            self.name, self.width, self.height, self.mines
        )
    }
}
