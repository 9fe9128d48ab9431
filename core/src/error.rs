use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid mode: board must be non-empty and hold every mine")]
    InvalidMode,
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Unknown mode \"{0}\"")]
    UnknownMode(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
