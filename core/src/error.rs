use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates outside of the playable domain")]
    OutOfDomain,
    #[error("Cell already revealed")]
    AlreadyRevealed,
    #[error("Game already ended, no new moves are accepted")]
    GameEnded,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;
