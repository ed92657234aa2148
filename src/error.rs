use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("could not read config '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("level at depth {depth} has no free tile to place the player")]
    NoSpawnPoint { depth: u32 },

    #[error("could not read input script '{path}': {source}")]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not start logger: {0}")]
    Logger(String),
}

pub type GameResult<T> = Result<T, GameError>;
