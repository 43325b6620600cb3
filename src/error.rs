use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the simulation harness: configuration loading and export.
///
/// The controller itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tuning file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid plant: {0}")]
    InvalidPlant(String),

    #[error("invalid simulation settings: {0}")]
    InvalidSim(String),
}

pub type Result<T> = std::result::Result<T, Error>;
