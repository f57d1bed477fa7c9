//! Error types for Preparar

use thiserror::Error;

use crate::resolve::ResolveError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config file {path}: {source}")]
    ReadConfig {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    ParseConfig(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

pub type Result<T> = std::result::Result<T, Error>;
