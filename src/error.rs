use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("dataset must be a JSON array of records")]
    NotAnArray,

    #[error("unknown dataset '{name}' (looked in {dir:?})")]
    UnknownDataset { name: String, dir: PathBuf },

    #[error("unknown field filter '{0}' (expected all, filename, keywords or content)")]
    InvalidFilter(String),

    #[error("unknown difficulty '{0}' (expected level1..level4)")]
    InvalidDifficulty(String),
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}
