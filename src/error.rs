use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing placer files (catalogs, templates, preferences).
#[derive(Debug, Error)]
pub enum PlacerError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
}

pub type PlacerResult<T> = Result<T, PlacerError>;
