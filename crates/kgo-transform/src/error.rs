use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a transformation run.
///
/// Everything recoverable (malformed payloads, unknown node kinds, unknown
/// relation types) is handled where it occurs and never surfaces here.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl TransformError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
