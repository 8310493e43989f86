use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("cannot open {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("row decode failed: {0}")]
    Decode(#[source] rusqlite::Error),

    #[error("CSV write failed: {0}")]
    Write(#[from] csv::Error),

    #[error("timestamp {secs}s is outside the representable date range")]
    TimestampRange { secs: i64 },

    #[error("cannot interpolate an empty batch")]
    EmptyBatch,

    #[error("config error: {0}")]
    Config(String),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ExtractError {
    pub fn access(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Access {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
