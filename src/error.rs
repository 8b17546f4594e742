// ⚠️ Errors - fatal failures only
// Malformed input records are `Rejection` values, not errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("percentile file does not hold an integer: {raw:?}")]
    InvalidPercentile { raw: String },

    #[error("percentile {0} is outside 1..=100")]
    PercentileOutOfRange(String),

    #[error("failed to write run summary: {0}")]
    Summary(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyticsError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
