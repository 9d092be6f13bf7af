//! Error type shared by the pipeline stages.

use thiserror::Error;

/// Failures that abort pipeline construction.
///
/// Missing or unparseable field values are not errors; they become `None`
/// in the cleaned table and are counted in [`crate::stats::CleaningStats`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("view {index} does not exist (dashboard has {count} views)")]
    ViewIndex { index: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
