//! Error types for gs-output.

use thiserror::Error;

use gs_sim::OutputFormat;
use gs_spatial::SpatialError;

/// Errors that can occur when writing generator output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("output format `{0}` is not compiled in (enable the `{0}` feature)")]
    FormatUnavailable(OutputFormat),

    #[error("cannot resolve user anchors: {0}")]
    Anchors(#[from] SpatialError),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
