//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The error type for `gs-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed date ranges, non-positive speeds or radii, bad CRS codes.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported EPSG code {0}: expected a WGS-84 UTM zone (326zz or 327zz)")]
    UnsupportedEpsg(u32),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `gs-core`.
pub type CoreResult<T> = Result<T, CoreError>;
