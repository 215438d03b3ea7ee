//! Agent-subsystem error type.

use thiserror::Error;

use gs_core::CoreError;
use gs_spatial::SpatialError;

/// Errors produced by `gs-agent`.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A bounded candidate search ran out of attempts.
    #[error("insufficient candidates for {what} after {attempts} attempts")]
    InsufficientCandidates { what: &'static str, attempts: u32 },

    /// An anchor set violates the home/work/regular distinctness rules.
    #[error("invalid anchors: {0}")]
    InvalidAnchors(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AgentResult<T> = Result<T, AgentError>;
