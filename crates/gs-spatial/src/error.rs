//! Spatial-subsystem error type.

use thiserror::Error;

use gs_core::{CoreError, LocationId, NodeId};

/// Errors produced by `gs-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("location {0} not found in catalog")]
    LocationNotFound(LocationId),

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge { from: NodeId, to: NodeId, reason: String },

    #[error("interpolation needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("cannot interpolate along an empty path")]
    EmptyPath,

    /// The disk/disk/corridor intersection used for noisy points is empty
    /// or too thin to hit by rejection sampling.
    #[error(
        "degenerate sample region: segment {length:.3} m, radius {radius:.3} m, proximity {proximity:.3} m"
    )]
    DegenerateSampleRegion { length: f64, radius: f64, proximity: f64 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
