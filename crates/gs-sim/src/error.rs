//! Error types for gs-sim.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use gs_agent::AgentError;
use gs_core::{AgentId, CoreError};
use gs_mobility::MobilityError;
use gs_spatial::SpatialError;

/// Why one user could not be simulated.
#[derive(Debug, Error)]
pub enum AgentFailure {
    #[error("anchor assignment failed: {0}")]
    Anchors(#[from] AgentError),

    #[error("simulation of {day} failed: {source}")]
    Day {
        day:    NaiveDate,
        #[source]
        source: MobilityError,
    },
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("cannot read {path}: {source}")]
    ReadConfig {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("unknown network `{0}`")]
    UnknownNetwork(String),

    #[error("network `{name}`: {source}")]
    Network {
        name:   String,
        #[source]
        source: SpatialError,
    },

    #[error("profile `{profile}`, {agent}: {source}")]
    Agent {
        profile: String,
        agent:   AgentId,
        #[source]
        source:  AgentFailure,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
