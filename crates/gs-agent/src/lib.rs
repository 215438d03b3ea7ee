//! `gs-agent` — synthetic users and the locations they are anchored to.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`anchors`] | `Anchors` (home, work, regular destinations)                  |
//! | [`policy`]  | `AnchorSelector` trait, `AnchorPolicy`, `RetryLimits`         |
//! | [`profile`] | `MobilityProfile`, `ScheduleRules`, `ItineraryWeights`        |
//! | [`config`]  | `AgentConfig` (date range + profile + policy), validation     |
//! | [`agent`]   | `Agent` (id + anchors), initialisation                        |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on profiles and policies.  |

pub mod agent;
pub mod anchors;
pub mod config;
pub mod error;
pub mod policy;
pub mod profile;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use anchors::Anchors;
pub use config::AgentConfig;
pub use error::{AgentError, AgentResult};
pub use policy::{AnchorPolicy, AnchorSelector, BufferContainment, MinimumDistance, RetryLimits};
pub use profile::{HourRange, ItineraryWeights, MobilityProfile, ScheduleRules};
