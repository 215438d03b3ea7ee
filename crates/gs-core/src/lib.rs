//! `gs-core` — foundational types for the `gps_synth` trajectory generator.
//!
//! This crate is a dependency of every other `gs-*` crate.  It has no `gs-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`, `EdgeId`, `LocationId`               |
//! | [`coord`]   | `GeoPoint` (WGS-84), projected `Point`, haversine         |
//! | [`crs`]     | `Crs`: projected ⇄ geographic transforms                  |
//! | [`time`]    | `DayKind`, `DateRange`, `SimClock`, second quantization   |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (global)                 |
//! | [`sample`]  | `TrajectorySample`                                        |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `GeoPoint`.      |

pub mod coord;
pub mod crs;
pub mod error;
pub mod ids;
pub mod rng;
pub mod sample;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::{GeoPoint, Point};
pub use crs::Crs;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, EdgeId, LocationId, NodeId};
pub use rng::{AgentRng, SimRng};
pub use sample::TrajectorySample;
pub use time::{DateRange, DayKind, SimClock, Timestamp, quantize};
