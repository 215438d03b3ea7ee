//! `gs-sim` — population runner for the gps_synth generator.
//!
//! # Run loop
//!
//! ```text
//! build every configured network once (NetworkRegistry)
//! for profile in config.profiles:
//!   for batch of users (AGENT_BATCH, parallel with the `parallel` feature):
//!     assign anchors                        (gs-agent)
//!     for day in date range:
//!       itinerary → day plan → samples      (gs-schedule, gs-mobility)
//!       the returned clock starts the next day
//!   report users to the observer in ascending AgentId order
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Simulates each batch of users on Rayon's thread pool.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gs_sim::{NoopObserver, RunConfig, SimBuilder};
//!
//! let config = RunConfig::load(Path::new("run.toml"))?;
//! let sim = SimBuilder::new(config).build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod registry;
pub mod sim;


pub use builder::SimBuilder;
pub use config::{
    CrsConfig, FailurePolicy, NetworkConfig, NetworkSource, OutputConfig, OutputFormat, ProfileConfig, RunConfig,
};
pub use error::{AgentFailure, SimError, SimResult};
pub use observer::{AgentReport, NoopObserver, RunObserver};
pub use registry::{NetworkEntry, NetworkRegistry};
pub use sim::{AGENT_BATCH, ProfileSummary, RunSummary, Sim};
