//! Run observer trait for progress reporting and data collection.

use gs_agent::Agent;
use gs_core::{AgentId, TrajectorySample};
use gs_spatial::CatalogPair;

use crate::config::ProfileConfig;
use crate::error::AgentFailure;
use crate::registry::NetworkEntry;
use crate::sim::{ProfileSummary, RunSummary};

/// One simulated user, as handed to [`RunObserver::on_agent`].
#[derive(Copy, Clone, Debug)]
pub struct AgentReport<'a> {
    pub profile:  &'a str,
    pub network:  &'a str,
    pub agent:    &'a Agent,
    /// Catalogs the agent's anchors index into.
    pub catalogs: &'a CatalogPair,
    /// The user's whole trajectory, timestamps non-decreasing.
    pub samples:  &'a [TrajectorySample],
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Users are reported in ascending
/// `AgentId` order whether or not the `parallel` feature is on, so writing
/// samples as they arrive yields output sorted by `(user, timestamp)`.
///
/// # Example: sample counter
///
/// ```rust,ignore
/// struct Counter(usize);
///
/// impl RunObserver for Counter {
///     fn on_agent(&mut self, report: &AgentReport<'_>) {
///         self.0 += report.samples.len();
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called once per network before any profile runs.
    fn on_network(&mut self, _entry: &NetworkEntry) {}

    /// Called before the first user of a profile.  `first` is the id of
    /// that user; the profile's ids are contiguous from there.
    fn on_profile_start(&mut self, _profile: &ProfileConfig, _first: AgentId) {}

    /// Called once per successfully simulated user.
    fn on_agent(&mut self, _report: &AgentReport<'_>) {}

    /// Called for a user dropped under the `skip` failure policy.
    fn on_agent_failed(&mut self, _profile: &str, _agent: AgentId, _error: &AgentFailure) {}

    fn on_profile_end(&mut self, _summary: &ProfileSummary) {}

    /// Called once after the last profile completes.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
