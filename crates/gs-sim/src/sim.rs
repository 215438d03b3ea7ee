//! The `Sim` struct and its population loop.

use gs_agent::{Agent, AgentConfig, RetryLimits};
use gs_core::{AgentId, AgentRng, TrajectorySample};
use gs_mobility::{DaySimulator, TrajectoryBuffer};
use gs_spatial::{CatalogPair, Router};

use crate::config::{FailurePolicy, ProfileConfig};
use crate::error::AgentFailure;
use crate::observer::AgentReport;
use crate::{NetworkRegistry, RunObserver, SimError, SimResult};

/// Users simulated between two deliveries to the observer.  Bounds the
/// number of trajectories held in memory at once.
pub const AGENT_BATCH: usize = 256;

// ── Summaries ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    pub name:    String,
    /// Users simulated successfully.
    pub agents:  u32,
    /// Users dropped under the `skip` policy.
    pub failed:  u32,
    pub samples: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub profiles: Vec<ProfileSummary>,
}

impl RunSummary {
    pub fn agents(&self) -> u64 {
        self.profiles.iter().map(|p| p.agents as u64).sum()
    }

    pub fn failed(&self) -> u64 {
        self.profiles.iter().map(|p| p.failed as u64).sum()
    }

    pub fn samples(&self) -> u64 {
        self.profiles.iter().map(|p| p.samples).sum()
    }
}

/// One user's finished simulation.
struct AgentOutput {
    agent:   Agent,
    samples: Vec<TrajectorySample>,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The population runner.
///
/// For each profile, in configuration order: resolve its network, then for
/// every user assign anchors and simulate each day of the date range, the
/// clock returned by one day starting the next.
///
/// User ids are unique across the whole run: the first profile's users are
/// numbered from 0, each later profile continues where the previous one
/// stopped.  Each user draws from its own [`AgentRng`] seeded by the run
/// seed and its id, so results do not depend on scheduling.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router + Clone> {
    pub seed:     u64,
    pub profiles: Vec<ProfileConfig>,
    pub registry: NetworkRegistry,
    pub router:   R,
}

impl<R: Router + Clone> Sim<R> {
    /// Simulate every profile, reporting to `observer` as users finish.
    ///
    /// Fails on the first user failure of a profile whose failure policy is
    /// `abort`; users of `skip` profiles are logged, reported through
    /// [`RunObserver::on_agent_failed`] and left out.
    pub fn run<O: RunObserver>(&self, observer: &mut O) -> SimResult<RunSummary> {
        for entry in self.registry.iter() {
            observer.on_network(entry);
        }

        let mut summary = RunSummary::default();
        let mut next_id = 0u32;
        for profile in &self.profiles {
            let first = AgentId(next_id);
            next_id += profile.num_users;
            let done = self.run_profile(profile, first, observer)?;
            observer.on_profile_end(&done);
            summary.profiles.push(done);
        }

        log::info!(
            "run complete: {} users simulated, {} skipped, {} samples",
            summary.agents(),
            summary.failed(),
            summary.samples()
        );
        observer.on_run_end(&summary);
        Ok(summary)
    }

    fn run_profile<O: RunObserver>(
        &self,
        profile: &ProfileConfig,
        first: AgentId,
        observer: &mut O,
    ) -> SimResult<ProfileSummary> {
        let config = profile.agent_config()?;
        let entry = self.registry.get(&profile.network)?;
        let sim = DaySimulator::new(&entry.network, self.router.clone(), &config.profile, profile.limits);

        log::info!(
            "profile `{}`: {} users on `{}`, {} to {}",
            profile.name,
            profile.num_users,
            entry.name,
            config.dates.first(),
            config.dates.last()
        );
        observer.on_profile_start(profile, first);

        let mut summary = ProfileSummary { name: profile.name.clone(), ..Default::default() };
        let ids: Vec<AgentId> = (first.0..first.0 + profile.num_users).map(AgentId).collect();

        for batch in ids.chunks(AGENT_BATCH) {
            let outcomes = self.simulate_batch(&sim, &config, &entry.catalogs, &profile.limits, batch);

            for (id, outcome) in outcomes {
                match outcome {
                    Ok(out) => {
                        summary.agents += 1;
                        summary.samples += out.samples.len() as u64;
                        observer.on_agent(&AgentReport {
                            profile:  &profile.name,
                            network:  &entry.name,
                            agent:    &out.agent,
                            catalogs: &entry.catalogs,
                            samples:  &out.samples,
                        });
                    }
                    Err(source) => match profile.on_failure {
                        FailurePolicy::Abort => {
                            return Err(SimError::Agent { profile: profile.name.clone(), agent: id, source });
                        }
                        FailurePolicy::Skip => {
                            log::warn!("profile `{}`: skipping {id}: {source}", profile.name);
                            summary.failed += 1;
                            observer.on_agent_failed(&profile.name, id, &source);
                        }
                    },
                }
            }
        }

        log::info!(
            "profile `{}`: {} users, {} skipped, {} samples",
            summary.name,
            summary.agents,
            summary.failed,
            summary.samples
        );
        Ok(summary)
    }

    /// Simulate `ids`, returning outcomes in the order of `ids`.
    ///
    /// With the `parallel` Cargo feature the users run on Rayon's thread
    /// pool; each owns its RNG and trajectory buffer.
    fn simulate_batch(
        &self,
        sim: &DaySimulator<'_, R>,
        config: &AgentConfig,
        catalogs: &CatalogPair,
        limits: &RetryLimits,
        ids: &[AgentId],
    ) -> Vec<(AgentId, Result<AgentOutput, AgentFailure>)> {
        let seed = self.seed;

        #[cfg(not(feature = "parallel"))]
        {
            ids.iter()
                .map(|&id| (id, simulate_agent(sim, config, catalogs, limits, seed, id)))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            ids.par_iter()
                .map(|&id| (id, simulate_agent(sim, config, catalogs, limits, seed, id)))
                .collect()
        }
    }
}

/// Assign anchors to one user and simulate its whole date range.
fn simulate_agent<R: Router>(
    sim: &DaySimulator<'_, R>,
    config: &AgentConfig,
    catalogs: &CatalogPair,
    limits: &RetryLimits,
    seed: u64,
    id: AgentId,
) -> Result<AgentOutput, AgentFailure> {
    let mut rng = AgentRng::new(seed, id);
    let agent = Agent::initialize(id, &config.policy, sim.network(), catalogs, &mut rng, limits)?;

    let mut buffer = TrajectoryBuffer::new(id);
    let mut clock = config.dates.start();
    for day in config.dates.days() {
        clock = sim
            .run_day(clock, day, &agent.anchors, catalogs, &mut rng, &mut buffer)
            .map_err(|source| AgentFailure::Day { day, source })?;
    }

    log::debug!("{id}: {} samples over {} days", buffer.len(), config.dates.len_days());
    Ok(AgentOutput { agent, samples: buffer.into_samples() })
}
