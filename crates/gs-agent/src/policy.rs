//! Anchor-selection policies.
//!
//! Two strategies choose a user's home, work and regular destinations:
//!
//! | Policy                 | Work                                  | Regular destinations                     |
//! |------------------------|---------------------------------------|------------------------------------------|
//! | [`BufferContainment`]  | inside a buffer around home           | inside a (growing) buffer around home    |
//! | [`MinimumDistance`]    | at least `min_home_work` from home    | at least `min_work_regular` from work    |
//!
//! Both are randomised searches.  Every loop is capped by [`RetryLimits`];
//! running out of attempts yields [`AgentError::InsufficientCandidates`].
//!
//! # Extensibility
//!
//! [`AnchorSelector`] is the seam: [`AnchorPolicy`] dispatches to the two
//! built-in strategies, and callers may supply their own implementation.

use geo::EuclideanDistance;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gs_core::{AgentRng, CoreError, CoreResult, LocationId};
use gs_spatial::{CatalogPair, DEFAULT_MAX_SAMPLE_ATTEMPTS, LocationCatalog, LocationEntry, StreetNetwork};

use crate::anchors::{MAX_REGULAR, MIN_REGULAR};
use crate::{AgentError, AgentResult, Anchors};

// ── RetryLimits ───────────────────────────────────────────────────────────────

/// Caps on every randomised search performed for one user.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RetryLimits {
    /// Home draws (buffer policy) or home/work pair draws (distance policy).
    pub max_home_draws:      u32,
    /// Draws for the work location and for each regular destination,
    /// radius growth steps included.
    pub max_candidate_draws: u32,
    /// Rejection-sampling draws per noisy point.
    pub max_sample_attempts: u32,
}

impl Default for RetryLimits {
    fn default() -> Self {
        Self {
            max_home_draws:      1_000,
            max_candidate_draws: 10_000,
            max_sample_attempts: DEFAULT_MAX_SAMPLE_ATTEMPTS,
        }
    }
}

impl RetryLimits {
    /// Every cap must allow at least one attempt; a zero cap would fail
    /// every user of the profile.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, cap) in [
            ("max_home_draws", self.max_home_draws),
            ("max_candidate_draws", self.max_candidate_draws),
            ("max_sample_attempts", self.max_sample_attempts),
        ] {
            if cap == 0 {
                return Err(CoreError::InvalidConfiguration(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

// ── AnchorSelector ────────────────────────────────────────────────────────────

/// Chooses the anchors of one user.
///
/// Implementations must draw randomness only from `rng` so that a user's
/// anchors depend on nothing but the run seed and its id.
pub trait AnchorSelector: Send + Sync {
    fn select(
        &self,
        network: &StreetNetwork,
        catalogs: &CatalogPair,
        rng: &mut AgentRng,
        limits: &RetryLimits,
    ) -> AgentResult<Anchors>;
}

// ── AnchorPolicy ──────────────────────────────────────────────────────────────

/// The built-in policies, selectable from configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum AnchorPolicy {
    BufferContainment(BufferContainment),
    MinimumDistance(MinimumDistance),
}

impl AnchorPolicy {
    pub fn validate(&self) -> CoreResult<()> {
        let bad = |msg: String| Err(CoreError::InvalidConfiguration(msg));
        match self {
            AnchorPolicy::BufferContainment(p) => {
                if !(p.radius_home_work > 0.0 && p.radius_home_regular > 0.0) {
                    return bad(format!(
                        "buffer radii must be positive, got {} / {}",
                        p.radius_home_work, p.radius_home_regular
                    ));
                }
                if !(p.radius_increment > 0.0) {
                    return bad(format!("radius increment must be positive, got {}", p.radius_increment));
                }
                if p.min_candidates == 0 {
                    return bad("min_candidates must be at least 1".to_owned());
                }
            }
            AnchorPolicy::MinimumDistance(p) => {
                let ok = |d: f64| d.is_finite() && d >= 0.0;
                if !(ok(p.min_home_work) && ok(p.min_work_regular)) {
                    return bad(format!(
                        "minimum distances must be finite and non-negative, got {} / {}",
                        p.min_home_work, p.min_work_regular
                    ));
                }
            }
        }
        Ok(())
    }
}

impl AnchorSelector for AnchorPolicy {
    fn select(
        &self,
        network: &StreetNetwork,
        catalogs: &CatalogPair,
        rng: &mut AgentRng,
        limits: &RetryLimits,
    ) -> AgentResult<Anchors> {
        match self {
            AnchorPolicy::BufferContainment(p) => p.select(network, catalogs, rng, limits),
            AnchorPolicy::MinimumDistance(p) => p.select(network, catalogs, rng, limits),
        }
    }
}

// ── BufferContainment ─────────────────────────────────────────────────────────

/// Work and regular destinations lie strictly inside buffers around home.
///
/// A home is only kept if at least `min_candidates` home/work locations lie
/// in its work buffer; otherwise a new home is drawn.  If the regular buffer
/// holds fewer than `min_candidates` events, its radius grows by
/// `radius_increment` until it does or until it already covers the whole
/// event catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferContainment {
    pub radius_home_work:    f64,
    pub radius_home_regular: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_min_candidates"))]
    pub min_candidates:      usize,
    #[cfg_attr(feature = "serde", serde(default = "default_radius_increment"))]
    pub radius_increment:    f64,
}

fn default_min_candidates() -> usize {
    20
}

fn default_radius_increment() -> f64 {
    100.0
}

impl BufferContainment {
    pub fn new(radius_home_work: f64, radius_home_regular: f64) -> Self {
        Self {
            radius_home_work,
            radius_home_regular,
            min_candidates: default_min_candidates(),
            radius_increment: default_radius_increment(),
        }
    }

    fn pick_home_and_work(
        &self,
        hw: &LocationCatalog,
        rng: &mut AgentRng,
        limits: &RetryLimits,
    ) -> AgentResult<(LocationId, LocationId)> {
        for _ in 0..limits.max_home_draws {
            let home = random_id(hw, rng, "home")?;
            let centroid = hw.entry(home)?.centroid;
            let candidates = hw.within(centroid, self.radius_home_work);
            if candidates.len() < self.min_candidates {
                continue;
            }
            let others: Vec<LocationId> = candidates.into_iter().filter(|&c| c != home).collect();
            if let Some(&work) = rng.choose(&others) {
                return Ok((home, work));
            }
        }
        Err(AgentError::InsufficientCandidates { what: "work", attempts: limits.max_home_draws })
    }
}

impl AnchorSelector for BufferContainment {
    fn select(
        &self,
        _network: &StreetNetwork,
        catalogs: &CatalogPair,
        rng: &mut AgentRng,
        limits: &RetryLimits,
    ) -> AgentResult<Anchors> {
        let (hw, events) = (&catalogs.home_work, &catalogs.events);
        let (home, work) = self.pick_home_and_work(hw, rng, limits)?;

        let center = hw.entry(home)?.centroid;
        // Beyond this radius the buffer already holds every event.
        let reach = events
            .iter()
            .map(|e| e.centroid.euclidean_distance(&center))
            .fold(0.0, f64::max);

        let k = rng.gen_range(MIN_REGULAR..=MAX_REGULAR);
        let mut regular: Vec<LocationId> = Vec::with_capacity(k);
        let mut radius = self.radius_home_regular;
        let mut candidates = events.within(center, radius);
        let mut attempts = 0u32;

        while regular.len() < k {
            if attempts >= limits.max_candidate_draws {
                return Err(AgentError::InsufficientCandidates {
                    what:     "regular locations",
                    attempts,
                });
            }
            attempts += 1;

            let eligible: Vec<LocationId> = candidates
                .iter()
                .copied()
                .filter(|c| *c != home && *c != work && !regular.contains(c))
                .collect();

            if candidates.len() < self.min_candidates || eligible.is_empty() {
                if radius > reach {
                    return Err(AgentError::InsufficientCandidates {
                        what:     "regular locations",
                        attempts,
                    });
                }
                radius += self.radius_increment;
                candidates = events.within(center, radius);
                log::debug!("regular buffer grown to {radius:.0} m ({} events)", candidates.len());
                continue;
            }

            if let Some(&r) = rng.choose(&eligible) {
                regular.push(r);
            }
        }

        Anchors::new(home, work, regular)
    }
}

// ── MinimumDistance ───────────────────────────────────────────────────────────

/// Work lies at least `min_home_work` from home and every regular
/// destination at least `min_work_regular` from work.
///
/// Distances run from node to node plus each location's snapping offset,
/// so they approximate the walk through the street graph's endpoints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MinimumDistance {
    pub min_home_work:    f64,
    pub min_work_regular: f64,
}

impl MinimumDistance {
    pub fn new(min_home_work: f64, min_work_regular: f64) -> Self {
        Self { min_home_work, min_work_regular }
    }
}

fn offset_distance(network: &StreetNetwork, a: &LocationEntry, b: &LocationEntry) -> AgentResult<f64> {
    let pa = network.position(a.nearest_node)?;
    let pb = network.position(b.nearest_node)?;
    Ok(pa.euclidean_distance(&pb) + a.distance_to_node + b.distance_to_node)
}

impl AnchorSelector for MinimumDistance {
    fn select(
        &self,
        network: &StreetNetwork,
        catalogs: &CatalogPair,
        rng: &mut AgentRng,
        limits: &RetryLimits,
    ) -> AgentResult<Anchors> {
        let (hw, events) = (&catalogs.home_work, &catalogs.events);

        let mut pair = None;
        for _ in 0..limits.max_home_draws {
            let home = random_id(hw, rng, "home")?;
            let work = random_id(hw, rng, "work")?;
            if home == work {
                continue;
            }
            if offset_distance(network, hw.entry(home)?, hw.entry(work)?)? >= self.min_home_work {
                pair = Some((home, work));
                break;
            }
        }
        let (home, work) = pair.ok_or(AgentError::InsufficientCandidates {
            what:     "home/work pair",
            attempts: limits.max_home_draws,
        })?;

        let work_entry = hw.entry(work)?;
        let k = rng.gen_range(MIN_REGULAR..=MAX_REGULAR);
        let mut regular: Vec<LocationId> = Vec::with_capacity(k);
        let mut attempts = 0u32;

        while regular.len() < k {
            if attempts >= limits.max_candidate_draws {
                return Err(AgentError::InsufficientCandidates {
                    what:     "regular locations",
                    attempts,
                });
            }
            attempts += 1;

            let r = random_id(events, rng, "regular locations")?;
            if r == home || r == work || regular.contains(&r) {
                continue;
            }
            if offset_distance(network, events.entry(r)?, work_entry)? >= self.min_work_regular {
                regular.push(r);
            }
        }

        Anchors::new(home, work, regular)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn random_id(catalog: &LocationCatalog, rng: &mut AgentRng, what: &'static str) -> AgentResult<LocationId> {
    rng.index(catalog.len())
        .map(|i| LocationId(i as u32))
        .ok_or(AgentError::InsufficientCandidates { what, attempts: 0 })
}
