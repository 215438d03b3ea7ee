//! Seeded random streams for users and run-level setup.
//!
//! A run has one master seed.  Everything random is drawn from a stream
//! derived from it:
//!
//! - [`AgentRng`]: one per user, keyed by [`AgentId`].  Anchors,
//!   itineraries, stay lengths and GPS noise of a user come from its own
//!   stream only, so the order in which users are simulated (or the thread
//!   they run on) never changes their output.
//! - [`SimRng`]: network setup.  [`SimRng::child`] hands each network (and
//!   each catalog of a synthetic network) a separate stream.
//!
//! Stream seeds go through the SplitMix64 finaliser so that neighbouring
//! ids and offsets land far apart in `SmallRng`'s seed space.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// Seed of stream `stream` under `base`.
fn stream_seed(base: u64, stream: u64) -> u64 {
    let mut z = base ^ stream.wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// The draws shared by both stream types.
macro_rules! draws {
    ($name:ident) => {
        impl $name {
            #[inline]
            pub fn gen_range<T, R>(&mut self, range: R) -> T
            where
                T: SampleUniform,
                R: SampleRange<T>,
            {
                self.rng.gen_range(range)
            }

            /// `true` with probability `p`, clamped to `[0, 1]`.
            #[inline]
            pub fn gen_bool(&mut self, p: f64) -> bool {
                self.rng.gen_bool(p.clamp(0.0, 1.0))
            }

            /// A position in `0..len`; `None` for `len == 0`.
            #[inline]
            pub fn index(&mut self, len: usize) -> Option<usize> {
                (len > 0).then(|| self.rng.gen_range(0..len))
            }

            #[inline]
            pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
                items.choose(&mut self.rng)
            }

            /// A position drawn with probability proportional to its weight.
            ///
            /// `None` for empty, negative or all-zero weights.
            pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
                let dist = WeightedIndex::new(weights).ok()?;
                Some(dist.sample(&mut self.rng))
            }
        }
    };
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// The random stream of one user.
///
/// Created by the worker that simulates the user and dropped with it.
pub struct AgentRng {
    rng: SmallRng,
}

impl AgentRng {
    pub fn new(run_seed: u64, agent: AgentId) -> Self {
        Self { rng: SmallRng::seed_from_u64(stream_seed(run_seed, agent.0 as u64)) }
    }
}

draws!(AgentRng);

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Random stream for building networks and scattering synthetic locations.
pub struct SimRng {
    seed: u64,
    rng:  SmallRng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, rng: SmallRng::seed_from_u64(seed) }
    }

    /// Independent stream number `stream`.  Depends only on this stream's
    /// seed, not on how much of it has been consumed.
    pub fn child(&self, stream: u64) -> SimRng {
        SimRng::new(stream_seed(self.seed, stream))
    }
}

draws!(SimRng);
