//! Per-user trajectory buffer.

use gs_core::{AgentId, GeoPoint, Timestamp, TrajectorySample};

/// Append-only samples of one user, in emission order.
///
/// Owned by whichever worker simulates the user; never shared.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryBuffer {
    agent:   AgentId,
    samples: Vec<TrajectorySample>,
}

impl TrajectoryBuffer {
    pub fn new(agent: AgentId) -> Self {
        Self { agent, samples: Vec::new() }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    /// Append one sample.  `timestamp` must already be quantized and not
    /// precede the previous sample.
    pub fn push(&mut self, timestamp: Timestamp, pos: GeoPoint) {
        debug_assert!(
            self.samples.last().is_none_or(|s| s.timestamp <= timestamp),
            "{}: sample at {timestamp} precedes the previous one",
            self.agent
        );
        self.samples.push(TrajectorySample::new(self.agent, timestamp, pos));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.samples.last().map(|s| s.timestamp)
    }

    pub fn into_samples(self) -> Vec<TrajectorySample> {
        self.samples
    }
}
