//! A synthetic user.

use gs_core::{AgentId, AgentRng};
use gs_spatial::{CatalogPair, StreetNetwork};

use crate::{AgentResult, AnchorSelector, Anchors, RetryLimits};

/// One user: an id and its fixed anchors.
///
/// The trajectory is not stored here; the day simulator appends samples to
/// a separate buffer so that agents can be read while trajectories grow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub id:      AgentId,
    pub anchors: Anchors,
}

impl Agent {
    /// Create a user and choose its anchors with `selector`.
    pub fn initialize(
        id: AgentId,
        selector: &dyn AnchorSelector,
        network: &StreetNetwork,
        catalogs: &CatalogPair,
        rng: &mut AgentRng,
        limits: &RetryLimits,
    ) -> AgentResult<Self> {
        let anchors = selector.select(network, catalogs, rng, limits)?;
        log::debug!(
            "{id}: home {}, work {}, {} regular locations",
            anchors.home(),
            anchors.work(),
            anchors.regular().len()
        );
        Ok(Self { id, anchors })
    }
}
