//! Per-user configuration.

use gs_core::{CoreResult, DateRange};

use crate::{AnchorPolicy, MobilityProfile};

/// Everything needed to initialise and simulate one user.
///
/// Users of the same profile share one `AgentConfig`.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    pub dates:   DateRange,
    pub profile: MobilityProfile,
    pub policy:  AnchorPolicy,
}

impl AgentConfig {
    pub fn new(dates: DateRange, profile: MobilityProfile, policy: AnchorPolicy) -> Self {
        Self { dates, profile, policy }
    }

    /// Fails with `InvalidConfiguration` on non-positive speeds, radii or
    /// proximities and on malformed schedule rules.  Date ranges are
    /// validated when constructed.
    pub fn validate(&self) -> CoreResult<()> {
        self.profile.validate()?;
        self.policy.validate()
    }
}
