//! A user's persistent locations.

use gs_core::LocationId;
use gs_spatial::{CatalogPair, SpatialResult};

use crate::{AgentError, AgentResult};

/// Fewest regular destinations a user is given.
pub const MIN_REGULAR: usize = 3;
/// Most regular destinations a user is given.
pub const MAX_REGULAR: usize = 5;

/// Home, work and regular destinations of one user.
///
/// `home` and `work` index the home/work catalog, `regular` indexes the
/// event catalog.  Assigned once and never changed.
///
/// # Invariants (checked by [`Anchors::new`])
///
/// - `home != work`;
/// - `regular` holds `MIN_REGULAR..=MAX_REGULAR` pairwise distinct ids;
/// - no regular id equals `home` or `work`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchors {
    home:    LocationId,
    work:    LocationId,
    regular: Vec<LocationId>,
}

impl Anchors {
    pub fn new(home: LocationId, work: LocationId, regular: Vec<LocationId>) -> AgentResult<Self> {
        if home == work {
            return Err(AgentError::InvalidAnchors(format!("home and work are both {home}")));
        }
        if !(MIN_REGULAR..=MAX_REGULAR).contains(&regular.len()) {
            return Err(AgentError::InvalidAnchors(format!(
                "{} regular locations, expected {MIN_REGULAR}..={MAX_REGULAR}",
                regular.len()
            )));
        }
        for (i, r) in regular.iter().enumerate() {
            if *r == home || *r == work {
                return Err(AgentError::InvalidAnchors(format!("regular location {r} repeats home or work")));
            }
            if regular[..i].contains(r) {
                return Err(AgentError::InvalidAnchors(format!("regular location {r} listed twice")));
            }
        }
        Ok(Self { home, work, regular })
    }

    pub fn home(&self) -> LocationId {
        self.home
    }

    pub fn work(&self) -> LocationId {
        self.work
    }

    pub fn regular(&self) -> &[LocationId] {
        &self.regular
    }

    /// External ids `(home, work, regular)` for metadata export.
    pub fn external_ids(&self, catalogs: &CatalogPair) -> SpatialResult<(i64, i64, Vec<i64>)> {
        let home = catalogs.home_work.entry(self.home)?.external_id;
        let work = catalogs.home_work.entry(self.work)?.external_id;
        let regular = self
            .regular
            .iter()
            .map(|&r| catalogs.events.entry(r).map(|e| e.external_id))
            .collect::<SpatialResult<Vec<_>>>()?;
        Ok((home, work, regular))
    }
}
