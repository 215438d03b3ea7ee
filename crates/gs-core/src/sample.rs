//! The unit of output: one GPS fix of one user.

use crate::{AgentId, GeoPoint, Timestamp};

/// A single synthetic GPS fix in WGS-84.
///
/// Within one user's trajectory, `timestamp` never decreases, across day
/// boundaries included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrajectorySample {
    pub agent:     AgentId,
    /// Always a whole second (see [`crate::quantize`]).
    pub timestamp: Timestamp,
    pub lon:       f64,
    pub lat:       f64,
}

impl TrajectorySample {
    #[inline]
    pub fn new(agent: AgentId, timestamp: Timestamp, pos: GeoPoint) -> Self {
        Self { agent, timestamp, lon: pos.lon, lat: pos.lat }
    }

    #[inline]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}
