//! Mobility profiles: the data that distinguishes one kind of user from
//! another.
//!
//! Every user is simulated by the same engine.  What varies between
//! populations (walking speed, how closely paths hug the road, when people
//! leave home, how eventful their days are) is carried here as plain values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gs_core::{CoreError, CoreResult};

/// Seconds of travel between consecutive way-points of a route.
pub const WAYPOINT_INTERVAL_SECS: f64 = 10.0;

// ── HourRange ─────────────────────────────────────────────────────────────────

/// An inclusive range of whole hours `min..=max`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HourRange {
    pub min: u32,
    pub max: u32,
}

impl HourRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

// ── ScheduleRules ─────────────────────────────────────────────────────────────

/// When stays end, as hour offsets from the start of the day (or from
/// arrival, for `event_stay`).  Hours may exceed 24: a stay then spills
/// into the next calendar day.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ScheduleRules {
    /// Weekday: leave home for work.
    pub weekday_leave_home: HourRange,
    /// Weekday: leave work.
    pub weekday_leave_work: HourRange,
    /// Weekend with plans: leave home.
    pub weekend_leave_home: HourRange,
    /// Weekend without plans: the single stay at home ends.
    pub weekend_stay_home:  HourRange,
    /// Length of a stay at an event location.
    pub event_stay:         HourRange,
}

impl Default for ScheduleRules {
    fn default() -> Self {
        Self {
            weekday_leave_home: HourRange::new(7, 9),
            weekday_leave_work: HourRange::new(17, 19),
            weekend_leave_home: HourRange::new(10, 14),
            weekend_stay_home:  HourRange::new(22, 26),
            event_stay:         HourRange::new(1, 3),
        }
    }
}

// ── ItineraryWeights ──────────────────────────────────────────────────────────

/// How many events a day holds and where they come from.
///
/// `weekday[i]` / `weekend[i]` is the relative weight of visiting `i`
/// events.  Each event is drawn from the user's regular locations with
/// probability `regular_share`, otherwise from the whole event catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ItineraryWeights {
    pub weekday:       Vec<f64>,
    pub weekend:       Vec<f64>,
    pub regular_share: f64,
}

impl Default for ItineraryWeights {
    fn default() -> Self {
        Self {
            weekday:       vec![0.6, 0.25, 0.1, 0.05],
            weekend:       vec![0.1, 0.2, 0.30, 0.25, 0.15],
            regular_share: 0.6,
        }
    }
}

// ── MobilityProfile ───────────────────────────────────────────────────────────

/// Movement and scheduling parameters shared by all users of a profile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MobilityProfile {
    /// Mean movement speed, metres per second.
    pub speed_mps:        f64,
    /// Half-width of the corridor noisy points are drawn from, metres.
    pub road_proximity_m: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub schedule:         ScheduleRules,
    #[cfg_attr(feature = "serde", serde(default))]
    pub itinerary:        ItineraryWeights,
}

impl MobilityProfile {
    /// Default schedule and itinerary weights with the given movement
    /// parameters.
    pub fn new(speed_mps: f64, road_proximity_m: f64) -> Self {
        Self {
            speed_mps,
            road_proximity_m,
            schedule:  ScheduleRules::default(),
            itinerary: ItineraryWeights::default(),
        }
    }

    /// Upper bound on the distance between consecutive way-points.
    #[inline]
    pub fn waypoint_spacing_m(&self) -> f64 {
        self.speed_mps * WAYPOINT_INTERVAL_SECS
    }

    /// Reject non-positive speeds or proximities, inverted hour ranges and
    /// unusable weights.
    pub fn validate(&self) -> CoreResult<()> {
        let bad = |msg: String| Err(CoreError::InvalidConfiguration(msg));

        if !(self.speed_mps.is_finite() && self.speed_mps > 0.0) {
            return bad(format!("speed must be positive, got {}", self.speed_mps));
        }
        if !(self.road_proximity_m.is_finite() && self.road_proximity_m > 0.0) {
            return bad(format!("road proximity must be positive, got {}", self.road_proximity_m));
        }

        let s = &self.schedule;
        for (name, range) in [
            ("weekday_leave_home", s.weekday_leave_home),
            ("weekday_leave_work", s.weekday_leave_work),
            ("weekend_leave_home", s.weekend_leave_home),
            ("weekend_stay_home", s.weekend_stay_home),
            ("event_stay", s.event_stay),
        ] {
            if !range.is_valid() {
                return bad(format!("{name}: min {} exceeds max {}", range.min, range.max));
            }
        }

        let w = &self.itinerary;
        for (name, weights) in [("weekday", &w.weekday), ("weekend", &w.weekend)] {
            let usable = weights.iter().all(|x| x.is_finite() && *x >= 0.0)
                && weights.iter().any(|x| *x > 0.0);
            if !usable {
                return bad(format!("{name} event weights must be non-negative with a positive entry"));
            }
        }
        if !(0.0..=1.0).contains(&w.regular_share) {
            return bad(format!("regular_share must lie in [0, 1], got {}", w.regular_share));
        }
        Ok(())
    }
}
