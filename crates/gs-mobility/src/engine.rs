//! The day simulator.

use chrono::{NaiveDate, TimeDelta};
use geo::{EuclideanDistance, EuclideanLength, LineString};

use gs_agent::{Anchors, MobilityProfile, RetryLimits};
use gs_core::{AgentRng, DayKind, NodeId, Point, SimClock, Timestamp, time::midnight};
use gs_schedule::{Segment, StayEnd, Stop, build_itinerary, plan_day};
use gs_spatial::{CatalogPair, Router, StreetNetwork, interpolate_points, sample_noisy_point};

use crate::{MobilityError, MobilityResult, TrajectoryBuffer};

/// Largest distance of a stationary sample from its stop, metres.
pub const IDLE_JITTER_M: f64 = 5.0;

/// Shortest time charged for one leg of a moving segment, seconds.
///
/// Applies whenever a leg is shorter than `MIN_LEG_SECS × speed`.
pub const MIN_LEG_SECS: f64 = 2.0;

/// Simulates the days of users sharing one network and one profile.
///
/// # Type parameter
///
/// `R` is the routing algorithm (e.g. [`gs_spatial::DijkstraRouter`]).
/// The simulator holds only shared references and is `Sync` whenever `R`
/// is, so one instance serves every worker thread.
pub struct DaySimulator<'a, R: Router> {
    network: &'a StreetNetwork,
    router:  R,
    profile: &'a MobilityProfile,
    limits:  RetryLimits,
}

impl<'a, R: Router> DaySimulator<'a, R> {
    pub fn new(network: &'a StreetNetwork, router: R, profile: &'a MobilityProfile, limits: RetryLimits) -> Self {
        Self { network, router, profile, limits }
    }

    pub fn network(&self) -> &StreetNetwork {
        self.network
    }

    // ── Stationary ────────────────────────────────────────────────────────

    /// Samples of a user staying at `center` from `t_start` to `t_end`.
    ///
    /// The first sample falls one minute after `t_start`; each later one
    /// 1–5 whole minutes after its predecessor, until the clock reaches
    /// `t_end`.  Every sample lies within [`IDLE_JITTER_M`] of `center`.
    /// Returns the quantized clock, which is at least `t_start + 1 min`.
    pub fn generate_idle_points(
        &self,
        center: Point,
        t_start: Timestamp,
        t_end: Timestamp,
        rng: &mut AgentRng,
        out: &mut TrajectoryBuffer,
    ) -> Timestamp {
        let mut clock = SimClock::new(t_start);
        clock.advance_minutes(1);

        while clock.now() < t_end {
            let bearing = rng.gen_range(0.0..360.0f64).to_radians();
            let distance = rng.gen_range(0.0..=IDLE_JITTER_M);
            let pos = Point::new(center.x() + distance * bearing.sin(), center.y() + distance * bearing.cos());
            out.push(clock.quantized(), self.network.to_geographic(pos));
            clock.advance_minutes(rng.gen_range(1..=5));
        }

        clock.quantized()
    }

    // ── Moving ────────────────────────────────────────────────────────────

    /// Samples of a user moving from `start` (snapped to `start_node`) to
    /// `end` (snapped to `end_node`), departing at `t_start`.
    ///
    /// The path runs `start → route nodes → end`.  It is cut into
    /// `max(2, ⌈length / spacing⌉ + 1)` way-points, `spacing` being the
    /// profile's way-point spacing, and a noisy point is inserted between
    /// each consecutive pair.  Returns the quantized arrival time.
    pub fn generate_route_samples(
        &self,
        (start_node, start): (NodeId, Point),
        (end_node, end): (NodeId, Point),
        t_start: Timestamp,
        rng: &mut AgentRng,
        out: &mut TrajectoryBuffer,
    ) -> MobilityResult<Timestamp> {
        let route = self.router.route(self.network, start_node, end_node)?;

        let mut path = Vec::with_capacity(route.nodes.len() + 2);
        path.push(start);
        path.extend(route.geometry(self.network));
        path.push(end);

        let spacing = self.profile.waypoint_spacing_m();
        let length = path.iter().map(|p| p.0).collect::<LineString<f64>>().euclidean_length();
        let n = ((length / spacing).ceil() as usize + 1).max(2);
        let waypoints = interpolate_points(&path, n)?;

        let speed = self.profile.speed_mps;
        let leg_secs = |d: f64| if d < MIN_LEG_SECS * speed { MIN_LEG_SECS } else { d / speed };

        let mut clock = SimClock::new(t_start);
        for pair in waypoints.windows(2) {
            let (here, next) = (pair[0], pair[1]);
            out.push(clock.quantized(), self.network.to_geographic(here));

            let noisy = sample_noisy_point(
                here,
                next,
                spacing,
                self.profile.road_proximity_m,
                rng,
                self.limits.max_sample_attempts,
            )?;
            clock.advance_secs(leg_secs(here.euclidean_distance(&noisy)));
            out.push(clock.quantized(), self.network.to_geographic(noisy));
            clock.advance_secs(leg_secs(noisy.euclidean_distance(&next)));
        }
        if let Some(&last) = waypoints.last() {
            out.push(clock.quantized(), self.network.to_geographic(last));
        }

        log::trace!(
            "{}: moved {start_node} -> {end_node}, {length:.0} m in {n} way-points",
            out.agent()
        );
        Ok(clock.quantized())
    }

    // ── Whole days ────────────────────────────────────────────────────────

    /// Execute a planned day.
    ///
    /// `t_start` is the clock carried over from the previous day; `day` is
    /// the calendar date stay ends are measured from.  Returns the clock to
    /// carry into the next day.
    pub fn simulate_day(
        &self,
        t_start: Timestamp,
        day: NaiveDate,
        stops: &[Stop],
        segments: &[Segment],
        rng: &mut AgentRng,
        out: &mut TrajectoryBuffer,
    ) -> MobilityResult<Timestamp> {
        let day_start = midnight(day);
        let stop = |i: usize| {
            stops.get(i).copied().ok_or(MobilityError::StopOutOfRange { stop: i, len: stops.len() })
        };

        let mut now = t_start;
        for segment in segments {
            now = match *segment {
                Segment::Stay { stop: i, until } => {
                    let end = match until {
                        StayEnd::DayOffset(h) => day_start + TimeDelta::hours(h as i64),
                        StayEnd::AfterArrival(h) => now + TimeDelta::hours(h as i64),
                    };
                    self.generate_idle_points(stop(i)?.point, now, end, rng, out)
                }
                Segment::Move { from, to } => {
                    let (a, b) = (stop(from)?, stop(to)?);
                    self.generate_route_samples((a.node, a.point), (b.node, b.point), now, rng, out)?
                }
            };
        }
        Ok(now)
    }

    /// Build the itinerary and plan of `day` for a user, then simulate it.
    pub fn run_day(
        &self,
        t_start: Timestamp,
        day: NaiveDate,
        anchors: &Anchors,
        catalogs: &CatalogPair,
        rng: &mut AgentRng,
        out: &mut TrajectoryBuffer,
    ) -> MobilityResult<Timestamp> {
        let kind = DayKind::of(day);
        let itinerary = build_itinerary(kind, anchors, catalogs, &self.profile.itinerary, rng, &self.limits)?;
        let plan = plan_day(&itinerary, &self.profile.schedule, rng)?;
        log::trace!("{}: {day} ({kind}), {} stops, {} moves", out.agent(), itinerary.len(), plan.moves());
        self.simulate_day(t_start, day, &itinerary.stops, &plan.segments, rng, out)
    }
}
