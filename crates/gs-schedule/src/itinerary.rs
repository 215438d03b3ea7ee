//! Daily itineraries: which locations a user visits on one day.
//!
//! # Composition
//!
//! | Day kind | Base stops     | Event count weights (0, 1, 2, …)     |
//! |----------|----------------|--------------------------------------|
//! | Weekday  | home, work     | `ItineraryWeights::weekday`          |
//! | Weekend  | home           | `ItineraryWeights::weekend`          |
//!
//! Each event slot is filled from the user's regular locations with
//! probability `regular_share`, otherwise from the whole event catalog.
//! Events are distinct within a day; a repeated draw is discarded.  Base
//! stops always come first.

use gs_agent::{Anchors, ItineraryWeights, RetryLimits};
use gs_core::{AgentRng, DayKind, LocationId, NodeId, Point};
use gs_spatial::{CatalogPair, LocationCatalog};

use crate::{ScheduleError, ScheduleResult};

/// The role a stop plays in the day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StopKind {
    Home,
    Work,
    Event,
}

/// One location of an itinerary, resolved through its catalog.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stop {
    pub kind:     StopKind,
    pub location: LocationId,
    /// Street node nearest the location.
    pub node:     NodeId,
    /// Location centroid in the network CRS.
    pub point:    Point,
}

impl Stop {
    fn resolve(kind: StopKind, catalog: &LocationCatalog, location: LocationId) -> ScheduleResult<Self> {
        let entry = catalog.entry(location)?;
        Ok(Self { kind, location, node: entry.nearest_node, point: entry.centroid })
    }
}

/// The ordered stops of one day.  Built fresh every day, dropped once the
/// day is simulated.
#[derive(Clone, Debug, PartialEq)]
pub struct Itinerary {
    pub day:   DayKind,
    pub stops: Vec<Stop>,
}

impl Itinerary {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of event stops.
    pub fn event_count(&self) -> usize {
        self.stops.iter().filter(|s| s.kind == StopKind::Event).count()
    }
}

/// Build the itinerary of one day.
///
/// The drawn event count is capped at the size of the event catalog, the
/// most distinct events a day can hold.  Collecting them is bounded by
/// `limits.max_candidate_draws`.
pub fn build_itinerary(
    day: DayKind,
    anchors: &Anchors,
    catalogs: &CatalogPair,
    weights: &ItineraryWeights,
    rng: &mut AgentRng,
    limits: &RetryLimits,
) -> ScheduleResult<Itinerary> {
    let (hw, events) = (&catalogs.home_work, &catalogs.events);

    let mut stops = match day {
        DayKind::Weekday => vec![
            Stop::resolve(StopKind::Home, hw, anchors.home())?,
            Stop::resolve(StopKind::Work, hw, anchors.work())?,
        ],
        DayKind::Weekend => vec![Stop::resolve(StopKind::Home, hw, anchors.home())?],
    };

    let table = match day {
        DayKind::Weekday => &weights.weekday,
        DayKind::Weekend => &weights.weekend,
    };
    let drawn = rng.weighted_index(table).unwrap_or(0);
    let wanted = drawn.min(events.len());

    let picked = pick_events(wanted, anchors.regular(), events.len(), weights.regular_share, rng, limits)?;
    for id in picked {
        stops.push(Stop::resolve(StopKind::Event, events, id)?);
    }

    log::trace!("{day} itinerary: {} stops ({drawn} events drawn)", stops.len());
    Ok(Itinerary { day, stops })
}

/// `count` distinct event ids, each from `regular` with probability
/// `regular_share` or uniformly from `0..catalog_len` otherwise.
fn pick_events(
    count: usize,
    regular: &[LocationId],
    catalog_len: usize,
    regular_share: f64,
    rng: &mut AgentRng,
    limits: &RetryLimits,
) -> ScheduleResult<Vec<LocationId>> {
    let mut picked: Vec<LocationId> = Vec::with_capacity(count);
    let mut attempts = 0u32;

    while picked.len() < count {
        if attempts >= limits.max_candidate_draws {
            return Err(ScheduleError::InsufficientCandidates { what: "event stops", attempts });
        }
        attempts += 1;

        let id = if rng.gen_bool(regular_share) {
            rng.choose(regular).copied()
        } else {
            rng.index(catalog_len).map(|i| LocationId(i as u32))
        };
        if let Some(id) = id {
            if !picked.contains(&id) {
                picked.push(id);
            }
        }
    }
    Ok(picked)
}
