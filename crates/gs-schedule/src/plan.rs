//! Day plans: the stay/move sequence of one day, as data.
//!
//! ```text
//! weekday:               stay home ─▶ move ─▶ stay work ─▶ (move ─▶ stay event)* ─▶ move home
//! weekend, with events:  stay home ─▶ (move ─▶ stay event)+ ─▶ move home
//! weekend, no events:    stay home
//! ```
//!
//! Stay ends are drawn here, as whole hours, from the profile's
//! [`ScheduleRules`].  Executing the plan is left to `gs-mobility`.

use gs_agent::{HourRange, ScheduleRules};
use gs_core::{AgentRng, DayKind};

use crate::{Itinerary, ScheduleError, ScheduleResult};

/// When a stay ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StayEnd {
    /// `hours` after midnight of the simulated day.
    DayOffset(u32),
    /// `hours` after arriving at the stop.
    AfterArrival(u32),
}

/// One step of a day plan.  Stops are indices into the itinerary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Stay { stop: usize, until: StayEnd },
    Move { from: usize, to: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayPlan {
    pub segments: Vec<Segment>,
}

impl DayPlan {
    pub fn moves(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Move { .. })).count()
    }
}

/// Turn an itinerary into a day plan.
///
/// A weekday itinerary must start with home and work; any itinerary must
/// hold at least one stop.
pub fn plan_day(itinerary: &Itinerary, rules: &ScheduleRules, rng: &mut AgentRng) -> ScheduleResult<DayPlan> {
    let n = itinerary.len();
    if n == 0 {
        return Err(ScheduleError::EmptyItinerary);
    }

    let mut hours = |range: HourRange| rng.gen_range(range.min..=range.max);
    let mut segments = Vec::with_capacity(2 * n + 1);
    let mut cursor = 0;

    match itinerary.day {
        DayKind::Weekend if n > 1 => {
            segments.push(Segment::Stay { stop: 0, until: StayEnd::DayOffset(hours(rules.weekend_leave_home)) });
        }
        DayKind::Weekday => {
            if n < 2 {
                return Err(ScheduleError::MissingWorkStop);
            }
            segments.push(Segment::Stay { stop: 0, until: StayEnd::DayOffset(hours(rules.weekday_leave_home)) });
            segments.push(Segment::Move { from: 0, to: 1 });
            segments.push(Segment::Stay { stop: 1, until: StayEnd::DayOffset(hours(rules.weekday_leave_work)) });
            cursor = 1;
        }
        DayKind::Weekend => {
            segments.push(Segment::Stay { stop: 0, until: StayEnd::DayOffset(hours(rules.weekend_stay_home)) });
            return Ok(DayPlan { segments });
        }
    }

    while cursor + 1 < n {
        segments.push(Segment::Move { from: cursor, to: cursor + 1 });
        segments.push(Segment::Stay {
            stop:  cursor + 1,
            until: StayEnd::AfterArrival(hours(rules.event_stay)),
        });
        cursor += 1;
    }

    if cursor > 0 {
        segments.push(Segment::Move { from: cursor, to: 0 });
    }

    Ok(DayPlan { segments })
}
