//! `gs-schedule` — what a user does on a given day.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`itinerary`] | `Stop`, `StopKind`, `Itinerary`, `build_itinerary`        |
//! | [`plan`]      | `Segment`, `StayEnd`, `DayPlan`, `plan_day`               |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Day model (summary)
//!
//! Each simulated day goes through two steps, both drawing from the user's
//! own RNG:
//!
//! ```text
//! anchors + day kind ──build_itinerary──▶ Itinerary (ordered stops)
//! itinerary + rules  ──plan_day────────▶ DayPlan   (stay / move segments)
//! ```
//!
//! The plan is pure data.  `gs-mobility` executes it against the street
//! network and turns it into GPS samples.

pub mod error;
pub mod itinerary;
pub mod plan;


pub use error::{ScheduleError, ScheduleResult};
pub use itinerary::{Itinerary, Stop, StopKind, build_itinerary};
pub use plan::{DayPlan, Segment, StayEnd, plan_day};
