//! `gs-mobility` — turns day plans into time-stamped GPS samples.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`trajectory`] | `TrajectoryBuffer`: append-only samples of one user           |
//! | [`engine`]     | `DaySimulator<R>`: idle jitter, route samples, whole days     |
//! | [`error`]      | `MobilityError`, `MobilityResult<T>`                          |
//!
//! # Movement model
//!
//! A user is always in one of two states:
//!
//! - **stationary**: every 1–5 minutes a sample is emitted within a few
//!   metres of the stop's centroid;
//! - **moving**: the least-length route is cut into way-points at most
//!   `speed × 10 s` apart, a noisy point is inserted between each pair, and
//!   the clock advances by `distance / speed` per leg (never less than 2 s).
//!
//! Every emitted timestamp is quantized to the whole second exactly once, by
//! [`gs_core::SimClock::quantized`].  The clock handed from one segment to
//! the next, and from one day to the next, is the quantized value, so a
//! user's samples never go back in time.

pub mod engine;
pub mod error;
pub mod trajectory;


pub use engine::{DaySimulator, IDLE_JITTER_M, MIN_LEG_SECS};
pub use error::{MobilityError, MobilityResult};
pub use trajectory::TrajectoryBuffer;
