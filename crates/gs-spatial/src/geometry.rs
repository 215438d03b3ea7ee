//! Planar geometry used to lay samples along a route.
//!
//! - [`interpolate_points`] places way-points at equal arc-length spacing.
//! - [`sample_noisy_point`] draws an off-path point between two way-points.
//!
//! # Noisy-point region
//!
//! The region is the intersection of three shapes:
//!
//! ```text
//!   disk(start, radius)  ∩  disk(end, radius)  ∩  corridor(start–end, proximity)
//! ```
//!
//! It is non-empty with positive area exactly when `radius > 0`,
//! `proximity > 0` and `|start – end| < 2 · radius`.  Points are drawn
//! uniformly from the bounding box of the region and rejected until one
//! lands inside; the number of draws is capped so a thin region fails with
//! [`SpatialError::DegenerateSampleRegion`] instead of spinning.

use geo::{EuclideanDistance, EuclideanLength, Line, LineInterpolatePoint, LineString};

use gs_core::{AgentRng, Point};

use crate::{SpatialError, SpatialResult};

/// Draw cap used by callers that have no retry budget of their own.
pub const DEFAULT_MAX_SAMPLE_ATTEMPTS: u32 = 10_000;

/// `n` points at equal arc-length spacing along `path`, endpoints included.
///
/// Point `i` lies at arc length `i / (n - 1) · length(path)`.  The first and
/// last points are exactly `path[0]` and `path[path.len() - 1]`.  A path of
/// zero length yields `n` copies of its start.
pub fn interpolate_points(path: &[Point], n: usize) -> SpatialResult<Vec<Point>> {
    if n < 2 {
        return Err(SpatialError::TooFewPoints(n));
    }
    let (first, last) = match (path.first(), path.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return Err(SpatialError::EmptyPath),
    };

    let line: LineString<f64> = path.iter().map(|p| p.0).collect();
    if line.euclidean_length() == 0.0 {
        return Ok(vec![first; n]);
    }

    let mut out = Vec::with_capacity(n);
    out.push(first);
    for i in 1..n - 1 {
        let fraction = i as f64 / (n - 1) as f64;
        // `None` only for an empty line string, ruled out above.
        out.push(line.line_interpolate_point(fraction).unwrap_or(first));
    }
    out.push(last);
    Ok(out)
}

/// A uniformly distributed point inside the noisy-point region between
/// `start` and `end` (see the module docs).
///
/// Fails with `DegenerateSampleRegion` when the region is empty or when
/// `max_attempts` draws all miss it.
pub fn sample_noisy_point(
    start: Point,
    end: Point,
    radius: f64,
    proximity: f64,
    rng: &mut AgentRng,
    max_attempts: u32,
) -> SpatialResult<Point> {
    let length = start.euclidean_distance(&end);
    let degenerate = || SpatialError::DegenerateSampleRegion { length, radius, proximity };

    if !(radius > 0.0 && proximity > 0.0 && length.is_finite() && length < 2.0 * radius) {
        return Err(degenerate());
    }

    // Bounding box of the two disks, clipped by the corridor's box.
    let min_x = (start.x().max(end.x()) - radius).max(start.x().min(end.x()) - proximity);
    let max_x = (start.x().min(end.x()) + radius).min(start.x().max(end.x()) + proximity);
    let min_y = (start.y().max(end.y()) - radius).max(start.y().min(end.y()) - proximity);
    let max_y = (start.y().min(end.y()) + radius).min(start.y().max(end.y()) + proximity);
    if !(min_x < max_x && min_y < max_y) {
        return Err(degenerate());
    }

    let segment = Line::new(start.0, end.0);
    for _ in 0..max_attempts {
        let candidate = Point::new(rng.gen_range(min_x..max_x), rng.gen_range(min_y..max_y));
        if candidate.euclidean_distance(&start) <= radius
            && candidate.euclidean_distance(&end) <= radius
            && candidate.euclidean_distance(&segment) <= proximity
        {
            return Ok(candidate);
        }
    }

    log::debug!("noisy-point sampling exhausted {max_attempts} draws (segment {length:.2} m)");
    Err(degenerate())
}
