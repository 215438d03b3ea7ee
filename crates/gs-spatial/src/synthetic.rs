//! Synthetic networks and location layers.
//!
//! Used by the demo binary when no CSV source is configured and by tests
//! across the workspace.  A grid of `rows × cols` nodes `spacing_m` apart is
//! connected by two-way streets; locations are scattered uniformly over the
//! grid's extent and snapped to it like loaded ones.

use gs_core::{CoreError, Crs, Point, SimRng};

use crate::catalog::{CatalogKind, CatalogPair, LocationCatalog};
use crate::network::{StreetNetwork, StreetNetworkBuilder};
use crate::SpatialResult;

/// Shape of a synthetic grid network.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSpec {
    pub rows:      usize,
    pub cols:      usize,
    pub spacing_m: f64,
    /// Lower-left node position in the network CRS.
    pub origin:    Point,
}

impl GridSpec {
    pub fn new(rows: usize, cols: usize, spacing_m: f64) -> Self {
        Self { rows, cols, spacing_m, origin: Point::new(0.0, 0.0) }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }
}

/// Build a fully connected street grid.
pub fn grid_network(spec: &GridSpec, crs: Crs) -> SpatialResult<StreetNetwork> {
    if spec.rows == 0 || spec.cols == 0 || !(spec.spacing_m > 0.0) {
        return Err(CoreError::InvalidConfiguration(format!(
            "grid needs rows, cols and spacing > 0 (got {}×{} @ {} m)",
            spec.rows, spec.cols, spec.spacing_m
        ))
        .into());
    }

    let node_count = spec.rows * spec.cols;
    let edge_count = 2 * (spec.rows * (spec.cols - 1) + spec.cols * (spec.rows - 1));
    let mut b = StreetNetworkBuilder::with_capacity(crs, node_count, edge_count);

    let mut ids = Vec::with_capacity(node_count);
    for r in 0..spec.rows {
        for c in 0..spec.cols {
            ids.push(b.add_node(Point::new(
                spec.origin.x() + c as f64 * spec.spacing_m,
                spec.origin.y() + r as f64 * spec.spacing_m,
            )));
        }
    }

    let at = |r: usize, c: usize| ids[r * spec.cols + c];
    for r in 0..spec.rows {
        for c in 0..spec.cols {
            if c + 1 < spec.cols {
                b.add_road(at(r, c), at(r, c + 1), spec.spacing_m);
            }
            if r + 1 < spec.rows {
                b.add_road(at(r, c), at(r + 1, c), spec.spacing_m);
            }
        }
    }

    b.build()
}

/// Scatter `count` locations uniformly over the network's bounding box.
///
/// External ids run from `first_external_id` upward.
pub fn scatter_locations(
    kind: CatalogKind,
    network: &StreetNetwork,
    count: usize,
    first_external_id: i64,
    rng: &mut SimRng,
) -> SpatialResult<LocationCatalog> {
    let (lo, hi) = network.bounds().ok_or(crate::SpatialError::EmptyNetwork)?;
    let points: Vec<(i64, Point)> = (0..count)
        .map(|i| {
            let x = if hi.x() > lo.x() { rng.gen_range(lo.x()..hi.x()) } else { lo.x() };
            let y = if hi.y() > lo.y() { rng.gen_range(lo.y()..hi.y()) } else { lo.y() };
            (first_external_id + i as i64, Point::new(x, y))
        })
        .collect();
    LocationCatalog::build(kind, network, points)
}

/// Home/work and event catalogs scattered over `network`.
///
/// Event external ids continue after the home/work ones so the two layers
/// never share an id.
pub fn scatter_catalogs(
    network: &StreetNetwork,
    home_work: usize,
    events: usize,
    rng: &mut SimRng,
) -> SpatialResult<CatalogPair> {
    let hw = scatter_locations(CatalogKind::HomeWork, network, home_work, 1, &mut rng.child(1))?;
    let ev = scatter_locations(
        CatalogKind::Event,
        network,
        events,
        1 + home_work as i64,
        &mut rng.child(2),
    )?;
    CatalogPair::new(hw, ev)
}
