//! Location catalogs: the points of interest users may anchor to.
//!
//! Two disjoint catalogs exist per network:
//!
//! - **home/work candidates**: where users live and work;
//! - **event candidates**: regular and one-off destinations.
//!
//! Each entry is snapped to its nearest street node when the catalog is
//! built, and the snapping distance is kept so that distance-based anchor
//! policies can account for the walk from the centroid to the graph.

use std::fmt;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use gs_core::{LocationId, NodeId, Point};

use crate::network::StreetNetwork;
use crate::{SpatialError, SpatialResult};

/// Which of the two catalogs an entry belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    HomeWork,
    Event,
}

impl CatalogKind {
    /// Short name used in location files: `hw` or `event`.
    pub const fn as_str(self) -> &'static str {
        match self {
            CatalogKind::HomeWork => "hw",
            CatalogKind::Event => "event",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of interest.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocationEntry {
    /// Position inside the owning catalog.
    pub id:               LocationId,
    /// Centroid in the network CRS.
    pub centroid:         Point,
    pub nearest_node:     NodeId,
    /// Planar distance from `centroid` to `nearest_node`, in metres.
    pub distance_to_node: f64,
    /// Identifier of the location in the source data set.
    pub external_id:      i64,
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct CentroidEntry {
    point: [f64; 2],
    id:    LocationId,
}

impl RTreeObject for CentroidEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CentroidEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── LocationCatalog ───────────────────────────────────────────────────────────

/// An ordered, immutable list of locations queryable by id and by buffer.
#[derive(Clone)]
pub struct LocationCatalog {
    kind:    CatalogKind,
    entries: Vec<LocationEntry>,
    index:   RTree<CentroidEntry>,
}

impl LocationCatalog {
    /// Snap every `(external_id, centroid)` to its nearest node of `network`.
    ///
    /// Ids are assigned in iteration order.  Non-finite centroids are a
    /// `Parse` error.
    pub fn build<I>(kind: CatalogKind, network: &StreetNetwork, locations: I) -> SpatialResult<Self>
    where
        I: IntoIterator<Item = (i64, Point)>,
    {
        let mut entries = Vec::new();
        for (i, (external_id, centroid)) in locations.into_iter().enumerate() {
            if !(centroid.x().is_finite() && centroid.y().is_finite()) {
                return Err(SpatialError::Parse(format!("location {external_id} has non-finite coordinates")));
            }
            let (nearest_node, distance_to_node) =
                network.snap_to_node(centroid).ok_or(SpatialError::EmptyNetwork)?;
            entries.push(LocationEntry {
                id: LocationId(i as u32),
                centroid,
                nearest_node,
                distance_to_node,
                external_id,
            });
        }
        Ok(Self::from_snapped(kind, entries))
    }

    /// Wrap already-snapped entries, checking each `nearest_node` against
    /// `network` and renumbering ids by position.
    pub fn from_entries(
        kind: CatalogKind,
        network: &StreetNetwork,
        mut entries: Vec<LocationEntry>,
    ) -> SpatialResult<Self> {
        for (i, entry) in entries.iter_mut().enumerate() {
            if !network.contains(entry.nearest_node) {
                return Err(SpatialError::NodeNotFound(entry.nearest_node));
            }
            entry.id = LocationId(i as u32);
        }
        Ok(Self::from_snapped(kind, entries))
    }

    fn from_snapped(kind: CatalogKind, entries: Vec<LocationEntry>) -> Self {
        let index = RTree::bulk_load(
            entries
                .iter()
                .map(|e| CentroidEntry { point: [e.centroid.x(), e.centroid.y()], id: e.id })
                .collect(),
        );
        Self { kind, entries, index }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: LocationId) -> Option<&LocationEntry> {
        self.entries.get(id.index())
    }

    /// Like [`get`](Self::get) but reports a missing id as an error.
    pub fn entry(&self, id: LocationId) -> SpatialResult<&LocationEntry> {
        self.get(id).ok_or(SpatialError::LocationNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationEntry> + '_ {
        self.entries.iter()
    }

    /// Ids of all entries whose centroid lies strictly inside the disk of
    /// `radius` around `center`, ascending.
    pub fn within(&self, center: Point, radius: f64) -> Vec<LocationId> {
        if !(radius > 0.0) {
            return Vec::new();
        }
        let r2 = radius * radius;
        let query = [center.x(), center.y()];
        let mut ids: Vec<LocationId> = self
            .index
            .locate_within_distance(query, r2)
            .filter(|e| e.distance_2(&query) < r2)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Diagonal of the centroids' bounding box, in metres.  Zero for fewer
    /// than two distinct centroids.
    pub fn extent(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let env = self.index.root().envelope();
        let (lo, hi) = (env.lower(), env.upper());
        (hi[0] - lo[0]).hypot(hi[1] - lo[1])
    }
}

impl fmt::Debug for LocationCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationCatalog")
            .field("kind", &self.kind)
            .field("len", &self.entries.len())
            .finish()
    }
}

// ── CatalogPair ───────────────────────────────────────────────────────────────

/// The two catalogs that accompany one street network.
#[derive(Clone, Debug)]
pub struct CatalogPair {
    pub home_work: LocationCatalog,
    pub events:    LocationCatalog,
}

impl CatalogPair {
    /// Pair two catalogs, checking that each holds the expected kind.
    pub fn new(home_work: LocationCatalog, events: LocationCatalog) -> SpatialResult<Self> {
        if home_work.kind() != CatalogKind::HomeWork || events.kind() != CatalogKind::Event {
            return Err(SpatialError::Parse(format!(
                "catalog kinds mismatched: expected (hw, event), got ({}, {})",
                home_work.kind(),
                events.kind()
            )));
        }
        Ok(Self { home_work, events })
    }
}
