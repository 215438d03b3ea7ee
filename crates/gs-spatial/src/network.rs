//! Street network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`) are sorted by
//! source node and indexed by `EdgeId`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over projected `[x, y]` maps a point to its
//! nearest `NodeId`.  Used when building location catalogs to snap each
//! location centroid to the graph.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use gs_core::{Crs, EdgeId, GeoPoint, NodeId, Point};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared planar distance; the CRS is metric.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── StreetNetwork ─────────────────────────────────────────────────────────────

/// Directed street graph in CSR format plus a spatial index for snapping.
///
/// Immutable once built; shared read-only by every user of every profile
/// that references it.  Construct through [`StreetNetworkBuilder`].
#[derive(Clone)]
pub struct StreetNetwork {
    /// Projected position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge (needed to walk `prev_edge` back in routing).
    pub edge_from: Vec<NodeId>,

    pub edge_to: Vec<NodeId>,

    /// Edge length in metres.  Dijkstra's cost.
    pub edge_length_m: Vec<f64>,

    crs:         Crs,
    spatial_idx: RTree<NodeEntry>,
}

impl StreetNetwork {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// The CRS all node positions are expressed in.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Position of `node`, or `NodeNotFound`.
    pub fn position(&self, node: NodeId) -> SpatialResult<Point> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos` and its planar distance in metres.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: Point) -> Option<(NodeId, f64)> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x(), pos.y()])
            .map(|e| (e.id, e.distance_2(&[pos.x(), pos.y()]).sqrt()))
    }

    /// Axis-aligned extent of all nodes as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        if self.is_empty() {
            return None;
        }
        let env = self.spatial_idx.root().envelope();
        let (lo, hi) = (env.lower(), env.upper());
        Some((Point::new(lo[0], lo[1]), Point::new(hi[0], hi[1])))
    }

    /// Convert a projected coordinate of this network to WGS-84.
    #[inline]
    pub fn to_geographic(&self, p: Point) -> GeoPoint {
        self.crs.to_geographic(p)
    }
}

impl std::fmt::Debug for StreetNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreetNetwork")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("crs", &self.crs)
            .finish()
    }
}

// ── StreetNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`StreetNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use gs_core::{Crs, GeoPoint, Point};
/// use gs_spatial::StreetNetworkBuilder;
///
/// let mut b = StreetNetworkBuilder::new(Crs::Local { origin: GeoPoint::new(-88.04, 30.69) });
/// let a = b.add_node(Point::new(0.0, 0.0));
/// let c = b.add_node(Point::new(1_200.0, 0.0));
/// b.add_road(a, c, 1_200.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct StreetNetworkBuilder {
    crs:       Crs,
    nodes:     Vec<Point>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl StreetNetworkBuilder {
    pub fn new(crs: Crs) -> Self {
        Self { crs, nodes: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(crs: Crs, nodes: usize, edges: usize) -> Self {
        Self {
            crs,
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge of `length_m` metres.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(RawEdge { from, to, length_m });
    }

    /// Add edges in both directions.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Option<Point> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`StreetNetwork`].
    ///
    /// Fails with `InvalidEdge` if an edge references a missing node or has
    /// a negative or non-finite length.
    pub fn build(self) -> SpatialResult<StreetNetwork> {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        for e in &self.raw_edges {
            let reason = if e.from.index() >= node_count || e.to.index() >= node_count {
                Some("endpoint not in network")
            } else if !e.length_m.is_finite() || e.length_m < 0.0 {
                Some("length must be finite and non-negative")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(SpatialError::InvalidEdge {
                    from:   e.from,
                    to:     e.to,
                    reason: reason.to_owned(),
                });
            }
        }

        // Stable sort keeps insertion order among a node's out-edges, which
        // fixes Dijkstra's tie-breaking.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x(), p.y()], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        log::debug!("built street network: {node_count} nodes, {edge_count} edges, {}", self.crs);

        Ok(StreetNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            crs: self.crs,
            spatial_idx,
        })
    }
}
