//! Routing trait and default Dijkstra implementation.
//!
//! # Cost units
//!
//! Dijkstra runs on integer **millimetres** (`u64`) so that comparisons are
//! exact and tie-breaking is deterministic across platforms.  [`Route`]
//! reports its total length back in metres.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use gs_core::{EdgeId, NodeId, Point};

use crate::network::StreetNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, `from` first and `to` last.  A trivial route
    /// (`from == to`) holds the single node.
    pub nodes:    Vec<NodeId>,
    /// Edges traversed in order; `nodes.len() - 1` of them.
    pub edges:    Vec<EdgeId>,
    /// Sum of edge lengths in metres.
    pub length_m: f64,
}

impl Route {
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Projected positions of the route's nodes.
    pub fn geometry(&self, network: &StreetNetwork) -> Vec<Point> {
        self.nodes.iter().map(|n| network.node_pos[n.index()]).collect()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable least-length routing engine.
///
/// Implementations must be `Send + Sync` so a single router can be shared by
/// Rayon workers simulating different users.
pub trait Router: Send + Sync {
    /// Compute the least-length route from `from` to `to`.
    ///
    /// `from == to` yields a trivial route.  Disconnected nodes yield
    /// [`SpatialError::NoRoute`].
    fn route(&self, network: &StreetNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route>;
}

/// Least-length route with the default [`DijkstraRouter`].
pub fn shortest_route(network: &StreetNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
    DijkstraRouter.route(network, from, to)
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR street graph.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &StreetNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        for node in [from, to] {
            if !network.contains(node) {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        dijkstra(network, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[inline]
fn edge_cost_mm(network: &StreetNetwork, edge: EdgeId) -> u64 {
    (network.edge_length_m[edge.index()] * 1000.0).round() as u64
}

fn dijkstra(network: &StreetNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], length_m: 0.0 });
    }

    let n = network.node_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Secondary key NodeId makes tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to));
        }

        // Stale heap entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_mm(network, edge));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(network: &StreetNetwork, prev_edge: &[EdgeId], from: NodeId, to: NodeId) -> Route {
    let mut edges = Vec::new();
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = network.edge_from[e.index()];
        nodes.push(cur);
    }
    edges.reverse();
    nodes.reverse();
    let length_m = edges.iter().map(|e| network.edge_length_m[e.index()]).sum();
    Route { nodes, edges, length_m }
}
