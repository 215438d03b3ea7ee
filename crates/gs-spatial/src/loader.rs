//! CSV loaders for street networks and location catalogs.
//!
//! # CSV formats
//!
//! Nodes, in the network's projected CRS:
//!
//! ```csv
//! node_id,x,y
//! 1001,391200.5,5819950.0
//! 1002,391310.0,5819952.5
//! ```
//!
//! Edges reference `node_id`s.  `length` is optional and defaults to the
//! straight-line distance; `oneway` is optional and defaults to `false`
//! (one row then yields both directions).
//!
//! ```csv
//! from,to,length,oneway
//! 1001,1002,110.0,false
//! ```
//!
//! Locations, `kind` being `hw` (home/work candidate) or `event`:
//!
//! ```csv
//! external_id,kind,x,y
//! 77,hw,391250.0,5819990.0
//! 78,event,391300.0,5819900.0
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use gs_core::{Crs, NodeId, Point};

use crate::catalog::{CatalogKind, CatalogPair, LocationCatalog};
use crate::network::{StreetNetwork, StreetNetworkBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: i64,
    x:       f64,
    y:       f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:   i64,
    to:     i64,
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    oneway: Option<bool>,
}

#[derive(Deserialize)]
struct LocationRecord {
    external_id: i64,
    kind:        String,
    x:           f64,
    y:           f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`StreetNetwork`] from a nodes CSV and an edges CSV.
pub fn load_network_csv(nodes: &Path, edges: &Path, crs: Crs) -> SpatialResult<StreetNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    read_network(nodes, edges, crs)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn read_network<N: Read, E: Read>(nodes: N, edges: E, crs: Crs) -> SpatialResult<StreetNetwork> {
    let mut b = StreetNetworkBuilder::new(crs);
    let mut by_external: HashMap<i64, NodeId> = HashMap::new();

    for result in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        if !(row.x.is_finite() && row.y.is_finite()) {
            return Err(SpatialError::Parse(format!("node {} has non-finite coordinates", row.node_id)));
        }
        let id = b.add_node(Point::new(row.x, row.y));
        if by_external.insert(row.node_id, id).is_some() {
            return Err(SpatialError::Parse(format!("duplicate node_id {}", row.node_id)));
        }
    }

    let lookup = |ext: i64| {
        by_external
            .get(&ext)
            .copied()
            .ok_or_else(|| SpatialError::Parse(format!("edge references unknown node_id {ext}")))
    };

    for result in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let (from, to) = (lookup(row.from)?, lookup(row.to)?);
        let length = match row.length {
            Some(l) => l,
            None => {
                let (a, c) = (b.node_pos(from), b.node_pos(to));
                match (a, c) {
                    (Some(a), Some(c)) => (a.x() - c.x()).hypot(a.y() - c.y()),
                    _ => return Err(SpatialError::NodeNotFound(if a.is_none() { from } else { to })),
                }
            }
        };
        if row.oneway.unwrap_or(false) {
            b.add_directed_edge(from, to, length);
        } else {
            b.add_road(from, to, length);
        }
    }

    b.build()
}

/// Load the home/work and event catalogs of `network` from one CSV.
pub fn load_locations_csv(path: &Path, network: &StreetNetwork) -> SpatialResult<CatalogPair> {
    let file = std::fs::File::open(path)?;
    read_locations(file, network)
}

/// Like [`load_locations_csv`] but accepts any `Read` source.
pub fn read_locations<R: Read>(reader: R, network: &StreetNetwork) -> SpatialResult<CatalogPair> {
    let mut hw = Vec::new();
    let mut events = Vec::new();

    for result in csv::Reader::from_reader(reader).deserialize::<LocationRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        if !(row.x.is_finite() && row.y.is_finite()) {
            return Err(SpatialError::Parse(format!("location {} has non-finite coordinates", row.external_id)));
        }
        let item = (row.external_id, Point::new(row.x, row.y));
        match parse_kind(&row.kind)? {
            CatalogKind::HomeWork => hw.push(item),
            CatalogKind::Event => events.push(item),
        }
    }

    log::debug!("read {} home/work and {} event locations", hw.len(), events.len());

    CatalogPair::new(
        LocationCatalog::build(CatalogKind::HomeWork, network, hw)?,
        LocationCatalog::build(CatalogKind::Event, network, events)?,
    )
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_kind(s: &str) -> SpatialResult<CatalogKind> {
    match s.trim() {
        "hw" => Ok(CatalogKind::HomeWork),
        "event" => Ok(CatalogKind::Event),
        other => Err(SpatialError::Parse(format!(
            "invalid location kind {other:?}: expected \"hw\" or \"event\""
        ))),
    }
}
