//! Unit tests for gs-spatial.
//!
//! All tests use hand-crafted or synthetic networks in a local CRS.

#[cfg(test)]
mod helpers {
    use gs_core::{Crs, GeoPoint, NodeId, Point};

    use crate::{StreetNetwork, StreetNetworkBuilder};

    pub fn local_crs() -> Crs {
        Crs::Local { origin: GeoPoint::new(-88.04, 30.69) }
    }

    /// Small network, positions in metres:
    ///
    /// ```text
    ///   3:(0,100) ─────────────── 4:(200,100)
    ///     │ 500                     │ 100
    ///   0:(0,0) ── 1:(100,0) ── 2:(200,0)
    /// ```
    ///
    /// Edge 0-3 is declared 500 m long, so the shortest 0→4 route is
    /// 0→1→2→4 (300 m) rather than 0→3→4 (600 m).
    pub fn small_network() -> (StreetNetwork, [NodeId; 5]) {
        let mut b = StreetNetworkBuilder::new(local_crs());
        let n0 = b.add_node(Point::new(0.0, 0.0));
        let n1 = b.add_node(Point::new(100.0, 0.0));
        let n2 = b.add_node(Point::new(200.0, 0.0));
        let n3 = b.add_node(Point::new(0.0, 100.0));
        let n4 = b.add_node(Point::new(200.0, 100.0));

        b.add_road(n0, n1, 100.0);
        b.add_road(n1, n2, 100.0);
        b.add_road(n2, n4, 100.0);
        b.add_road(n0, n3, 500.0);
        b.add_road(n3, n4, 100.0);

        (b.build().unwrap(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use gs_core::{NodeId, Point};

    use crate::{SpatialError, StreetNetworkBuilder};

    use super::helpers::{local_crs, small_network};

    #[test]
    fn empty_build() {
        let net = StreetNetworkBuilder::new(local_crs()).build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert!(net.bounds().is_none());
    }

    #[test]
    fn csr_out_edges() {
        let (net, [n0, n1, n2, n3, n4]) = small_network();
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
        assert!(net.out_edges(n0).any(|e| net.edge_to[e.index()] == n1));
    }

    #[test]
    fn directed_only_edge() {
        let mut b = StreetNetworkBuilder::new(local_crs());
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(0.0, 10.0));
        b.add_directed_edge(a, c, 10.0);
        let net = b.build().unwrap();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn dangling_edge_rejected() {
        let mut b = StreetNetworkBuilder::new(local_crs());
        let a = b.add_node(Point::new(0.0, 0.0));
        b.add_directed_edge(a, NodeId(9), 10.0);
        assert!(matches!(b.build(), Err(SpatialError::InvalidEdge { .. })));
    }

    #[test]
    fn negative_length_rejected() {
        let mut b = StreetNetworkBuilder::new(local_crs());
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(1.0, 0.0));
        b.add_road(a, c, -1.0);
        assert!(b.build().is_err());
    }

    #[test]
    fn bounds_and_positions() {
        let (net, [_, n1, ..]) = small_network();
        let (lo, hi) = net.bounds().unwrap();
        assert_eq!((lo.x(), lo.y()), (0.0, 0.0));
        assert_eq!((hi.x(), hi.y()), (200.0, 100.0));
        assert_eq!(net.position(n1).unwrap(), Point::new(100.0, 0.0));
        assert!(matches!(net.position(NodeId(42)), Err(SpatialError::NodeNotFound(_))));
    }

    #[test]
    fn projects_through_its_crs() {
        let (net, [n0, ..]) = small_network();
        let g = net.to_geographic(net.position(n0).unwrap());
        assert!((g.lon + 88.04).abs() < 1e-12);
        assert!((g.lat - 30.69).abs() < 1e-12);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use gs_core::Point;

    use crate::StreetNetworkBuilder;

    use super::helpers::{local_crs, small_network};

    #[test]
    fn snap_exact_position() {
        let (net, [n0, ..]) = small_network();
        let (node, dist) = net.snap_to_node(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(node, n0);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn snap_nearest_with_distance() {
        let (net, [n0, n1, ..]) = small_network();
        let (node, dist) = net.snap_to_node(Point::new(40.0, 30.0)).unwrap();
        assert_eq!(node, n0);
        assert!((dist - 50.0).abs() < 1e-9);
        assert_eq!(net.snap_to_node(Point::new(60.0, 0.0)).unwrap().0, n1);
    }

    #[test]
    fn empty_network_returns_none() {
        let net = StreetNetworkBuilder::new(local_crs()).build().unwrap();
        assert!(net.snap_to_node(Point::new(0.0, 0.0)).is_none());
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use gs_core::{NodeId, Point};

    use crate::{DijkstraRouter, Router, SpatialError, StreetNetworkBuilder, shortest_route};

    use super::helpers::{local_crs, small_network};

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = small_network();
        let r = DijkstraRouter.route(&net, n0, n0).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.nodes, vec![n0]);
        assert_eq!(r.length_m, 0.0);
    }

    #[test]
    fn least_length_path() {
        let (net, [n0, n1, n2, _, n4]) = small_network();
        let route = shortest_route(&net, n0, n4).unwrap();
        assert_eq!(route.nodes, vec![n0, n1, n2, n4]);
        assert_eq!(route.edges.len(), 3);
        assert_eq!(route.length_m, 300.0);
        assert_eq!(net.edge_from[route.edges[0].index()], n0);
        assert_eq!(net.edge_to[route.edges[2].index()], n4);
        assert_eq!(
            route.geometry(&net),
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(200.0, 0.0),
                Point::new(200.0, 100.0),
            ]
        );
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = StreetNetworkBuilder::new(local_crs());
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(100.0, 0.0));
        let net = b.build().unwrap();
        assert!(matches!(shortest_route(&net, a, c), Err(SpatialError::NoRoute { .. })));
    }

    #[test]
    fn one_way_blocks_return() {
        let mut b = StreetNetworkBuilder::new(local_crs());
        let a = b.add_node(Point::new(0.0, 0.0));
        let c = b.add_node(Point::new(0.0, 100.0));
        b.add_directed_edge(a, c, 100.0);
        let net = b.build().unwrap();
        assert!(shortest_route(&net, a, c).is_ok());
        assert!(shortest_route(&net, c, a).is_err());
    }

    #[test]
    fn unknown_node_rejected() {
        let (net, [n0, ..]) = small_network();
        assert!(matches!(
            shortest_route(&net, n0, NodeId(99)),
            Err(SpatialError::NodeNotFound(NodeId(99)))
        ));
    }
}

// ── Interpolation ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod interpolation {
    use gs_core::Point;

    use crate::{SpatialError, interpolate_points};

    fn close(a: Point, b: Point) -> bool {
        (a.x() - b.x()).abs() < 1e-9 && (a.y() - b.y()).abs() < 1e-9
    }

    #[test]
    fn equal_arc_length_spacing() {
        let path = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let pts = interpolate_points(&path, 5).unwrap();
        let expected = [(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 5.0), (10.0, 10.0)];
        assert_eq!(pts.len(), 5);
        for (p, &(x, y)) in pts.iter().zip(&expected) {
            assert!(close(*p, Point::new(x, y)), "{p:?} != ({x}, {y})");
        }
    }

    #[test]
    fn endpoints_are_exact() {
        let path = [Point::new(0.1, 0.2), Point::new(3.3, 7.7), Point::new(-2.5, 9.1)];
        for n in [2, 3, 7, 50] {
            let pts = interpolate_points(&path, n).unwrap();
            assert_eq!(pts.len(), n);
            assert_eq!(pts[0], path[0]);
            assert_eq!(pts[n - 1], path[2]);
        }
    }

    #[test]
    fn zero_length_path() {
        let p = Point::new(4.0, 4.0);
        assert_eq!(interpolate_points(&[p, p], 3).unwrap(), vec![p, p, p]);
        assert_eq!(interpolate_points(&[p], 2).unwrap(), vec![p, p]);
    }

    #[test]
    fn rejects_bad_input() {
        let path = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert!(matches!(interpolate_points(&path, 1), Err(SpatialError::TooFewPoints(1))));
        assert!(matches!(interpolate_points(&[], 3), Err(SpatialError::EmptyPath)));
    }
}

// ── Noisy-point sampling ──────────────────────────────────────────────────────

#[cfg(test)]
mod noisy_point {
    use geo::{EuclideanDistance, Line};
    use gs_core::{AgentId, AgentRng, Point};

    use crate::{DEFAULT_MAX_SAMPLE_ATTEMPTS, SpatialError, sample_noisy_point};

    #[test]
    fn samples_lie_in_region() {
        let mut rng = AgentRng::new(5, AgentId(0));
        let (start, end) = (Point::new(0.0, 0.0), Point::new(12.0, 9.0));
        let segment = Line::new(start.0, end.0);
        for _ in 0..500 {
            let p = sample_noisy_point(start, end, 15.0, 2.0, &mut rng, DEFAULT_MAX_SAMPLE_ATTEMPTS).unwrap();
            assert!(p.euclidean_distance(&start) <= 15.0);
            assert!(p.euclidean_distance(&end) <= 15.0);
            assert!(p.euclidean_distance(&segment) <= 2.0);
        }
    }

    #[test]
    fn deterministic_per_seed() {
        let (start, end) = (Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let mut a = AgentRng::new(11, AgentId(4));
        let mut b = AgentRng::new(11, AgentId(4));
        let pa = sample_noisy_point(start, end, 10.0, 1.0, &mut a, 100).unwrap();
        let pb = sample_noisy_point(start, end, 10.0, 1.0, &mut b, 100).unwrap();
        assert_eq!(pa, pb);
    }

    #[test]
    fn disjoint_disks_fail_fast() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let r = sample_noisy_point(Point::new(0.0, 0.0), Point::new(20.0, 0.0), 10.0, 5.0, &mut rng, 10);
        assert!(matches!(r, Err(SpatialError::DegenerateSampleRegion { .. })));
    }

    #[test]
    fn zero_proximity_or_radius_fails() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let (s, e) = (Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!(sample_noisy_point(s, e, 10.0, 0.0, &mut rng, 10).is_err());
        assert!(sample_noisy_point(s, e, 0.0, 1.0, &mut rng, 10).is_err());
        assert!(sample_noisy_point(s, e, f64::NAN, 1.0, &mut rng, 10).is_err());
    }

    #[test]
    fn exhausted_attempts_fail() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let r = sample_noisy_point(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 10.0, 1.0, &mut rng, 0);
        assert!(matches!(r, Err(SpatialError::DegenerateSampleRegion { .. })));
    }
}

// ── Catalogs ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod catalog {
    use gs_core::{LocationId, NodeId, Point};

    use crate::{CatalogKind, CatalogPair, LocationCatalog, LocationEntry, SpatialError, StreetNetworkBuilder};

    use super::helpers::{local_crs, small_network};

    fn catalog() -> LocationCatalog {
        let (net, _) = small_network();
        LocationCatalog::build(
            CatalogKind::HomeWork,
            &net,
            vec![
                (10, Point::new(5.0, 5.0)),
                (11, Point::new(110.0, 0.0)),
                (12, Point::new(200.0, 90.0)),
                (13, Point::new(30.0, 40.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn entries_are_snapped_in_order() {
        let (_, [n0, n1, _, _, n4]) = small_network();
        let c = catalog();
        assert_eq!(c.len(), 4);
        let e = c.get(LocationId(1)).unwrap();
        assert_eq!(e.external_id, 11);
        assert_eq!(e.nearest_node, n1);
        assert!((e.distance_to_node - 10.0).abs() < 1e-9);
        assert_eq!(c.get(LocationId(0)).unwrap().nearest_node, n0);
        assert_eq!(c.get(LocationId(2)).unwrap().nearest_node, n4);
        assert!(matches!(c.entry(LocationId(4)), Err(SpatialError::LocationNotFound(_))));
    }

    #[test]
    fn within_is_strict_and_sorted() {
        let c = catalog();
        // (30,40) is exactly 50 m from the origin.
        assert_eq!(c.within(Point::new(0.0, 0.0), 50.0), vec![LocationId(0)]);
        assert_eq!(c.within(Point::new(0.0, 0.0), 50.001), vec![LocationId(0), LocationId(3)]);
        assert_eq!(c.within(Point::new(0.0, 0.0), 0.0), Vec::<LocationId>::new());
        assert_eq!(c.within(Point::new(0.0, 0.0), 1e6).len(), 4);
    }

    #[test]
    fn non_finite_centroid_is_rejected() {
        let (net, _) = small_network();
        let r = LocationCatalog::build(CatalogKind::Event, &net, vec![(1, Point::new(f64::NAN, 0.0))]);
        assert!(matches!(r, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn clones_answer_the_same_queries() {
        let (net, [n0, _, _, _, n4]) = small_network();
        let c = catalog();
        let (net2, c2) = (net.clone(), c.clone());
        assert_eq!(c2.within(Point::new(0.0, 0.0), 60.0), c.within(Point::new(0.0, 0.0), 60.0));
        assert_eq!(net2.snap_to_node(Point::new(190.0, 95.0)), net.snap_to_node(Point::new(190.0, 95.0)));
        assert_eq!(
            crate::shortest_route(&net2, n0, n4).unwrap().length_m,
            crate::shortest_route(&net, n0, n4).unwrap().length_m
        );
    }

    #[test]
    fn extent_is_bbox_diagonal() {
        let c = catalog();
        let expected = (195.0f64).hypot(90.0);
        assert!((c.extent() - expected).abs() < 1e-9);
    }

    #[test]
    fn build_on_empty_network_fails() {
        let net = StreetNetworkBuilder::new(local_crs()).build().unwrap();
        let r = LocationCatalog::build(CatalogKind::Event, &net, vec![(1, Point::new(0.0, 0.0))]);
        assert!(matches!(r, Err(SpatialError::EmptyNetwork)));
    }

    #[test]
    fn from_entries_checks_nodes() {
        let (net, _) = small_network();
        let entry = LocationEntry {
            id:               LocationId(0),
            centroid:         Point::new(0.0, 0.0),
            nearest_node:     NodeId(77),
            distance_to_node: 0.0,
            external_id:      1,
        };
        assert!(LocationCatalog::from_entries(CatalogKind::Event, &net, vec![entry]).is_err());
    }

    #[test]
    fn pair_checks_kinds() {
        let (net, _) = small_network();
        let hw = LocationCatalog::build(CatalogKind::HomeWork, &net, vec![]).unwrap();
        let ev = LocationCatalog::build(CatalogKind::Event, &net, vec![]).unwrap();
        let ev2 = LocationCatalog::build(CatalogKind::Event, &net, vec![]).unwrap();
        let hw2 = LocationCatalog::build(CatalogKind::HomeWork, &net, vec![]).unwrap();
        assert!(CatalogPair::new(hw, ev).is_ok());
        assert!(CatalogPair::new(ev2, hw2).is_err());
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use gs_core::Point;

    use crate::loader::{read_locations, read_network};
    use crate::{SpatialError, shortest_route};

    use super::helpers::local_crs;

    const NODES: &str = "node_id,x,y\n1001,0,0\n1002,30,40\n1003,30,140\n";
    const EDGES: &str = "from,to,length,oneway\n1001,1002,,false\n1002,1003,100,true\n";

    #[test]
    fn network_from_csv() {
        let net = read_network(Cursor::new(NODES), Cursor::new(EDGES), local_crs()).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 3);
        let (a, _) = net.snap_to_node(Point::new(0.0, 0.0)).unwrap();
        let (c, _) = net.snap_to_node(Point::new(30.0, 140.0)).unwrap();
        // Missing length falls back to the straight line (50 m).
        assert_eq!(shortest_route(&net, a, c).unwrap().length_m, 150.0);
        assert!(shortest_route(&net, c, a).is_err());
    }

    #[test]
    fn edges_without_optional_columns() {
        let edges = "from,to\n1001,1002\n";
        let net = read_network(Cursor::new(NODES), Cursor::new(edges), local_crs()).unwrap();
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.edge_length_m[0], 50.0);
    }

    #[test]
    fn unknown_node_reference() {
        let edges = "from,to,length\n1001,9999,10\n";
        let r = read_network(Cursor::new(NODES), Cursor::new(edges), local_crs());
        assert!(matches!(r, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn duplicate_node_id() {
        let nodes = "node_id,x,y\n1,0,0\n1,5,5\n";
        let r = read_network(Cursor::new(nodes), Cursor::new("from,to\n"), local_crs());
        assert!(matches!(r, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn locations_split_by_kind() {
        let net = read_network(Cursor::new(NODES), Cursor::new(EDGES), local_crs()).unwrap();
        let csv = "external_id,kind,x,y\n7,hw,1,1\n8,event,29,41\n9,hw,30,130\n";
        let pair = read_locations(Cursor::new(csv), &net).unwrap();
        assert_eq!(pair.home_work.len(), 2);
        assert_eq!(pair.events.len(), 1);
        let ev = pair.events.iter().next().unwrap();
        assert_eq!(ev.external_id, 8);
        assert!((ev.distance_to_node - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn non_finite_location_is_rejected() {
        let net = read_network(Cursor::new(NODES), Cursor::new(EDGES), local_crs()).unwrap();
        for csv in [
            "external_id,kind,x,y\n1,hw,NaN,0\n2,event,5,5\n",
            "external_id,kind,x,y\n1,hw,0,0\n2,event,5,inf\n",
        ] {
            assert!(matches!(read_locations(Cursor::new(csv), &net), Err(SpatialError::Parse(_))));
        }
    }

    #[test]
    fn bad_location_kind() {
        let net = read_network(Cursor::new(NODES), Cursor::new(EDGES), local_crs()).unwrap();
        let csv = "external_id,kind,x,y\n7,shop,1,1\n";
        assert!(matches!(read_locations(Cursor::new(csv), &net), Err(SpatialError::Parse(_))));
    }
}

// ── Synthetic layers ──────────────────────────────────────────────────────────

#[cfg(test)]
mod synthetic {
    use gs_core::{Point, SimRng};

    use crate::synthetic::{GridSpec, grid_network, scatter_catalogs};
    use crate::shortest_route;

    use super::helpers::local_crs;

    #[test]
    fn grid_shape() {
        let net = grid_network(&GridSpec::new(3, 4, 100.0), local_crs()).unwrap();
        assert_eq!(net.node_count(), 12);
        assert_eq!(net.edge_count(), 2 * (3 * 3 + 4 * 2));
        let (a, _) = net.snap_to_node(Point::new(0.0, 0.0)).unwrap();
        let (b, _) = net.snap_to_node(Point::new(300.0, 200.0)).unwrap();
        assert_eq!(shortest_route(&net, a, b).unwrap().length_m, 500.0);
    }

    #[test]
    fn grid_rejects_bad_shape() {
        assert!(grid_network(&GridSpec::new(0, 4, 100.0), local_crs()).is_err());
        assert!(grid_network(&GridSpec::new(2, 2, 0.0), local_crs()).is_err());
    }

    #[test]
    fn scattered_catalogs_stay_in_bounds() {
        let spec = GridSpec::new(5, 5, 50.0).with_origin(Point::new(1_000.0, 2_000.0));
        let net = grid_network(&spec, local_crs()).unwrap();
        let pair = scatter_catalogs(&net, 30, 20, &mut SimRng::new(3)).unwrap();
        assert_eq!(pair.home_work.len(), 30);
        assert_eq!(pair.events.len(), 20);
        for e in pair.home_work.iter().chain(pair.events.iter()) {
            assert!((1_000.0..=1_200.0).contains(&e.centroid.x()));
            assert!((2_000.0..=2_200.0).contains(&e.centroid.y()));
            assert!(e.distance_to_node <= 50.0);
        }
        assert_eq!(pair.events.iter().next().unwrap().external_id, 31);
    }

    #[test]
    fn scatter_is_reproducible() {
        let net = grid_network(&GridSpec::new(4, 4, 100.0), local_crs()).unwrap();
        let a = scatter_catalogs(&net, 10, 10, &mut SimRng::new(8)).unwrap();
        let b = scatter_catalogs(&net, 10, 10, &mut SimRng::new(8)).unwrap();
        let xs = |p: &crate::CatalogPair| p.home_work.iter().map(|e| e.centroid).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
    }
}
