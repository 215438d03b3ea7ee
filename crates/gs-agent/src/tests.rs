//! Unit tests for gs-agent.

#[cfg(test)]
mod helpers {
    use gs_core::{Crs, GeoPoint, Point, SimRng};
    use gs_spatial::synthetic::{GridSpec, grid_network, scatter_catalogs};
    use gs_spatial::{CatalogKind, CatalogPair, LocationCatalog, StreetNetwork};

    pub fn local_crs() -> Crs {
        Crs::Local { origin: GeoPoint::new(13.40, 52.52) }
    }

    /// 1 km × 1 km grid with 200 home/work and 200 event locations.
    pub fn town() -> (StreetNetwork, CatalogPair) {
        let net = grid_network(&GridSpec::new(11, 11, 100.0), local_crs()).unwrap();
        let cats = scatter_catalogs(&net, 200, 200, &mut SimRng::new(2024)).unwrap();
        (net, cats)
    }

    /// Catalogs from explicit points on `town`'s grid.
    pub fn catalogs(net: &StreetNetwork, hw: &[(f64, f64)], events: &[(f64, f64)]) -> CatalogPair {
        let pts = |xs: &[(f64, f64)], base: i64| {
            xs.iter()
                .enumerate()
                .map(|(i, &(x, y))| (base + i as i64, Point::new(x, y)))
                .collect::<Vec<_>>()
        };
        CatalogPair::new(
            LocationCatalog::build(CatalogKind::HomeWork, net, pts(hw, 100)).unwrap(),
            LocationCatalog::build(CatalogKind::Event, net, pts(events, 500)).unwrap(),
        )
        .unwrap()
    }

    /// `n` points in a tight cluster around `(cx, cy)`.
    pub fn cluster(cx: f64, cy: f64, n: usize) -> Vec<(f64, f64)> {
        (0..n).map(|i| (cx + (i % 5) as f64 * 3.0, cy + (i / 5) as f64 * 3.0)).collect()
    }
}

// ── Anchors ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod anchors {
    use gs_core::LocationId as L;

    use crate::{AgentError, Anchors};

    #[test]
    fn valid_set() {
        let a = Anchors::new(L(0), L(1), vec![L(2), L(3), L(4)]).unwrap();
        assert_eq!(a.home(), L(0));
        assert_eq!(a.work(), L(1));
        assert_eq!(a.regular(), &[L(2), L(3), L(4)]);
    }

    #[test]
    fn home_equals_work_rejected() {
        let r = Anchors::new(L(1), L(1), vec![L(2), L(3), L(4)]);
        assert!(matches!(r, Err(AgentError::InvalidAnchors(_))));
    }

    #[test]
    fn regular_count_bounds() {
        assert!(Anchors::new(L(0), L(1), vec![L(2), L(3)]).is_err());
        assert!(Anchors::new(L(0), L(1), (2..8).map(L).collect()).is_err());
        assert!(Anchors::new(L(0), L(1), (2..7).map(L).collect()).is_ok());
    }

    #[test]
    fn regular_duplicates_and_overlap_rejected() {
        assert!(Anchors::new(L(0), L(1), vec![L(2), L(2), L(4)]).is_err());
        assert!(Anchors::new(L(0), L(1), vec![L(2), L(0), L(4)]).is_err());
        assert!(Anchors::new(L(0), L(1), vec![L(1), L(3), L(4)]).is_err());
    }

    #[test]
    fn external_ids_resolve_through_catalogs() {
        let (net, _) = super::helpers::town();
        let cats = super::helpers::catalogs(
            &net,
            &[(0.0, 0.0), (10.0, 0.0)],
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)],
        );
        let a = Anchors::new(L(1), L(0), vec![L(4), L(2), L(3)]).unwrap();
        assert_eq!(a.external_ids(&cats).unwrap(), (101, 100, vec![504, 502, 503]));
    }
}

// ── Buffer-containment policy ─────────────────────────────────────────────────

#[cfg(test)]
mod buffer_policy {
    use geo::EuclideanDistance;
    use gs_core::{AgentId, AgentRng};

    use crate::{AgentError, AnchorSelector, BufferContainment, RetryLimits};

    use super::helpers::{catalogs, cluster, town};

    #[test]
    fn anchors_respect_buffers_and_invariants() {
        let (net, cats) = town();
        let policy = BufferContainment::new(300.0, 200.0);
        for i in 0..50 {
            let mut rng = AgentRng::new(7, AgentId(i));
            let a = policy.select(&net, &cats, &mut rng, &RetryLimits::default()).unwrap();
            assert_ne!(a.home(), a.work());
            assert!((3..=5).contains(&a.regular().len()));

            let home = cats.home_work.get(a.home()).unwrap().centroid;
            let work = cats.home_work.get(a.work()).unwrap().centroid;
            assert!(home.euclidean_distance(&work) < 300.0);
            for (j, r) in a.regular().iter().enumerate() {
                assert!(!a.regular()[..j].contains(r));
                assert!(*r != a.home() && *r != a.work());
            }
        }
    }

    #[test]
    fn same_seed_same_anchors() {
        let (net, cats) = town();
        let policy = BufferContainment::new(300.0, 200.0);
        let pick = |seed| {
            let mut rng = AgentRng::new(seed, AgentId(3));
            policy.select(&net, &cats, &mut rng, &RetryLimits::default()).unwrap()
        };
        assert_eq!(pick(99), pick(99));
    }

    #[test]
    fn sparse_home_work_catalog_fails() {
        let (net, _) = town();
        let cats = catalogs(&net, &cluster(500.0, 500.0, 5), &cluster(500.0, 500.0, 40));
        let policy = BufferContainment::new(300.0, 200.0);
        let limits = RetryLimits { max_home_draws: 50, ..RetryLimits::default() };
        let r = policy.select(&net, &cats, &mut AgentRng::new(1, AgentId(0)), &limits);
        assert!(matches!(r, Err(AgentError::InsufficientCandidates { what: "work", .. })));
    }

    #[test]
    fn regular_buffer_grows_to_reach_events() {
        let (net, _) = town();
        // Homes near the origin, every event ~1 km away.
        let cats = catalogs(&net, &cluster(0.0, 0.0, 25), &cluster(700.0, 700.0, 25));
        let policy = BufferContainment::new(100.0, 50.0);
        let a = policy
            .select(&net, &cats, &mut AgentRng::new(4, AgentId(0)), &RetryLimits::default())
            .unwrap();
        assert!((3..=5).contains(&a.regular().len()));
    }

    #[test]
    fn too_few_events_terminates() {
        let (net, _) = town();
        let cats = catalogs(&net, &cluster(0.0, 0.0, 25), &cluster(700.0, 700.0, 2));
        let mut policy = BufferContainment::new(100.0, 50.0);
        policy.min_candidates = 1;
        let r = policy.select(&net, &cats, &mut AgentRng::new(4, AgentId(0)), &RetryLimits::default());
        assert!(matches!(
            r,
            Err(AgentError::InsufficientCandidates { what: "regular locations", .. })
        ));
    }

    #[test]
    fn empty_catalog_fails_immediately() {
        let (net, _) = town();
        let cats = catalogs(&net, &[], &cluster(0.0, 0.0, 30));
        let r = BufferContainment::new(100.0, 100.0).select(
            &net,
            &cats,
            &mut AgentRng::new(0, AgentId(0)),
            &RetryLimits::default(),
        );
        assert!(matches!(r, Err(AgentError::InsufficientCandidates { .. })));
    }
}

// ── Minimum-distance policy ───────────────────────────────────────────────────

#[cfg(test)]
mod distance_policy {
    use geo::EuclideanDistance;
    use gs_core::{AgentId, AgentRng};

    use crate::{AgentError, AnchorPolicy, AnchorSelector, MinimumDistance, RetryLimits};

    use super::helpers::town;

    #[test]
    fn distances_are_respected() {
        let (net, cats) = town();
        let policy = AnchorPolicy::MinimumDistance(MinimumDistance::new(400.0, 200.0));
        for i in 0..30 {
            let mut rng = AgentRng::new(11, AgentId(i));
            let a = policy.select(&net, &cats, &mut rng, &RetryLimits::default()).unwrap();
            let h = cats.home_work.get(a.home()).unwrap();
            let w = cats.home_work.get(a.work()).unwrap();
            let hn = net.position(h.nearest_node).unwrap();
            let wn = net.position(w.nearest_node).unwrap();
            assert!(hn.euclidean_distance(&wn) + h.distance_to_node + w.distance_to_node >= 400.0);
            for r in a.regular() {
                let e = cats.events.get(*r).unwrap();
                let en = net.position(e.nearest_node).unwrap();
                assert!(en.euclidean_distance(&wn) + e.distance_to_node + w.distance_to_node >= 200.0);
            }
        }
    }

    #[test]
    fn unreachable_distance_fails() {
        let (net, cats) = town();
        let policy = MinimumDistance::new(50_000.0, 0.0);
        let limits = RetryLimits { max_home_draws: 200, ..RetryLimits::default() };
        let r = policy.select(&net, &cats, &mut AgentRng::new(0, AgentId(0)), &limits);
        assert!(matches!(
            r,
            Err(AgentError::InsufficientCandidates { what: "home/work pair", attempts: 200 })
        ));
    }
}

// ── Profiles & configuration ──────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use gs_core::{CoreError, DateRange};

    use crate::{
        AgentConfig, AnchorPolicy, BufferContainment, HourRange, MinimumDistance, MobilityProfile, RetryLimits,
    };

    fn dates() -> DateRange {
        DateRange::parse("2023-12-04", "2023-12-10").unwrap()
    }

    #[test]
    fn default_profile_is_valid() {
        let p = MobilityProfile::new(1.5, 5.0);
        assert!(p.validate().is_ok());
        assert_eq!(p.waypoint_spacing_m(), 15.0);
        assert_eq!(p.schedule.weekday_leave_home, HourRange::new(7, 9));
        assert_eq!(p.itinerary.weekday, vec![0.6, 0.25, 0.1, 0.05]);
    }

    #[test]
    fn non_positive_motion_rejected() {
        assert!(MobilityProfile::new(0.0, 5.0).validate().is_err());
        assert!(MobilityProfile::new(-1.0, 5.0).validate().is_err());
        assert!(MobilityProfile::new(1.5, 0.0).validate().is_err());
        assert!(MobilityProfile::new(f64::NAN, 5.0).validate().is_err());
    }

    #[test]
    fn malformed_rules_rejected() {
        let mut p = MobilityProfile::new(1.5, 5.0);
        p.schedule.event_stay = HourRange::new(3, 1);
        assert!(p.validate().is_err());

        let mut p = MobilityProfile::new(1.5, 5.0);
        p.itinerary.weekend = vec![0.0, 0.0];
        assert!(p.validate().is_err());

        let mut p = MobilityProfile::new(1.5, 5.0);
        p.itinerary.regular_share = 1.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn policy_validation() {
        let ok = AgentConfig::new(
            dates(),
            MobilityProfile::new(1.5, 5.0),
            AnchorPolicy::BufferContainment(BufferContainment::new(1_000.0, 500.0)),
        );
        assert!(ok.validate().is_ok());

        let mut bad = ok.clone();
        bad.policy = AnchorPolicy::BufferContainment(BufferContainment::new(0.0, 500.0));
        assert!(bad.validate().is_err());

        bad.policy = AnchorPolicy::MinimumDistance(MinimumDistance::new(-5.0, 10.0));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn zero_retry_caps_rejected() {
        assert!(RetryLimits::default().validate().is_ok());
        let zeroed = [
            RetryLimits { max_home_draws: 0, ..RetryLimits::default() },
            RetryLimits { max_candidate_draws: 0, ..RetryLimits::default() },
            RetryLimits { max_sample_attempts: 0, ..RetryLimits::default() },
        ];
        for limits in zeroed {
            assert!(matches!(limits.validate(), Err(CoreError::InvalidConfiguration(_))));
        }
    }
}

// ── Agent initialisation ──────────────────────────────────────────────────────

#[cfg(test)]
mod agent {
    use gs_core::{AgentId, AgentRng};

    use crate::{Agent, AnchorPolicy, BufferContainment, RetryLimits};

    #[test]
    fn initialize_assigns_anchors() {
        let (net, cats) = super::helpers::town();
        let policy = AnchorPolicy::BufferContainment(BufferContainment::new(300.0, 200.0));
        let id = AgentId(12);
        let agent = Agent::initialize(
            id,
            &policy,
            &net,
            &cats,
            &mut AgentRng::new(5, id),
            &RetryLimits::default(),
        )
        .unwrap();
        assert_eq!(agent.id, id);
        assert_ne!(agent.anchors.home(), agent.anchors.work());
    }
}
