use tracing::{debug, warn};

use crate::error::{RegistryError, Result};
use crate::math::Coord;

use super::assemble::{assemble_edges, candidate_pairs};
use super::kruskal::KruskalMst;
use super::triangulate::{DelaunayTriangulator, Triangulator};
use super::{AirWire, AirWires, Point, PointId, RatsnestParams};

/// Accumulates the points and routed connections of one net and computes
/// the air wires that still have to be routed.
///
/// ```
/// use airwires::AirWiresBuilder;
///
/// let mut builder = AirWiresBuilder::new();
/// let a = builder.add_point(0, 0);
/// let b = builder.add_point(1_000_000, 0);
/// builder.add_point(2_000_000, 0);
/// builder.add_connection(a, b);
///
/// let wires = builder.build_air_wires();
/// assert_eq!(wires.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AirWiresBuilder {
    points: Vec<Point>,
    connections: Vec<(PointId, PointId)>,
    params: RatsnestParams,
}

impl AirWiresBuilder {
    /// Creates an empty builder with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with custom parameters.
    #[must_use]
    pub fn with_params(params: RatsnestParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Adds a point at `(x, y)` nanometres and returns its id.
    ///
    /// Duplicate positions are allowed.
    pub fn add_point(&mut self, x: i64, y: i64) -> PointId {
        self.add_point_at(Coord::new(x, y))
    }

    /// Adds a point at `position` and returns its id.
    pub fn add_point_at(&mut self, position: Coord) -> PointId {
        let id = self.points.len();
        self.points.push(Point { id, position });
        id
    }

    /// Records an existing connection between two registered points.
    ///
    /// # Errors
    ///
    /// Returns an error if either id was not returned by [`Self::add_point`].
    pub fn try_add_connection(&mut self, a: PointId, b: PointId) -> Result<()> {
        let count = self.points.len();
        for id in [a, b] {
            if id >= count {
                return Err(RegistryError::PointOutOfRange { id, count }.into());
            }
        }
        self.connections.push((a, b));
        Ok(())
    }

    /// Records an existing connection between two registered points.
    ///
    /// Unknown ids are a caller bug: this panics in debug builds and drops the
    /// connection in release builds.
    pub fn add_connection(&mut self, a: PointId, b: PointId) {
        if let Err(err) = self.try_add_connection(a, b) {
            if cfg!(debug_assertions) {
                panic!("add_connection({a}, {b}): {err}");
            }
            warn!(%err, "ignoring connection to unknown point");
        }
    }

    /// Registered points, indexed by id.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Registered connections in insertion order.
    #[must_use]
    pub fn connections(&self) -> &[(PointId, PointId)] {
        &self.connections
    }

    /// Parameters used by the degenerate-case classifier.
    #[must_use]
    pub fn params(&self) -> &RatsnestParams {
        &self.params
    }

    /// Computes the air wires using Delaunay triangulation for candidate edges.
    #[must_use]
    pub fn build_air_wires(&self) -> AirWires {
        self.build_air_wires_with(&DelaunayTriangulator)
    }

    /// Computes the air wires using `triangulator` for point sets in general position.
    #[must_use]
    pub fn build_air_wires_with(&self, triangulator: &dyn Triangulator) -> AirWires {
        let (strategy, candidates) = candidate_pairs(&self.points, &self.params, triangulator);
        let edges = assemble_edges(&self.points, &self.connections, &candidates);
        let wires: AirWires = KruskalMst::new(self.points.len(), edges)
            .execute()
            .into_iter()
            .map(|(a, b)| AirWire::new(self.points[a], self.points[b]))
            .collect();

        debug!(
            points = self.points.len(),
            connections = self.connections.len(),
            ?strategy,
            air_wires = wires.len(),
            "built air wires"
        );
        wires
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
mod tests {
    use super::*;
    use crate::error::AirWiresError;
    use crate::ratsnest::kruskal::DisjointSet;
    use crate::ratsnest::{classify, normalize, total_length, CandidateStrategy, CompleteGraph};
    use approx::assert_relative_eq;

    type Segment = ((i64, i64), (i64, i64));

    /// Routes `tracing` output to the test harness; set `RUST_LOG=airwires=trace` to see it.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn builder(coords: &[(i64, i64)]) -> AirWiresBuilder {
        let mut b = AirWiresBuilder::new();
        for &(x, y) in coords {
            b.add_point(x, y);
        }
        b
    }

    fn segments(wires: AirWires) -> Vec<Segment> {
        normalize(wires)
            .iter()
            .map(|w| {
                let (a, b) = w.positions();
                ((a.x, a.y), (b.x, b.y))
            })
            .collect()
    }

    /// Minimum spanning tree over every pair of points, bypassing the classifier.
    fn all_pairs_mst(b: &AirWiresBuilder) -> AirWires {
        let pairs = CompleteGraph.triangulate(b.points()).unwrap();
        let edges = assemble_edges(b.points(), b.connections(), &pairs);
        KruskalMst::new(b.points().len(), edges)
            .execute()
            .into_iter()
            .map(|(x, y)| AirWire::new(b.points()[x], b.points()[y]))
            .collect()
    }

    fn assert_minimal(b: &AirWiresBuilder, wires: &[AirWire]) {
        let reference = all_pairs_mst(b);
        assert_eq!(wires.len(), reference.len());
        assert_relative_eq!(
            total_length(wires),
            total_length(&reference),
            max_relative = 1e-12
        );
    }

    /// Component count of the points joined by connections alone.
    fn connected_components(b: &AirWiresBuilder) -> usize {
        let mut forest = DisjointSet::new(b.points().len());
        for &(x, y) in b.connections() {
            forest.union(x, y);
        }
        forest.component_count()
    }

    /// Deterministic linear congruential generator for generated nets.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            self.0 >> 33
        }

        /// Value in `lo..hi`.
        fn range(&mut self, lo: i64, hi: i64) -> i64 {
            lo + (self.next() % (hi - lo) as u64) as i64
        }

        fn connect_randomly(&mut self, b: &mut AirWiresBuilder) {
            let n = b.points().len() as i64;
            if n == 0 {
                return;
            }
            for _ in 0..self.range(0, n) {
                let x = self.range(0, n) as usize;
                let y = self.range(0, n) as usize;
                b.add_connection(x, y);
            }
        }
    }

    /// Asserts that connections plus wires join every point into one component.
    fn assert_fully_connected(b: &AirWiresBuilder, wires: &[AirWire]) {
        let mut forest = DisjointSet::new(b.points().len());
        for &(x, y) in b.connections() {
            forest.union(x, y);
        }
        for w in wires {
            assert!(forest.union(w.a.id, w.b.id), "redundant wire {w:?}");
        }
        assert!(forest.component_count() <= 1);
    }

    // ── trivial cardinalities ──

    #[test]
    fn empty() {
        assert!(AirWiresBuilder::new().build_air_wires().is_empty());
    }

    #[test]
    fn one_point() {
        assert!(builder(&[(100, 200)]).build_air_wires().is_empty());
    }

    #[test]
    fn two_unconnected_points() {
        let wires = builder(&[(100, 200), (300, 400)]).build_air_wires();
        assert_eq!(segments(wires), vec![((100, 200), (300, 400))]);
    }

    #[test]
    fn two_unconnected_overlapping_points() {
        let wires = builder(&[(100, 200), (100, 200)]).build_air_wires();
        assert_eq!(wires.len(), 1);
        assert_eq!(wires[0].length_squared(), 0);
        assert_eq!(segments(wires), vec![((100, 200), (100, 200))]);
    }

    #[test]
    fn two_connected_points() {
        let mut b = builder(&[(100, 200), (300, 400)]);
        b.add_connection(0, 1);
        assert!(b.build_air_wires().is_empty());
    }

    // ── general position ──

    #[test]
    fn three_unconnected_points() {
        let wires =
            builder(&[(100_000, 200_000), (300_000, 400_000), (-50_000, -50_000)]).build_air_wires();
        assert_eq!(
            segments(wires),
            vec![
                ((-50_000, -50_000), (100_000, 200_000)),
                ((100_000, 200_000), (300_000, 400_000)),
            ]
        );
    }

    #[test]
    fn tiny_triangle_chain_still_finds_shortest_tree() {
        // Every point is within 1 µm of the first, so no direction is reliable.
        let b = builder(&[(-5, 0), (10, 0), (0, -100)]);
        assert_eq!(classify(b.points(), b.params()), CandidateStrategy::SortedChain);
        assert_eq!(
            segments(b.build_air_wires()),
            vec![((-5, 0), (0, -100)), ((-5, 0), (10, 0))]
        );
    }

    #[test]
    fn three_unconnected_points_v_shape() {
        let wires = builder(&[(-5_000, 0), (10_000, 0), (0, -100_000)]).build_air_wires();
        assert_eq!(
            segments(wires),
            vec![((-5_000, 0), (0, -100_000)), ((-5_000, 0), (10_000, 0))]
        );
    }

    #[test]
    fn three_nearly_aligned_board_points() {
        let wires = builder(&[
            (71_437_500, 78_898_800),
            (70_485_000, 80_010_000),
            (72_707_500, 77_470_000),
        ])
        .build_air_wires();
        assert_eq!(
            segments(wires),
            vec![
                ((70_485_000, 80_010_000), (71_437_500, 78_898_800)),
                ((71_437_500, 78_898_800), (72_707_500, 77_470_000)),
            ]
        );
    }

    #[test]
    fn three_points_match_brute_force() {
        let b = builder(&[(0, 0), (4_000_000, 1_000_000), (1_000_000, 5_000_000)]);
        let delaunay = b.build_air_wires();
        let brute = b.build_air_wires_with(&CompleteGraph);
        assert_eq!(delaunay.len(), 2);
        assert_relative_eq!(total_length(&delaunay), total_length(&brute));
    }

    #[test]
    fn scattered_points_match_brute_force() {
        init_tracing();
        let b = builder(&[
            (0, 0),
            (12_000_000, 3_000_000),
            (5_500_000, 9_100_000),
            (-7_000_000, 4_400_000),
            (2_000_000, -6_300_000),
            (9_900_000, -8_800_000),
            (-3_300_000, -2_000_000),
            (6_000_000, 6_000_000),
            (1_000_000, 1_000_000),
            (1_000_000, 1_000_000),
        ]);
        let delaunay = b.build_air_wires();
        let brute = b.build_air_wires_with(&CompleteGraph);
        assert_eq!(delaunay.len(), 9);
        assert_relative_eq!(total_length(&delaunay), total_length(&brute), max_relative = 1e-12);
        assert_fully_connected(&b, &delaunay);
    }

    // ── collinear ──

    #[test]
    fn three_unconnected_collinear_points() {
        let wires = builder(&[(0, 0), (100, 0), (-100, 0)]).build_air_wires();
        assert_eq!(
            segments(wires),
            vec![((-100, 0), (0, 0)), ((0, 0), (100, 0))]
        );
    }

    #[test]
    fn three_collinear_points_far_apart() {
        let wires =
            builder(&[(0, 0), (100_000_000, 0), (-100_000_000, 0)]).build_air_wires();
        assert_eq!(
            segments(wires),
            vec![((-100_000_000, 0), (0, 0)), ((0, 0), (100_000_000, 0))]
        );
    }

    #[test]
    fn three_unconnected_diagonal_collinear_points() {
        let wires = builder(&[(0, 0), (100, 100), (200, 200)]).build_air_wires();
        assert_eq!(
            segments(wires),
            vec![((0, 0), (100, 100)), ((100, 100), (200, 200))]
        );
    }

    #[test]
    fn vertical_collinear_points() {
        let wires =
            builder(&[(0, 5_000_000), (0, -5_000_000), (0, 0)]).build_air_wires();
        assert_eq!(
            segments(wires),
            vec![((0, -5_000_000), (0, 0)), ((0, 0), (0, 5_000_000))]
        );
    }

    #[test]
    fn partly_connected_collinear_points() {
        init_tracing();
        let mut b = builder(&[
            (0, 0),
            (10, 10),
            (20, 20),
            (30, 30),
            (40, 40),
            (50, 50),
            (60, 60),
        ]);
        b.add_connection(1, 2);
        let wires = b.build_air_wires();
        assert_fully_connected(&b, &wires);
        assert_eq!(
            segments(wires),
            vec![
                ((0, 0), (10, 10)),
                ((20, 20), (30, 30)),
                ((30, 30), (40, 40)),
                ((40, 40), (50, 50)),
                ((50, 50), (60, 60)),
            ]
        );
    }

    #[test]
    fn connection_in_middle_of_chain_is_not_repeated() {
        let mut b = builder(&[
            (0, 0),
            (1_000_000, 0),
            (2_000_000, 0),
            (3_000_000, 0),
            (4_000_000, 0),
            (5_000_000, 0),
            (6_000_000, 0),
        ]);
        b.add_connection(2, 3);
        let wires = b.build_air_wires();
        assert_eq!(wires.len(), 5);
        assert!(!wires
            .iter()
            .any(|w| matches!((w.a.id, w.b.id), (2, 3) | (3, 2))));
        assert_fully_connected(&b, &wires);
    }

    #[test]
    fn near_vertical_chain_is_minimal() {
        let b = builder(&[(0, 0), (1, 10_000_000), (0, 20_000_000)]);
        assert_eq!(classify(b.points(), b.params()), CandidateStrategy::SortedChain);
        let wires = b.build_air_wires();
        assert_minimal(&b, &wires);
        assert!(total_length(&wires) < 20_000_001.0);
    }

    #[test]
    fn chain_with_point_inside_micrometre_is_minimal() {
        let b = builder(&[(0, 0), (500, 0), (0, 10_000_000), (0, -10_000_000)]);
        assert_eq!(classify(b.points(), b.params()), CandidateStrategy::SortedChain);
        let wires = b.build_air_wires();
        assert_minimal(&b, &wires);
        assert_relative_eq!(total_length(&wires), 20_000_500.0);
    }

    #[test]
    fn generated_collinear_nets_are_minimal() {
        let directions = [(1, 0), (0, 1), (1, 1), (3, -7), (1, 1_000), (-250, 1)];
        let mut rng = Lcg(0x5eed);
        for (round, &(dx, dy)) in directions.iter().cycle().take(60).enumerate() {
            let origin = (rng.range(-5_000_000, 5_000_000), rng.range(-5_000_000, 5_000_000));
            let n = rng.range(3, 12);
            let mut b = AirWiresBuilder::new();
            for _ in 0..n {
                let t = rng.range(-40, 40) * 1_000;
                b.add_point(origin.0 + t * dx, origin.1 + t * dy);
            }
            rng.connect_randomly(&mut b);

            assert_eq!(
                classify(b.points(), b.params()),
                CandidateStrategy::SortedChain,
                "round {round}"
            );
            let wires = b.build_air_wires();
            assert_minimal(&b, &wires);
            assert_eq!(wires.len(), connected_components(&b) - 1, "round {round}");
            assert_fully_connected(&b, &wires);
        }
    }

    #[test]
    fn generated_nets_are_minimal_and_connected() {
        let mut rng = Lcg(42);
        for round in 0..80 {
            let n = rng.range(0, 16);
            let mut b = AirWiresBuilder::new();
            for _ in 0..n {
                let x = rng.range(-20_000_000, 20_000_000);
                let y = rng.range(-20_000_000, 20_000_000);
                b.add_point(x, y);
            }
            rng.connect_randomly(&mut b);

            let wires = b.build_air_wires();
            assert_minimal(&b, &wires);
            assert_eq!(
                wires.len(),
                connected_components(&b).saturating_sub(1),
                "round {round}"
            );
            assert_fully_connected(&b, &wires);
        }
    }

    // ── pre-existing connectivity ──

    #[test]
    fn fully_routed_net_needs_no_wires() {
        let mut b = builder(&[(0, 0), (5_000_000, 0), (0, 5_000_000), (5_000_000, 5_000_000)]);
        b.add_connection(0, 1);
        b.add_connection(1, 3);
        b.add_connection(3, 2);
        assert!(b.build_air_wires().is_empty());
    }

    #[test]
    fn connected_groups_are_joined_once() {
        let mut b = builder(&[
            (0, 0),
            (1_000_000, 0),
            (0, 1_000_000),
            (10_000_000, 10_000_000),
            (11_000_000, 10_000_000),
            (10_000_000, 11_000_000),
        ]);
        b.add_connection(0, 1);
        b.add_connection(1, 2);
        b.add_connection(3, 4);
        b.add_connection(4, 5);
        let wires = b.build_air_wires();
        assert_eq!(wires.len(), 1);
        assert_fully_connected(&b, &wires);
    }

    #[test]
    fn output_count_matches_component_reduction() {
        let mut b = builder(&[
            (0, 0),
            (3_000_000, 1_000_000),
            (6_000_000, -2_000_000),
            (2_000_000, 7_000_000),
            (-4_000_000, 3_000_000),
        ]);
        b.add_connection(0, 1);
        b.add_connection(1, 0);
        b.add_connection(3, 3);
        let wires = b.build_air_wires();
        assert_eq!(wires.len(), connected_components(&b) - 1);
        assert_fully_connected(&b, &wires);
    }

    // ── determinism and contract ──

    #[test]
    fn building_twice_is_identical() {
        let mut b = builder(&[(0, 0), (7, 3), (2, 9), (5, 5), (-4, 6)]);
        b.add_connection(0, 3);
        assert_eq!(b.build_air_wires(), b.build_air_wires());
    }

    #[test]
    fn ids_are_sequential() {
        let mut b = AirWiresBuilder::new();
        assert_eq!(b.add_point(1, 1), 0);
        assert_eq!(b.add_point(1, 1), 1);
        assert_eq!(b.add_point_at(Coord::new(2, 2)), 2);
        assert_eq!(b.points()[1].id, 1);
    }

    #[test]
    fn out_of_range_connection_is_rejected() {
        let mut b = builder(&[(0, 0)]);
        let err = b.try_add_connection(0, 3).unwrap_err();
        assert!(matches!(
            err,
            AirWiresError::Registry(RegistryError::PointOutOfRange { id: 3, count: 1 })
        ));
        assert!(b.connections().is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "add_connection")]
    fn add_connection_with_unknown_id_panics_in_debug() {
        let mut b = builder(&[(0, 0)]);
        b.add_connection(0, 1);
    }

    #[test]
    fn custom_params_are_kept() {
        let params = RatsnestParams {
            collinear_min_distance_sq: 0.0,
            collinear_angle_tolerance: 1e-3,
        };
        let b = AirWiresBuilder::with_params(params);
        assert_eq!(*b.params(), params);
    }
}
