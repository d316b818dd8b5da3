use tracing::{debug, warn};

use crate::math::distance_2d::distance_squared;

use super::classify::{classify, sorted_chain, CandidateStrategy};
use super::triangulate::{CompleteGraph, Triangulator};
use super::{Point, PointId, RatsnestParams};

/// Cost of an edge in the spanning-tree sweep.
///
/// `Connected` orders before every `Distance`, so pre-existing connections are
/// always consumed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weight {
    /// Already physically connected; free and never emitted.
    Connected,
    /// Squared Euclidean distance in nm².
    Distance(u128),
}

impl Weight {
    /// Returns `true` for a real geometric candidate.
    #[must_use]
    pub fn is_distance(self) -> bool {
        matches!(self, Self::Distance(_))
    }
}

/// A weighted edge between two registered points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateEdge {
    /// First endpoint id.
    pub a: PointId,
    /// Second endpoint id.
    pub b: PointId,
    /// Sweep cost of this edge.
    pub weight: Weight,
}

/// Derives the unweighted candidate edges for `points`.
///
/// A failing triangulator is replaced by the complete graph, which yields the
/// same spanning tree at quadratic cost.
#[must_use]
pub fn candidate_pairs(
    points: &[Point],
    params: &RatsnestParams,
    triangulator: &dyn Triangulator,
) -> (CandidateStrategy, Vec<(PointId, PointId)>) {
    let strategy = classify(points, params);
    let pairs = match strategy {
        CandidateStrategy::None => Vec::new(),
        CandidateStrategy::Pair => vec![(points[0].id, points[1].id)],
        CandidateStrategy::SortedChain => sorted_chain(points, params),
        CandidateStrategy::Triangulation => match triangulator.triangulate(points) {
            Ok(pairs) => pairs,
            Err(err) => {
                warn!(%err, points = points.len(), "triangulation failed, using complete graph");
                complete_graph(points)
            }
        },
    };
    debug!(?strategy, candidates = pairs.len(), "derived candidate edges");
    (strategy, pairs)
}

fn complete_graph(points: &[Point]) -> Vec<(PointId, PointId)> {
    CompleteGraph.triangulate(points).unwrap_or_default()
}

/// Combines pre-existing connections (free) with distance-weighted candidates.
#[must_use]
pub fn assemble_edges(
    points: &[Point],
    connections: &[(PointId, PointId)],
    candidates: &[(PointId, PointId)],
) -> Vec<CandidateEdge> {
    let connected = connections.iter().map(|&(a, b)| CandidateEdge {
        a,
        b,
        weight: Weight::Connected,
    });
    let weighted = candidates.iter().map(|&(a, b)| CandidateEdge {
        a,
        b,
        weight: Weight::Distance(distance_squared(&points[a].position, &points[b].position)),
    });
    connected.chain(weighted).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TriangulationError};
    use crate::math::Coord;
    use crate::ratsnest::DelaunayTriangulator;

    fn points(coords: &[(i64, i64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| Point {
                id,
                position: Coord::new(x, y),
            })
            .collect()
    }

    struct Failing;

    impl Triangulator for Failing {
        fn triangulate(&self, _points: &[Point]) -> Result<Vec<(PointId, PointId)>> {
            Err(TriangulationError::Insertion("unsupported".into()).into())
        }
    }

    #[test]
    fn connected_sorts_before_any_distance() {
        assert!(Weight::Connected < Weight::Distance(0));
        assert!(Weight::Distance(0) < Weight::Distance(1));
        assert!(!Weight::Connected.is_distance());
        assert!(Weight::Distance(7).is_distance());
    }

    #[test]
    fn pair_strategy_emits_single_edge() {
        let pts = points(&[(100, 200), (300, 400)]);
        let (strategy, pairs) =
            candidate_pairs(&pts, &RatsnestParams::default(), &DelaunayTriangulator);
        assert_eq!(strategy, CandidateStrategy::Pair);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn no_candidates_for_single_point() {
        let pts = points(&[(100, 200)]);
        let (strategy, pairs) = candidate_pairs(&pts, &RatsnestParams::default(), &Failing);
        assert_eq!(strategy, CandidateStrategy::None);
        assert!(pairs.is_empty());
    }

    #[test]
    fn failing_triangulator_falls_back_to_complete_graph() {
        let pts = points(&[(0, 0), (10_000_000, 0), (0, 10_000_000), (7_000_000, 8_000_000)]);
        let (strategy, pairs) = candidate_pairs(&pts, &RatsnestParams::default(), &Failing);
        assert_eq!(strategy, CandidateStrategy::Triangulation);
        assert_eq!(pairs.len(), 6);
    }

    #[test]
    fn assembled_edges_carry_weights() {
        let pts = points(&[(0, 0), (3, 4), (6, 8)]);
        let edges = assemble_edges(&pts, &[(1, 2)], &[(0, 1), (1, 2)]);
        assert_eq!(
            edges,
            vec![
                CandidateEdge { a: 1, b: 2, weight: Weight::Connected },
                CandidateEdge { a: 0, b: 1, weight: Weight::Distance(25) },
                CandidateEdge { a: 1, b: 2, weight: Weight::Distance(25) },
            ]
        );
    }
}
