use crate::math::collinear_2d::{are_collinear, line_direction};
use crate::math::distance_2d::delta;
use crate::math::{Coord, Vector2};

use super::{Point, PointId, RatsnestParams};

/// How candidate edges are derived for a point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// Zero or one point: nothing to connect.
    None,
    /// Exactly two points: the single edge between them.
    Pair,
    /// All points on one line: consecutive points in order along the line.
    SortedChain,
    /// General position: edges of a planar triangulation.
    Triangulation,
}

/// Picks the candidate strategy for `points`.
#[must_use]
pub fn classify(points: &[Point], params: &RatsnestParams) -> CandidateStrategy {
    match points.len() {
        0 | 1 => CandidateStrategy::None,
        2 => CandidateStrategy::Pair,
        _ => {
            let coords: Vec<Coord> = points.iter().map(|p| p.position).collect();
            if are_collinear(
                &coords,
                params.collinear_min_distance_sq,
                params.collinear_angle_tolerance,
            ) {
                CandidateStrategy::SortedChain
            } else {
                CandidateStrategy::Triangulation
            }
        }
    }
}

/// Connects consecutive points in order along the line, followed by a bridge
/// from every point to the one after its neighbour.
///
/// Points are ordered by their projection onto the line direction, ties by
/// position. On an exact line the bridges never beat the chain edges they span;
/// they catch points that sit off the line within the collinearity tolerance.
#[must_use]
pub fn sorted_chain(points: &[Point], params: &RatsnestParams) -> Vec<(PointId, PointId)> {
    let Some(origin) = points.first() else {
        return Vec::new();
    };
    let coords: Vec<Coord> = points.iter().map(|p| p.position).collect();
    let direction = line_direction(
        &coords,
        params.collinear_min_distance_sq,
        params.collinear_angle_tolerance,
    )
    .unwrap_or_else(|| Vector2::new(1.0, 0.0));

    let mut sorted: Vec<(f64, &Point)> = points
        .iter()
        .map(|p| (delta(&origin.position, &p.position).dot(&direction), p))
        .collect();
    sorted.sort_by(|(ta, a), (tb, b)| {
        ta.total_cmp(tb)
            .then_with(|| a.sort_key().cmp(&b.sort_key()))
    });

    let chain = sorted.windows(2).map(|w| (w[0].1.id, w[1].1.id));
    let bridges = sorted.windows(3).map(|w| (w[0].1.id, w[2].1.id));
    chain.chain(bridges).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn trivial_cardinalities() {
        let params = RatsnestParams::default();
        assert_eq!(classify(&[], &params), CandidateStrategy::None);
        assert_eq!(classify(&points(&[(1, 2)]), &params), CandidateStrategy::None);
        assert_eq!(
            classify(&points(&[(1, 2), (1, 2)]), &params),
            CandidateStrategy::Pair
        );
    }

    #[test]
    fn collinear_points_use_sorted_chain() {
        let pts = points(&[(0, 0), (100_000, 0), (-100_000, 0)]);
        assert_eq!(
            classify(&pts, &RatsnestParams::default()),
            CandidateStrategy::SortedChain
        );
    }

    #[test]
    fn general_points_use_triangulation() {
        let pts = points(&[(0, 0), (10_000_000, 0), (0, 10_000_000)]);
        assert_eq!(
            classify(&pts, &RatsnestParams::default()),
            CandidateStrategy::Triangulation
        );
    }

    #[test]
    fn custom_tolerance_changes_classification() {
        let pts = points(&[(0, 0), (10_000_000, 0), (10_000_000, 10_000)]);
        let strict = RatsnestParams::default();
        assert_eq!(classify(&pts, &strict), CandidateStrategy::Triangulation);
        let loose = RatsnestParams {
            collinear_angle_tolerance: 0.01,
            ..RatsnestParams::default()
        };
        assert_eq!(classify(&pts, &loose), CandidateStrategy::SortedChain);
    }

    fn chain(pts: &[Point]) -> Vec<(PointId, PointId)> {
        sorted_chain(pts, &RatsnestParams::default())
    }

    #[test]
    fn chain_follows_x_order() {
        let pts = points(&[(0, 0), (100, 0), (-100, 0)]);
        assert_eq!(chain(&pts), vec![(2, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn chain_orders_vertical_line_by_y() {
        let pts = points(&[(5, 300), (5, -200), (5, 100)]);
        assert_eq!(chain(&pts), vec![(1, 2), (2, 0), (1, 0)]);
    }

    #[test]
    fn chain_follows_near_vertical_line() {
        // x order would be 0, 2, 1 and zig-zag across the line.
        let pts = points(&[(0, 0), (1, 10_000_000), (0, 20_000_000)]);
        assert_eq!(chain(&pts), vec![(0, 1), (1, 2), (0, 2)]);
    }

    #[test]
    fn chain_follows_line_with_reversed_reference() {
        let pts = points(&[(0, 0), (0, -4_000_000), (0, 2_000_000), (0, -1_000_000)]);
        assert_eq!(chain(&pts), vec![(2, 0), (0, 3), (3, 1), (2, 3), (0, 1)]);
    }

    #[test]
    fn chain_bridges_point_inside_micrometre() {
        let pts = points(&[(0, 0), (500, 0), (0, 10_000_000), (0, -10_000_000)]);
        let edges = chain(&pts);
        assert_eq!(&edges[..3], &[(3, 0), (0, 1), (1, 2)]);
        assert!(edges.contains(&(0, 2)));
    }

    #[test]
    fn chain_of_single_point_is_empty() {
        assert!(chain(&points(&[(3, 3)])).is_empty());
        assert!(chain(&[]).is_empty());
    }
}
