mod assemble;
mod batch;
mod classify;
mod kruskal;
mod registry;
mod triangulate;

pub use assemble::{assemble_edges, candidate_pairs, CandidateEdge, Weight};
pub use batch::build_net_air_wires;
pub use classify::{classify, sorted_chain, CandidateStrategy};
pub use kruskal::{DisjointSet, KruskalMst};
pub use registry::AirWiresBuilder;
pub use triangulate::{CompleteGraph, DelaunayTriangulator, Triangulator};

use crate::math::distance_2d::{distance, distance_squared};
use crate::math::{Coord, ANGLE_TOLERANCE, MIN_DIRECTION_DISTANCE_SQ};

/// Sequential identifier of a point within one registry.
pub type PointId = usize;

/// A registered pad, pin or via position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Index assigned at insertion, dense from zero.
    pub id: PointId,
    /// Position in nanometres.
    pub position: Coord,
}

impl Point {
    fn sort_key(&self) -> (i64, i64, PointId) {
        (self.position.x, self.position.y, self.id)
    }
}

/// A required connection that is not yet routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AirWire {
    /// First endpoint.
    pub a: Point,
    /// Second endpoint.
    pub b: Point,
}

impl AirWire {
    /// Creates an air wire between two points.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Exact squared length in nm².
    #[must_use]
    pub fn length_squared(&self) -> u128 {
        distance_squared(&self.a.position, &self.b.position)
    }

    /// Length in nanometres.
    #[must_use]
    pub fn length(&self) -> f64 {
        distance(&self.a.position, &self.b.position)
    }

    /// Returns the same wire with its endpoints ordered by position, then id.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.b.sort_key() < self.a.sort_key() {
            Self {
                a: self.b,
                b: self.a,
            }
        } else {
            self
        }
    }

    /// Returns the endpoint positions as a pair.
    #[must_use]
    pub fn positions(&self) -> (Coord, Coord) {
        (self.a.position, self.b.position)
    }
}

/// Ordered list of air wires produced for one net.
pub type AirWires = Vec<AirWire>;

/// Normalizes every wire and sorts the list, for order-independent comparison.
#[must_use]
pub fn normalize(wires: AirWires) -> AirWires {
    let mut wires: AirWires = wires.into_iter().map(AirWire::normalized).collect();
    wires.sort_by_key(|w| (w.a.sort_key(), w.b.sort_key()));
    wires
}

/// Sum of the lengths of all wires, in nanometres.
#[must_use]
pub fn total_length(wires: &[AirWire]) -> f64 {
    wires.iter().map(AirWire::length).sum()
}

/// Policy constants for the degenerate-case classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatsnestParams {
    /// Squared distance (nm²) below which a point is ignored by the collinearity test.
    pub collinear_min_distance_sq: f64,
    /// Angular tolerance (radians) of the collinearity test.
    pub collinear_angle_tolerance: f64,
}

impl Default for RatsnestParams {
    fn default() -> Self {
        Self {
            collinear_min_distance_sq: MIN_DIRECTION_DISTANCE_SQ,
            collinear_angle_tolerance: ANGLE_TOLERANCE,
        }
    }
}
