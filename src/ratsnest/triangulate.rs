use std::collections::hash_map::Entry;
use std::collections::HashMap;

use spade::{DelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TriangulationError};

use super::{Point, PointId};

/// Produces a sparse candidate edge set containing a Euclidean minimum spanning tree.
pub trait Triangulator {
    /// Returns candidate edges as pairs of point ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot triangulate the given points.
    fn triangulate(&self, points: &[Point]) -> Result<Vec<(PointId, PointId)>>;
}

/// Delaunay triangulation backed by `spade`.
///
/// Coincident points collapse into one triangulation vertex; every further
/// point at that position gets a zero-length edge to the first one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayTriangulator;

impl Triangulator for DelaunayTriangulator {
    #[allow(clippy::cast_precision_loss)]
    fn triangulate(&self, points: &[Point]) -> Result<Vec<(PointId, PointId)>> {
        let mut dt = DelaunayTriangulation::<SpadePoint2<f64>>::new();
        let mut vertex_map: HashMap<usize, PointId> = HashMap::with_capacity(points.len());
        let mut edges = Vec::new();

        for p in points {
            let pos = SpadePoint2::new(p.position.x as f64, p.position.y as f64);
            let handle = dt.insert(pos).map_err(|e: InsertionError| {
                TriangulationError::Insertion(format!("point {}: {e}", p.id))
            })?;
            match vertex_map.entry(handle.index()) {
                Entry::Vacant(slot) => {
                    slot.insert(p.id);
                }
                Entry::Occupied(slot) => edges.push((*slot.get(), p.id)),
            }
        }

        for edge in dt.undirected_edges() {
            let [v0, v1] = edge.vertices();
            let (Some(&a), Some(&b)) = (
                vertex_map.get(&v0.fix().index()),
                vertex_map.get(&v1.fix().index()),
            ) else {
                return Err(TriangulationError::Insertion(
                    "triangulation vertex without registered point".into(),
                )
                .into());
            };
            edges.push((a, b));
        }

        Ok(edges)
    }
}

/// Every pair of points. Quadratic, but never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteGraph;

impl Triangulator for CompleteGraph {
    fn triangulate(&self, points: &[Point]) -> Result<Vec<(PointId, PointId)>> {
        let mut edges = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                edges.push((a.id, b.id));
            }
        }
        Ok(edges)
    }
}
