use std::cmp::Reverse;

use tracing::trace;

use super::assemble::CandidateEdge;
use super::PointId;

/// Disjoint-set forest over point ids, with union by size and path compression.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl DisjointSet {
    /// Creates `n` singleton components.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            components: n,
        }
    }

    /// Returns the representative of the component containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the components of `a` and `b`. Returns `false` if they were already one.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (keep, merge) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[merge] = keep;
        self.size[keep] += self.size[merge];
        self.components -= 1;
        true
    }

    /// Number of disjoint components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components
    }
}

/// Minimum spanning tree over candidate edges where `Connected` edges are free.
///
/// Free edges merge components without producing output and reduce the number
/// of paid edges still required. Once the first distance edge joins two
/// components, every later join is emitted.
pub struct KruskalMst {
    point_count: usize,
    edges: Vec<CandidateEdge>,
}

impl KruskalMst {
    /// Creates a new `KruskalMst` solver.
    #[must_use]
    pub fn new(point_count: usize, edges: Vec<CandidateEdge>) -> Self {
        Self { point_count, edges }
    }

    /// Executes the sweep, returning the emitted point pairs in ascending weight order.
    ///
    /// Equal weights are consumed in insertion order.
    #[must_use]
    pub fn execute(self) -> Vec<(PointId, PointId)> {
        let mut edges: Vec<(usize, CandidateEdge)> = self.edges.into_iter().enumerate().collect();
        // Descending, so the cheapest edge sits at the back.
        edges.sort_unstable_by_key(|(index, edge)| Reverse((edge.weight, *index)));

        let mut forest = DisjointSet::new(self.point_count);
        let mut expected = self.point_count.saturating_sub(1);
        let mut produced = Vec::with_capacity(expected);
        let mut ratsnest_phase = false;

        while produced.len() < expected {
            let Some((_, edge)) = edges.pop() else {
                break;
            };
            debug_assert!(
                edge.a < self.point_count && edge.b < self.point_count,
                "edge {edge:?} refers to an unregistered point"
            );
            if forest.find(edge.a) == forest.find(edge.b) {
                continue;
            }

            if !ratsnest_phase && edge.weight.is_distance() {
                ratsnest_phase = true;
            }

            forest.union(edge.a, edge.b);
            if ratsnest_phase {
                trace!(a = edge.a, b = edge.b, weight = ?edge.weight, "air wire");
                produced.push((edge.a, edge.b));
            } else {
                trace!(a = edge.a, b = edge.b, "merged pre-existing connection");
                expected -= 1;
            }
        }

        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratsnest::Weight;

    fn paid(a: PointId, b: PointId, d: u128) -> CandidateEdge {
        CandidateEdge {
            a,
            b,
            weight: Weight::Distance(d),
        }
    }

    fn free(a: PointId, b: PointId) -> CandidateEdge {
        CandidateEdge {
            a,
            b,
            weight: Weight::Connected,
        }
    }

    // ── DisjointSet ──

    #[test]
    fn singletons_are_disjoint() {
        let mut set = DisjointSet::new(3);
        assert_eq!(set.component_count(), 3);
        assert_ne!(set.find(0), set.find(1));
    }

    #[test]
    fn union_joins_and_reports_cycles() {
        let mut set = DisjointSet::new(4);
        assert!(set.union(0, 1));
        assert!(set.union(2, 3));
        assert!(set.union(1, 3));
        assert!(!set.union(0, 2));
        assert_eq!(set.component_count(), 1);
        assert_eq!(set.find(0), set.find(3));
    }

    #[test]
    fn self_union_is_a_no_op() {
        let mut set = DisjointSet::new(2);
        assert!(!set.union(1, 1));
        assert_eq!(set.component_count(), 2);
    }

    // ── KruskalMst ──

    #[test]
    fn empty_input_produces_nothing() {
        assert!(KruskalMst::new(0, Vec::new()).execute().is_empty());
        assert!(KruskalMst::new(1, Vec::new()).execute().is_empty());
    }

    #[test]
    fn picks_cheapest_spanning_edges() {
        let edges = vec![paid(0, 1, 10), paid(1, 2, 20), paid(0, 2, 5)];
        assert_eq!(KruskalMst::new(3, edges).execute(), vec![(0, 2), (0, 1)]);
    }

    #[test]
    fn free_edge_suppresses_paid_edge_between_same_points() {
        let edges = vec![paid(0, 1, 4), free(0, 1)];
        assert!(KruskalMst::new(2, edges).execute().is_empty());
    }

    #[test]
    fn free_edges_reduce_required_output() {
        // 0-1 and 2-3 connected; only one wire is needed to join the halves.
        let edges = vec![
            free(0, 1),
            free(2, 3),
            paid(0, 1, 1),
            paid(1, 2, 9),
            paid(0, 3, 16),
            paid(2, 3, 1),
        ];
        assert_eq!(KruskalMst::new(4, edges).execute(), vec![(1, 2)]);
    }

    #[test]
    fn duplicate_and_self_connections_are_harmless() {
        let edges = vec![free(0, 0), free(0, 1), free(1, 0), paid(1, 2, 3), paid(0, 2, 8)];
        assert_eq!(KruskalMst::new(3, edges).execute(), vec![(1, 2)]);
    }

    #[test]
    fn ties_follow_insertion_order() {
        let edges = vec![paid(0, 1, 1), paid(1, 2, 1), paid(0, 2, 1)];
        assert_eq!(KruskalMst::new(3, edges).execute(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn zero_length_edge_is_emitted() {
        let edges = vec![paid(0, 1, 0)];
        assert_eq!(KruskalMst::new(2, edges).execute(), vec![(0, 1)]);
    }

    #[test]
    fn disconnected_candidates_stop_when_exhausted() {
        // Point 3 has no candidate edge at all.
        let edges = vec![paid(0, 1, 1), paid(1, 2, 1)];
        assert_eq!(KruskalMst::new(4, edges).execute(), vec![(0, 1), (1, 2)]);
    }
}
