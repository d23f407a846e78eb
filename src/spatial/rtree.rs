//! R-tree based ground index using the rstar crate.
//!
//! Stores the bounding box of each ground edge and answers
//! "which ground edges span this x" with an envelope query against a
//! vertical line through the whole tree.

use rstar::{AABB, RTree, RTreeObject};

use crate::graph::{Edge, EdgeId};

/// A ground segment's bounding box with its edge id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSegment {
    /// The edge identifier.
    pub id: EdgeId,
    /// Lower corner.
    pub min: [f64; 2],
    /// Upper corner.
    pub max: [f64; 2],
}

impl GroundSegment {
    /// Create a segment entry from an edge.
    pub fn from_edge(edge: &Edge) -> Self {
        let (min, max) = edge.bounds();
        Self {
            id: edge.id(),
            min: [min.x, min.y],
            max: [max.x, max.y],
        }
    }
}

impl RTreeObject for GroundSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// Spatial index for ground edges.
///
/// Built once alongside the route graph; the graph never changes afterward.
#[derive(Debug, Clone)]
pub struct GroundIndex {
    tree: RTree<GroundSegment>,
}

impl GroundIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk load the index from ground edges.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let segments: Vec<_> = edges
            .into_iter()
            .filter(|edge| edge.is_ground())
            .map(GroundSegment::from_edge)
            .collect();

        Self {
            tree: RTree::bulk_load(segments),
        }
    }

    /// Ground edges whose horizontal span includes `x`, in edge order.
    ///
    /// The R-tree yields hits in tree order; sorting by id keeps the result
    /// identical to a linear scan over the edge list.
    pub fn spanning_x(&self, x: f64) -> Vec<EdgeId> {
        if self.tree.size() == 0 || !x.is_finite() {
            return Vec::new();
        }

        let bounds = self.tree.root().envelope();
        let line = AABB::from_corners([x, bounds.lower()[1]], [x, bounds.upper()[1]]);

        let mut hits: Vec<EdgeId> = self
            .tree
            .locate_in_envelope_intersecting(&line)
            .map(|segment| segment.id)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Get the number of ground edges in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for GroundIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::VertexIndex;

    fn ground(id: u32, start: (f64, f64), end: (f64, f64)) -> Edge {
        Edge::new(
            EdgeId(id),
            (VertexIndex(0), start.into()),
            (VertexIndex(1), end.into()),
            true,
        )
    }

    #[test]
    fn test_spanning_x() {
        let edges = vec![
            ground(0, (0.0, 500.0), (300.0, 500.0)),
            ground(1, (250.0, 450.0), (600.0, 520.0)),
            ground(2, (700.0, 480.0), (900.0, 480.0)),
        ];
        let index = GroundIndex::from_edges(&edges);
        assert_eq!(index.len(), 3);

        assert_eq!(index.spanning_x(100.0), vec![EdgeId(0)]);
        assert_eq!(index.spanning_x(275.0), vec![EdgeId(0), EdgeId(1)]);
        assert_eq!(index.spanning_x(650.0), Vec::<EdgeId>::new());
        // Endpoints are inclusive
        assert_eq!(index.spanning_x(900.0), vec![EdgeId(2)]);
    }

    #[test]
    fn test_non_ground_edges_are_skipped() {
        let mut edges = vec![ground(0, (0.0, 10.0), (100.0, 10.0))];
        edges.push(Edge::new(
            EdgeId(1),
            (VertexIndex(1), (0.0, 50.0).into()),
            (VertexIndex(2), (100.0, 50.0).into()),
            false,
        ));

        let index = GroundIndex::from_edges(&edges);
        assert_eq!(index.len(), 1);
        assert_eq!(index.spanning_x(50.0), vec![EdgeId(0)]);
    }

    #[test]
    fn test_empty() {
        let index = GroundIndex::new();
        assert!(index.is_empty());
        assert!(index.spanning_x(0.0).is_empty());
    }

    #[test]
    fn test_matches_linear_scan() {
        let edges: Vec<_> = (0..20)
            .map(|i| {
                let x = i as f64 * 37.0;
                ground(i, (x, 400.0 + i as f64), (x + 90.0, 410.0))
            })
            .collect();
        let index = GroundIndex::from_edges(&edges);

        for step in 0..200 {
            let x = step as f64 * 4.5 - 10.0;
            let linear: Vec<_> = edges
                .iter()
                .filter(|e| e.covers_x(x))
                .map(|e| e.id())
                .collect();
            assert_eq!(index.spanning_x(x), linear, "x = {x}");
        }
    }
}
