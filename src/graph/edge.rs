//! Edge type and related structures.
//!
//! Edges are the line segments the mob runs along. Each edge has:
//! - A stable identifier (its insertion position)
//! - Start and end vertices (directed, for adjacency)
//! - A ground flag
//! - Derived geometry: vector, unit direction and length
//!
//! Distance queries treat the segment as undirected.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::vertex::VertexIndex;
use crate::math::Vector2;

/// Stable edge identifier.
///
/// `EdgeId(n)` is the n-th edge supplied to the graph builder, so ordering
/// edge ids reproduces declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Get the id as a usize for slice access.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self.0)
    }
}

/// Graph construction input: one segment as produced by a route importer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    /// Start point `(x, y)`.
    pub start: (f64, f64),
    /// End point `(x, y)`.
    pub end: (f64, f64),
    /// Whether the segment is part of the ground layer.
    #[serde(default)]
    pub ground: bool,
}

impl EdgeDescriptor {
    /// Create a new descriptor.
    pub fn new(start: (f64, f64), end: (f64, f64), ground: bool) -> Self {
        Self { start, end, ground }
    }
}

/// A directed segment between two vertices.
#[derive(Debug, Clone)]
pub struct Edge {
    id: EdgeId,
    start: VertexIndex,
    end: VertexIndex,
    start_position: Vector2,
    end_position: Vector2,
    ground: bool,
    vector: Vector2,
    unit: Vector2,
    length: f64,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        (start, start_position): (VertexIndex, Vector2),
        (end, end_position): (VertexIndex, Vector2),
        ground: bool,
    ) -> Self {
        let vector = end_position - start_position;
        Self {
            id,
            start,
            end,
            start_position,
            end_position,
            ground,
            vector,
            unit: vector.normalize(),
            length: vector.length(),
        }
    }

    /// The edge identifier.
    #[inline]
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Start vertex.
    #[inline]
    pub fn start(&self) -> VertexIndex {
        self.start
    }

    /// End vertex.
    #[inline]
    pub fn end(&self) -> VertexIndex {
        self.end
    }

    /// Start position.
    #[inline]
    pub fn start_position(&self) -> Vector2 {
        self.start_position
    }

    /// End position.
    #[inline]
    pub fn end_position(&self) -> Vector2 {
        self.end_position
    }

    /// Whether this edge belongs to the ground layer.
    #[inline]
    pub fn is_ground(&self) -> bool {
        self.ground
    }

    /// `end - start`.
    #[inline]
    pub fn vector(&self) -> Vector2 {
        self.vector
    }

    /// Unit direction from start to end.
    #[inline]
    pub fn unit(&self) -> Vector2 {
        self.unit
    }

    /// Segment length.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Scalar projection parameter of `point` onto the segment, clamped to `[0, 1]`.
    pub fn project(&self, point: Vector2) -> f64 {
        let t = (point - self.start_position).dot(self.vector) / (self.length * self.length);
        t.clamp(0.0, 1.0)
    }

    /// Closest point on the segment to `point`.
    pub fn project_point(&self, point: Vector2) -> Vector2 {
        self.point_at(self.project(point) * self.length)
    }

    /// Position at `offset` units from the start, clamped to the segment.
    pub fn point_at(&self, offset: f64) -> Vector2 {
        self.start_position + self.unit * offset.clamp(0.0, self.length)
    }

    /// Distance from `point` to the closest point on the segment.
    pub fn distance_to(&self, point: Vector2) -> f64 {
        point.distance_to(self.project_point(point))
    }

    /// True if `x` lies within the segment's horizontal span (inclusive).
    pub fn covers_x(&self, x: f64) -> bool {
        let (lo, hi) = if self.start_position.x <= self.end_position.x {
            (self.start_position.x, self.end_position.x)
        } else {
            (self.end_position.x, self.start_position.x)
        };
        lo <= x && x <= hi
    }

    /// Axis-aligned bounds `(min, max)` of the segment.
    pub fn bounds(&self) -> (Vector2, Vector2) {
        (
            Vector2::new(
                self.start_position.x.min(self.end_position.x),
                self.start_position.y.min(self.end_position.y),
            ),
            Vector2::new(
                self.start_position.x.max(self.end_position.x),
                self.start_position.y.max(self.end_position.y),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn edge(start: (f64, f64), end: (f64, f64)) -> Edge {
        Edge::new(
            EdgeId(0),
            (VertexIndex(0), start.into()),
            (VertexIndex(1), end.into()),
            false,
        )
    }

    #[test]
    fn test_edge_id() {
        let id = EdgeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Edge(42)");
        assert!(EdgeId(3) < EdgeId(10));
    }

    #[test]
    fn test_derived_geometry() {
        let e = edge((0.0, 0.0), (30.0, 40.0));
        assert_eq!(e.length(), 50.0);
        assert_eq!(e.vector(), Vector2::new(30.0, 40.0));
        assert_relative_eq!(e.unit().x, 0.6);
        assert_relative_eq!(e.unit().y, 0.8);
    }

    #[test]
    fn test_project_is_clamped() {
        let e = edge((0.0, 0.0), (100.0, 0.0));
        assert_eq!(e.project(Vector2::new(50.0, 20.0)), 0.5);
        assert_eq!(e.project(Vector2::new(-30.0, 5.0)), 0.0);
        assert_eq!(e.project(Vector2::new(500.0, -5.0)), 1.0);

        for &(x, y) in &[(-1e9, 3.0), (1e9, -3.0), (17.0, 1e6), (0.0, 0.0)] {
            let t = e.project(Vector2::new(x, y));
            assert!((0.0..=1.0).contains(&t), "t = {t} for ({x}, {y})");
        }
    }

    #[test]
    fn test_point_at_endpoints() {
        let e = edge((10.0, 10.0), (450.0, 200.0));
        assert_eq!(e.point_at(0.0), e.start_position());
        let end = e.point_at(e.length());
        assert_relative_eq!(end.x, 450.0, epsilon = 1e-9);
        assert_relative_eq!(end.y, 200.0, epsilon = 1e-9);

        // Points beyond either end project onto the endpoints
        assert_eq!(e.project_point(Vector2::new(0.0, 0.0)), e.start_position());
        let far = e.project_point(Vector2::new(900.0, 400.0));
        assert_relative_eq!(far.x, 450.0, epsilon = 1e-9);
        assert_relative_eq!(far.y, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_is_direction_agnostic() {
        let forward = edge((0.0, 0.0), (100.0, 0.0));
        let backward = edge((100.0, 0.0), (0.0, 0.0));
        let p = Vector2::new(40.0, 30.0);
        assert_relative_eq!(forward.distance_to(p), 30.0);
        assert_relative_eq!(backward.distance_to(p), 30.0);
        assert_relative_eq!(forward.distance_to(Vector2::new(103.0, 4.0)), 5.0);
    }

    #[test]
    fn test_covers_x() {
        let e = edge((450.0, 10.0), (10.0, 10.0));
        assert!(e.covers_x(10.0));
        assert!(e.covers_x(450.0));
        assert!(e.covers_x(200.0));
        assert!(!e.covers_x(9.9));
        assert!(!e.covers_x(450.1));
    }

    #[test]
    fn test_bounds() {
        let e = edge((450.0, 10.0), (10.0, 200.0));
        let (min, max) = e.bounds();
        assert_eq!(min, Vector2::new(10.0, 10.0));
        assert_eq!(max, Vector2::new(450.0, 200.0));
    }
}
