//! RouteGraph - the immutable route network.
//!
//! The builder lays the route topology out in petgraph's StableGraph to derive
//! adjacency, and the RouteGraph keeps dense tables for the locomotion engine:
//! - Vertices with their exit/entry adjacency
//! - Edges with unit direction and length
//! - The ground subset plus an R-tree for ground queries

use std::collections::HashMap;

use log::debug;
use petgraph::Directed;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;

use super::edge::{Edge, EdgeDescriptor, EdgeId};
use super::vertex::{Vertex, VertexId, VertexIndex};
use crate::error::GraphError;
use crate::math::Vector2;
use crate::spatial::GroundIndex;

/// The route network.
///
/// Built once through [`RouteGraphBuilder`] or [`RouteGraph::from_descriptors`]
/// and never mutated afterward. Movement states refer to edges by [`EdgeId`].
#[derive(Debug, Clone)]
pub struct RouteGraph {
    /// Map from VertexId to dense index
    vertex_lookup: HashMap<VertexId, VertexIndex>,

    /// Vertices in declaration order
    vertices: Vec<Vertex>,

    /// Edges in declaration order; `edges[n].id() == EdgeId(n)`
    edges: Vec<Edge>,

    /// Ground edges in declaration order
    ground_edges: Vec<EdgeId>,

    /// Spatial index over ground edges
    ground_index: GroundIndex,
}

impl RouteGraph {
    /// Start building a graph with named vertices.
    pub fn builder() -> RouteGraphBuilder {
        RouteGraphBuilder::new()
    }

    /// Build a graph from an ordered list of segments.
    ///
    /// Endpoints at identical positions become one vertex named after that
    /// position.
    pub fn from_descriptors(descriptors: &[EdgeDescriptor]) -> Result<Self, GraphError> {
        let mut builder = RouteGraphBuilder::with_capacity(descriptors.len() + 1, descriptors.len());

        for descriptor in descriptors {
            let start = builder.vertex_at(descriptor.start.into());
            let end = builder.vertex_at(descriptor.end.into());
            builder.connect_indices(start, end, descriptor.ground);
        }

        builder.build()
    }

    // =========================================================================
    // Vertex Access
    // =========================================================================

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get a vertex by index.
    ///
    /// Panics if the index did not come from this graph.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self.vertices[index.index()]
    }

    /// All vertices in declaration order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Look up a vertex by name.
    pub fn find_vertex(&self, id: &str) -> Option<VertexIndex> {
        self.vertex_lookup.get(&VertexId::new(id)).copied()
    }

    // =========================================================================
    // Edge Access
    // =========================================================================

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get an edge by id.
    ///
    /// Panics if the id did not come from this graph.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// All edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Ground edges in declaration order.
    pub fn ground_edges(&self) -> &[EdgeId] {
        &self.ground_edges
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the edge closest to `point`.
    ///
    /// Linear scan in declaration order with a strict comparison, so among
    /// equally distant edges the first declared wins.
    pub fn closest_edge(&self, point: Vector2) -> EdgeId {
        let mut closest = EdgeId(0);
        let mut closest_distance = f64::INFINITY;

        for edge in &self.edges {
            let distance = edge.distance_to(point);
            if distance < closest_distance {
                closest = edge.id();
                closest_distance = distance;
            }
        }

        closest
    }

    /// Ground edges whose horizontal span covers `x`, in declaration order.
    pub fn ground_edges_spanning(&self, x: f64) -> Vec<EdgeId> {
        self.ground_index.spanning_x(x)
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Get the bounding box of all vertices as `(min, max)`.
    pub fn bounds(&self) -> (Vector2, Vector2) {
        let mut min = Vector2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for vertex in &self.vertices {
            let p = vertex.position();
            min = Vector2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vector2::new(max.x.max(p.x), max.y.max(p.y));
        }

        (min, max)
    }

    /// Get the edge list as flat segments for drawing.
    ///
    /// Returns `[sx0, sy0, ex0, ey0, ground0, sx1, ...]` with `ground` as 0 or 1.
    pub fn edge_segments(&self) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.edges.len() * 5);
        for edge in &self.edges {
            let (start, end) = (edge.start_position(), edge.end_position());
            result.extend([start.x, start.y, end.x, end.y]);
            result.push(if edge.is_ground() { 1.0 } else { 0.0 });
        }
        result
    }
}

/// Incremental builder for [`RouteGraph`].
///
/// Vertices are declared first with a name and position, then connected.
/// Validation happens once, in [`RouteGraphBuilder::build`].
#[derive(Debug, Default)]
pub struct RouteGraphBuilder {
    vertices: Vec<(VertexId, Vector2)>,
    vertex_lookup: HashMap<VertexId, VertexIndex>,
    edges: Vec<(VertexIndex, VertexIndex, bool)>,
}

impl RouteGraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_capacity),
            vertex_lookup: HashMap::with_capacity(vertex_capacity),
            edges: Vec::with_capacity(edge_capacity),
        }
    }

    /// Declare a named vertex.
    pub fn add_vertex(
        &mut self,
        id: impl Into<VertexId>,
        position: Vector2,
    ) -> Result<VertexIndex, GraphError> {
        let id = id.into();
        if self.vertex_lookup.contains_key(&id) {
            return Err(GraphError::DuplicateVertex { vertex: id });
        }
        Ok(self.push_vertex(id, position))
    }

    /// Connect two declared vertices with a directed edge.
    pub fn connect(&mut self, from: &str, to: &str, ground: bool) -> Result<EdgeId, GraphError> {
        let start = self.lookup(from)?;
        let end = self.lookup(to)?;
        Ok(self.connect_indices(start, end, ground))
    }

    /// Get or create the vertex named after `position`.
    pub(crate) fn vertex_at(&mut self, position: Vector2) -> VertexIndex {
        let id = VertexId::from_position(position);
        match self.vertex_lookup.get(&id) {
            Some(&index) => index,
            None => self.push_vertex(id, position),
        }
    }

    pub(crate) fn connect_indices(&mut self, start: VertexIndex, end: VertexIndex, ground: bool) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push((start, end, ground));
        id
    }

    fn push_vertex(&mut self, id: VertexId, position: Vector2) -> VertexIndex {
        let index = VertexIndex(self.vertices.len() as u32);
        self.vertex_lookup.insert(id.clone(), index);
        self.vertices.push((id, position));
        index
    }

    fn lookup(&self, id: &str) -> Result<VertexIndex, GraphError> {
        self.vertex_lookup
            .get(&VertexId::new(id))
            .copied()
            .ok_or_else(|| GraphError::UnknownVertex { vertex: VertexId::new(id) })
    }

    /// Validate and freeze the graph.
    ///
    /// Fails on an empty graph, non-finite coordinates, zero-length edges and
    /// vertices with no adjacent edge.
    pub fn build(self) -> Result<RouteGraph, GraphError> {
        if self.edges.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut topology: StableGraph<VertexId, EdgeId, Directed> =
            StableGraph::with_capacity(self.vertices.len(), self.edges.len());
        let nodes: Vec<NodeIndex> = self
            .vertices
            .iter()
            .map(|(id, _)| topology.add_node(id.clone()))
            .collect();

        let mut edges = Vec::with_capacity(self.edges.len());
        for (n, &(start, end, ground)) in self.edges.iter().enumerate() {
            let id = EdgeId(n as u32);
            let (start_id, start_position) = &self.vertices[start.index()];
            let end_position = self.vertices[end.index()].1;

            if !start_position.is_finite() || !end_position.is_finite() {
                return Err(GraphError::NonFinite { edge: id });
            }

            let edge = Edge::new(id, (start, *start_position), (end, end_position), ground);
            if edge.length() <= 0.0 {
                return Err(GraphError::DegenerateEdge {
                    edge: id,
                    vertex: start_id.clone(),
                });
            }

            topology.add_edge(nodes[start.index()], nodes[end.index()], id);
            edges.push(edge);
        }

        let mut vertices = Vec::with_capacity(self.vertices.len());
        for ((id, position), &node) in self.vertices.into_iter().zip(&nodes) {
            // petgraph walks adjacency newest-first; sort back to declaration order
            let mut exits: Vec<EdgeId> = topology
                .edges_directed(node, Direction::Outgoing)
                .map(|e| *e.weight())
                .collect();
            let mut entries: Vec<EdgeId> = topology
                .edges_directed(node, Direction::Incoming)
                .map(|e| *e.weight())
                .collect();
            exits.sort_unstable();
            entries.sort_unstable();

            if exits.is_empty() && entries.is_empty() {
                return Err(GraphError::IsolatedVertex { vertex: id });
            }

            let mut vertex = Vertex::new(id, position);
            vertex.set_adjacency(exits, entries);
            vertices.push(vertex);
        }

        let ground_edges: Vec<EdgeId> = edges
            .iter()
            .filter(|e| e.is_ground())
            .map(|e| e.id())
            .collect();
        let ground_index = GroundIndex::from_edges(&edges);

        debug!(
            "route graph built: {} vertices, {} edges ({} ground)",
            vertices.len(),
            edges.len(),
            ground_edges.len()
        );

        Ok(RouteGraph {
            vertex_lookup: self.vertex_lookup,
            vertices,
            edges,
            ground_edges,
            ground_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(start: (f64, f64), end: (f64, f64)) -> EdgeDescriptor {
        EdgeDescriptor::new(start, end, false)
    }

    /// The five-vertex junction graph: a, b, c, d around a hub e.
    fn junction() -> RouteGraph {
        let mut builder = RouteGraph::builder();
        builder.add_vertex("a", Vector2::new(10.0, 10.0)).unwrap();
        builder.add_vertex("b", Vector2::new(450.0, 10.0)).unwrap();
        builder.add_vertex("c", Vector2::new(450.0, 200.0)).unwrap();
        builder.add_vertex("d", Vector2::new(800.0, 100.0)).unwrap();
        builder.add_vertex("e", Vector2::new(450.0, 100.0)).unwrap();

        for (from, to) in [
            ("a", "b"),
            ("a", "c"),
            ("b", "d"),
            ("c", "d"),
            ("e", "a"),
            ("e", "b"),
            ("e", "c"),
            ("e", "d"),
        ] {
            builder.connect(from, to, false).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_build_counts() {
        let graph = junction();
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.edge_count(), 8);
        assert!(graph.ground_edges().is_empty());
    }

    #[test]
    fn test_adjacency_in_declaration_order() {
        let graph = junction();
        let e = graph.vertex(graph.find_vertex("e").unwrap());
        assert_eq!(e.exits(), &[EdgeId(4), EdgeId(5), EdgeId(6), EdgeId(7)]);
        assert!(e.entries().is_empty());

        let d = graph.vertex(graph.find_vertex("d").unwrap());
        assert!(d.exits().is_empty());
        assert_eq!(d.entries(), &[EdgeId(2), EdgeId(3), EdgeId(7)]);
    }

    #[test]
    fn test_edge_ids_match_positions() {
        let graph = junction();
        for (n, edge) in graph.edges().iter().enumerate() {
            assert_eq!(edge.id(), EdgeId(n as u32));
            assert!(edge.length() > 0.0);
        }
    }

    #[test]
    fn test_from_descriptors_shares_vertices() {
        let graph = RouteGraph::from_descriptors(&[
            descriptor((0.0, 0.0), (100.0, 0.0)),
            descriptor((100.0, 0.0), (100.0, 50.0)),
            descriptor((-0.0, 0.0), (0.0, -40.0)),
        ])
        .unwrap();

        assert_eq!(graph.vertex_count(), 4);
        let origin = graph.find_vertex("0, 0").unwrap();
        assert_eq!(graph.vertex(origin).exits(), &[EdgeId(0), EdgeId(2)]);
    }

    #[test]
    fn test_rejects_degenerate_edge() {
        let err = RouteGraph::from_descriptors(&[
            descriptor((0.0, 0.0), (10.0, 0.0)),
            descriptor((5.0, 5.0), (5.0, 5.0)),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            GraphError::DegenerateEdge {
                edge: EdgeId(1),
                vertex: VertexId::new("5, 5"),
            }
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = RouteGraph::from_descriptors(&[descriptor((0.0, 0.0), (f64::NAN, 3.0))]).unwrap_err();
        assert_eq!(err, GraphError::NonFinite { edge: EdgeId(0) });
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(RouteGraph::from_descriptors(&[]).unwrap_err(), GraphError::Empty);
    }

    #[test]
    fn test_rejects_isolated_vertex() {
        let mut builder = RouteGraph::builder();
        builder.add_vertex("a", Vector2::new(0.0, 0.0)).unwrap();
        builder.add_vertex("b", Vector2::new(10.0, 0.0)).unwrap();
        builder.add_vertex("lonely", Vector2::new(50.0, 50.0)).unwrap();
        builder.connect("a", "b", false).unwrap();

        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::IsolatedVertex { vertex: VertexId::new("lonely") }
        );
    }

    #[test]
    fn test_builder_rejects_bad_names() {
        let mut builder = RouteGraph::builder();
        builder.add_vertex("a", Vector2::new(0.0, 0.0)).unwrap();

        assert_eq!(
            builder.add_vertex("a", Vector2::new(1.0, 1.0)).unwrap_err(),
            GraphError::DuplicateVertex { vertex: VertexId::new("a") }
        );
        assert_eq!(
            builder.connect("a", "nowhere", false).unwrap_err(),
            GraphError::UnknownVertex { vertex: VertexId::new("nowhere") }
        );
    }

    #[test]
    fn test_closest_edge() {
        let graph = junction();
        // Just below the a-b edge
        assert_eq!(graph.closest_edge(Vector2::new(200.0, 12.0)), EdgeId(0));
        // Right of the hub, on the e-d edge
        assert_eq!(graph.closest_edge(Vector2::new(700.0, 101.0)), EdgeId(7));
    }

    #[test]
    fn test_closest_edge_tie_prefers_first_declared() {
        let graph = RouteGraph::from_descriptors(&[
            descriptor((0.0, 0.0), (100.0, 0.0)),
            descriptor((100.0, 0.0), (0.0, 0.0)),
            descriptor((0.0, 20.0), (100.0, 20.0)),
        ])
        .unwrap();

        assert_eq!(graph.closest_edge(Vector2::new(50.0, -5.0)), EdgeId(0));
        // Equidistant from the lower edge pair and the upper edge
        assert_eq!(graph.closest_edge(Vector2::new(50.0, 10.0)), EdgeId(0));
    }

    #[test]
    fn test_ground_edges_spanning() {
        let graph = RouteGraph::from_descriptors(&[
            descriptor((0.0, 0.0), (100.0, 0.0)),
            EdgeDescriptor::new((0.0, 300.0), (400.0, 300.0), true),
            EdgeDescriptor::new((400.0, 300.0), (800.0, 260.0), true),
        ])
        .unwrap();

        assert_eq!(graph.ground_edges(), &[EdgeId(1), EdgeId(2)]);
        assert_eq!(graph.ground_edges_spanning(50.0), vec![EdgeId(1)]);
        assert_eq!(graph.ground_edges_spanning(400.0), vec![EdgeId(1), EdgeId(2)]);
        assert!(graph.ground_edges_spanning(900.0).is_empty());
    }

    #[test]
    fn test_bounds_and_segments() {
        let graph = RouteGraph::from_descriptors(&[
            descriptor((-10.0, -5.0), (10.0, 5.0)),
            EdgeDescriptor::new((10.0, 5.0), (20.0, 5.0), true),
        ])
        .unwrap();

        let (min, max) = graph.bounds();
        assert_eq!(min, Vector2::new(-10.0, -5.0));
        assert_eq!(max, Vector2::new(20.0, 5.0));

        assert_eq!(
            graph.edge_segments(),
            vec![-10.0, -5.0, 10.0, 5.0, 0.0, 10.0, 5.0, 20.0, 5.0, 1.0]
        );
    }
}
