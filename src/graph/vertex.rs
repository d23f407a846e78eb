//! Vertex type and related structures.
//!
//! Vertices are the junctions of the route graph. Each vertex has:
//! - A named identity (`VertexId`), stable across rebuilds of the same routes
//! - A dense index (`VertexIndex`) into the graph's vertex table
//! - A fixed position
//! - Adjacency: edges that exit it and edges that enter it

use std::fmt;

use serde::{Deserialize, Serialize};

use super::edge::EdgeId;
use crate::math::Vector2;

/// Named vertex identity.
///
/// Vertices built from raw edge descriptors are named after their position
/// (`"450, 10"`), so two descriptors sharing an endpoint share a vertex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(String);

impl VertexId {
    /// Create a new VertexId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Name a vertex after its position.
    pub fn from_position(position: Vector2) -> Self {
        // `+ 0.0` folds -0.0 into 0.0 so both spellings name one vertex
        Self(Vector2::new(position.x + 0.0, position.y + 0.0).to_string())
    }

    /// Get the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VertexId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Dense vertex index into the graph's vertex table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIndex(pub u32);

impl VertexIndex {
    /// Get the index as a usize for slice access.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vertex({})", self.0)
    }
}

/// A junction in the route graph.
#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    position: Vector2,
    exits: Vec<EdgeId>,
    entries: Vec<EdgeId>,
}

impl Vertex {
    pub(crate) fn new(id: VertexId, position: Vector2) -> Self {
        Self {
            id,
            position,
            exits: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn set_adjacency(&mut self, exits: Vec<EdgeId>, entries: Vec<EdgeId>) {
        self.exits = exits;
        self.entries = entries;
    }

    /// The vertex name.
    #[inline]
    pub fn id(&self) -> &VertexId {
        &self.id
    }

    /// The vertex position.
    #[inline]
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Edges starting at this vertex, in insertion order.
    #[inline]
    pub fn exits(&self) -> &[EdgeId] {
        &self.exits
    }

    /// Edges ending at this vertex, in insertion order.
    #[inline]
    pub fn entries(&self) -> &[EdgeId] {
        &self.entries
    }
}
