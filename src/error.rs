//! Error types for graph construction, configuration, world setup and route import.
//!
//! Only load-time problems are errors. Once a [`RouteGraph`](crate::graph::RouteGraph)
//! and a [`World`](crate::world::World) exist, every tick is infallible.

use thiserror::Error;

use crate::graph::{EdgeId, VertexId};
use crate::math::Vector2;

/// Reasons a route graph refuses to build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// No edges were supplied.
    #[error("route graph has no edges")]
    Empty,

    /// An edge endpoint has a NaN or infinite coordinate.
    #[error("{edge} has a non-finite endpoint")]
    NonFinite { edge: EdgeId },

    /// Both endpoints of an edge sit at the same position.
    #[error("{edge} has zero length at vertex {vertex}")]
    DegenerateEdge { edge: EdgeId, vertex: VertexId },

    /// A declared vertex is not touched by any edge.
    #[error("vertex {vertex} has no adjacent edges")]
    IsolatedVertex { vertex: VertexId },

    /// The same vertex id was declared twice.
    #[error("vertex {vertex} declared more than once")]
    DuplicateVertex { vertex: VertexId },

    /// An edge refers to a vertex id that was never declared.
    #[error("unknown vertex {vertex}")]
    UnknownVertex { vertex: VertexId },
}

/// Reasons a [`LocomotionConfig`](crate::config::LocomotionConfig) is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A tunable is NaN or infinite.
    #[error("config field `{field}` must be finite")]
    NonFinite { field: &'static str },

    /// A tunable is outside its allowed range.
    #[error("config field `{field}` = {value} is out of range ({expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Reasons a [`World`](crate::world::World) refuses a starting state or respawn point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A spawn or respawn point has a NaN or infinite coordinate.
    #[error("spawn point ({point}) must be finite")]
    NonFiniteSpawn { point: Vector2 },

    /// A starting state refers to an edge the graph does not have.
    #[error("{edge} is not in the route graph ({edge_count} edges)")]
    UnknownEdge { edge: EdgeId, edge_count: usize },

    /// A starting offset lies off the edge.
    #[error("offset {offset} is outside {edge} (length {length})")]
    OffsetOutOfRange { edge: EdgeId, offset: f64, length: f64 },

    /// A starting state carries a NaN or infinite value.
    #[error("starting state has a non-finite {field}")]
    NonFiniteState { field: &'static str },
}

/// Reasons route-layer geometry cannot be turned into edges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// A point token is not an `x,y` pair.
    #[error("malformed point `{token}` in points list")]
    MalformedPoint { token: String },

    /// A point coordinate failed to parse as a number.
    #[error("invalid coordinate `{value}`")]
    InvalidCoordinate { value: String },
}
