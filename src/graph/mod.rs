//! Route graph data structures and geometric queries.
//!
//! This module provides the static planar graph the mob runs along. Adjacency
//! is derived from petgraph's StableGraph at build time; vertex and edge
//! geometry are kept in dense tables indexed by `VertexIndex` and `EdgeId`, both in declaration
//! order so every query is deterministic.

mod edge;
mod network;
mod vertex;

pub use edge::{Edge, EdgeDescriptor, EdgeId};
pub use network::{RouteGraph, RouteGraphBuilder};
pub use vertex::{Vertex, VertexId, VertexIndex};
