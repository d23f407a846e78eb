//! Vertex crossing: choosing the next edge when the mob runs off the end of
//! the current one.
//!
//! Every edge touching the vertex is a candidate. Exits are entered at their
//! start and travelled forward; entries are entered at their end and
//! travelled in reverse. The candidate whose travel direction makes the
//! smallest angle with the incoming direction wins, so the mob keeps going as
//! straight as the graph allows. The edge just left is a candidate too (as a
//! full reversal), which turns dead ends into bounces.

use log::{trace, warn};

use super::{Facing, OnEdge};
use crate::graph::{EdgeId, RouteGraph, VertexIndex};
use crate::math::Vector2;

/// A candidate continuation at a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exit {
    /// The edge to continue on.
    pub edge: EdgeId,
    /// Travel direction along it.
    pub facing: Facing,
    /// Angle between the incoming direction and the exit's travel direction.
    pub angle: f64,
}

/// All candidate exits at `vertex`, exits before entries, each in adjacency order.
pub fn candidates(graph: &RouteGraph, vertex: VertexIndex, direction: Vector2) -> Vec<Exit> {
    let vertex = graph.vertex(vertex);

    let exits = vertex.exits().iter().map(|&id| Exit {
        edge: id,
        facing: Facing::Forward,
        angle: graph.edge(id).unit().angle_between(direction),
    });
    let entries = vertex.entries().iter().map(|&id| Exit {
        edge: id,
        facing: Facing::Reverse,
        angle: (-graph.edge(id).unit()).angle_between(direction),
    });

    exits.chain(entries).collect()
}

/// The straightest continuation at `vertex`; ties go to the first enumerated.
pub fn best_exit(graph: &RouteGraph, vertex: VertexIndex, direction: Vector2) -> Option<Exit> {
    let mut best: Option<Exit> = None;
    for exit in candidates(graph, vertex, direction) {
        if best.is_none_or(|current| exit.angle < current.angle) {
            best = Some(exit);
        }
    }
    best
}

/// Move the mob across `vertex` onto the best exit.
///
/// `arriving` is the mob parked at `vertex`, the end of the edge it is
/// leaving. The mob lands exactly at the vertex end of the new edge:
/// `leftover` travel is dropped.
///
/// The edge being left always touches `vertex`, so a built graph never runs
/// out of candidates here. If it somehow does, `arriving` is returned
/// unchanged.
pub(crate) fn cross_vertex(
    graph: &RouteGraph,
    vertex: VertexIndex,
    direction: Vector2,
    leftover: f64,
    arriving: OnEdge,
) -> OnEdge {
    let Some(exit) = best_exit(graph, vertex, direction) else {
        warn!(
            "no exit at {} ({}) leaving {}; holding position",
            vertex,
            graph.vertex(vertex).id(),
            arriving.edge
        );
        return arriving;
    };

    let edge = graph.edge(exit.edge);
    let edge_position = match exit.facing {
        Facing::Forward => 0.0,
        Facing::Reverse => edge.length(),
    };

    trace!(
        "crossed {} from {} onto {} ({:?}, {:.3} rad, {:.3} leftover)",
        graph.vertex(vertex).id(),
        arriving.edge,
        exit.edge,
        exit.facing,
        exit.angle,
        leftover
    );

    OnEdge {
        edge: exit.edge,
        edge_position,
        speed: arriving.speed,
        facing: exit.facing,
    }
}
