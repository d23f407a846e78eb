//! Edge-constrained movement.

use log::trace;

use super::crossing::cross_vertex;
use super::{Airborne, Facing, MovementState};
use crate::config::LocomotionConfig;
use crate::graph::{EdgeId, RouteGraph};
use crate::input::Intent;
use crate::math::Vector2;

/// The mob running along a single edge.
///
/// `edge_position` is the distance from the edge's start vertex and always
/// lies in `[0, edge.length()]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnEdge {
    /// The edge being run along.
    pub edge: EdgeId,
    /// Offset from the start vertex.
    pub edge_position: f64,
    /// Current run speed in units per tick.
    pub speed: f64,
    /// Last direction of travel.
    pub facing: Facing,
}

impl OnEdge {
    /// Create an on-edge state.
    pub fn new(edge: EdgeId, edge_position: f64, speed: f64, facing: Facing) -> Self {
        Self {
            edge,
            edge_position,
            speed,
            facing,
        }
    }

    /// Attach to `edge` at the point closest to `point`.
    pub fn anchored(graph: &RouteGraph, edge: EdgeId, point: Vector2, speed: f64, facing: Facing) -> Self {
        let segment = graph.edge(edge);
        Self::new(edge, segment.project(point) * segment.length(), speed, facing)
    }

    /// World position on the edge.
    pub fn position(&self, graph: &RouteGraph) -> Vector2 {
        graph.edge(self.edge).point_at(self.edge_position)
    }

    /// Unit heading along the edge.
    pub fn direction(&self, graph: &RouteGraph) -> Vector2 {
        graph.edge(self.edge).unit() * self.facing.sign()
    }

    /// Run one tick.
    ///
    /// Sustained input above the threshold ramps the speed toward the cap;
    /// anything else drops it back to the base speed. Jump launches into the
    /// air with `direction * speed`. Otherwise the mob slides along the edge
    /// by the component of the input that aligns with it, crossing a vertex
    /// if it runs off either end.
    pub fn advance(self, graph: &RouteGraph, config: &LocomotionConfig, intent: Intent) -> MovementState {
        let edge = graph.edge(self.edge);

        let speed = if intent.direction.length() > config.input_threshold {
            (self.speed + config.acceleration).min(config.max_speed)
        } else {
            config.base_speed
        };

        if intent.jump {
            let position = edge.point_at(self.edge_position);
            let leap = intent.direction * speed;
            trace!("jump from {} at {:.2}: leap {}", self.edge, self.edge_position, leap);
            return Airborne::launch(position, leap, config.standoff_ticks).into();
        }

        let alignment = edge.unit().dot(intent.direction);
        if alignment == 0.0 {
            return OnEdge { speed, ..self }.into();
        }

        let facing = Facing::from_alignment(alignment);
        let target = self.edge_position + alignment * speed;

        if target > edge.length() {
            let arriving = OnEdge::new(self.edge, edge.length(), speed, facing);
            cross_vertex(graph, edge.end(), edge.unit(), target - edge.length(), arriving).into()
        } else if target < 0.0 {
            let arriving = OnEdge::new(self.edge, 0.0, speed, facing);
            cross_vertex(graph, edge.start(), -edge.unit(), -target, arriving).into()
        } else {
            OnEdge::new(self.edge, target, speed, facing).into()
        }
    }
}
