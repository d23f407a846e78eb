//! Free flight under gravity, with two ways back onto the graph.
//!
//! A grab catches the nearest edge when it lies within one tick of travel.
//! A landing catches a ground edge the mob is about to fall through.

use log::trace;

use super::{Facing, MovementState, OnEdge};
use crate::config::LocomotionConfig;
use crate::graph::RouteGraph;
use crate::input::Intent;
use crate::math::Vector2;

/// The mob in free flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Airborne {
    /// World position.
    pub position: Vector2,
    /// Velocity in units per tick.
    pub velocity: Vector2,
    /// Ticks left before grabbing is allowed again.
    pub standoff: i32,
}

impl Airborne {
    /// Take off from `position` with an initial `velocity`.
    pub fn launch(position: Vector2, velocity: Vector2, standoff: i32) -> Self {
        Self {
            position,
            velocity,
            standoff,
        }
    }

    /// Run one tick.
    ///
    /// Horizontal velocity eases toward the steering target, gravity is
    /// applied, then the grab and ground checks run against the current
    /// position before the mob is moved.
    pub fn advance(self, graph: &RouteGraph, config: &LocomotionConfig, intent: Intent) -> MovementState {
        let target_x = intent.direction.x * config.air_speed;
        let velocity = Vector2::new(
            self.velocity.x + (target_x - self.velocity.x) * config.air_control,
            self.velocity.y + config.gravity,
        );
        let standoff = self.standoff.saturating_sub(1);

        if !intent.jump && standoff <= 0 {
            if let Some(grabbed) = self.grab(graph, config, velocity) {
                return grabbed.into();
            }
        }

        if let Some(landed) = self.land(graph, config, velocity) {
            return landed.into();
        }

        Airborne {
            position: self.position + velocity,
            velocity,
            standoff,
        }
        .into()
    }

    /// Catch the closest edge if it is nearer than this tick's travel.
    fn grab(&self, graph: &RouteGraph, config: &LocomotionConfig, velocity: Vector2) -> Option<OnEdge> {
        let id = graph.closest_edge(self.position);
        let edge = graph.edge(id);
        let anchor = edge.project_point(self.position);

        if self.position.distance_to(anchor) >= velocity.length() {
            return None;
        }

        let facing = Facing::from_alignment(velocity.dot(edge.unit()));
        trace!("grabbed {} at {} ({:?})", id, anchor, facing);
        Some(OnEdge::anchored(graph, id, self.position, config.base_speed, facing))
    }

    /// Land on the first ground edge under the mob that this tick's fall would cross.
    fn land(&self, graph: &RouteGraph, config: &LocomotionConfig, velocity: Vector2) -> Option<OnEdge> {
        let fall_to = self.position.y + velocity.y;

        graph
            .ground_edges_spanning(self.position.x)
            .into_iter()
            .find(|&id| graph.edge(id).project_point(self.position).y < fall_to)
            .map(|id| {
                let facing = Facing::from_alignment(velocity.dot(graph.edge(id).unit()));
                trace!("landed on {} below {}", id, self.position);
                OnEdge::anchored(graph, id, self.position, config.base_speed, facing)
            })
    }
}
