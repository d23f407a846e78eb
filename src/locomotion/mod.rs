//! Locomotion state machine.
//!
//! The mob is always in exactly one [`MovementState`]: running along an edge
//! or flying free. Each tick the current state consumes an [`Intent`] and
//! returns the state for the next tick, which may be the other variant.
//!
//! - [`OnEdge`]: constrained to one edge, tracked by a scalar offset
//! - [`Airborne`]: free position and velocity under gravity
//! - [`crossing`]: picks the edge to continue onto at a vertex

mod airborne;
pub mod crossing;
mod on_edge;

use serde::{Deserialize, Serialize};

pub use airborne::Airborne;
pub use on_edge::OnEdge;

use crate::config::LocomotionConfig;
use crate::graph::RouteGraph;
use crate::input::Intent;
use crate::math::Vector2;

/// Which variant a [`MovementState`] is, for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Running along an edge.
    OnEdge,
    /// Free flight.
    Airborne,
}

/// Direction of travel along an edge, relative to its start→end orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facing {
    /// Toward the end vertex.
    #[default]
    Forward,
    /// Toward the start vertex.
    Reverse,
}

impl Facing {
    /// `+1.0` forward, `-1.0` reverse.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Facing::Forward => 1.0,
            Facing::Reverse => -1.0,
        }
    }

    /// Facing implied by a signed alignment with the edge direction.
    /// Zero counts as forward.
    #[inline]
    pub fn from_alignment(alignment: f64) -> Self {
        if alignment < 0.0 {
            Facing::Reverse
        } else {
            Facing::Forward
        }
    }
}

/// The mob's movement state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementState {
    /// Constrained to an edge.
    OnEdge(OnEdge),
    /// In free flight.
    Airborne(Airborne),
}

impl MovementState {
    /// Run one tick and return the next state.
    ///
    /// The intent is sanitized first: a non-finite direction counts as no
    /// input and magnitudes above 1 are clamped.
    pub fn advance(self, graph: &RouteGraph, config: &LocomotionConfig, intent: Intent) -> Self {
        let intent = intent.sanitized();
        match self {
            MovementState::OnEdge(state) => state.advance(graph, config, intent),
            MovementState::Airborne(state) => state.advance(graph, config, intent),
        }
    }

    /// Which variant this is.
    pub fn mode(&self) -> Mode {
        match self {
            MovementState::OnEdge(_) => Mode::OnEdge,
            MovementState::Airborne(_) => Mode::Airborne,
        }
    }

    /// World position of the mob.
    pub fn position(&self, graph: &RouteGraph) -> Vector2 {
        match self {
            MovementState::OnEdge(state) => state.position(graph),
            MovementState::Airborne(state) => state.position,
        }
    }

    /// Unit heading of the mob; zero when airborne and at rest.
    pub fn direction(&self, graph: &RouteGraph) -> Vector2 {
        match self {
            MovementState::OnEdge(state) => state.direction(graph),
            MovementState::Airborne(state) => state.velocity.normalize(),
        }
    }

    /// The on-edge state, if that is the current variant.
    pub fn as_on_edge(&self) -> Option<&OnEdge> {
        match self {
            MovementState::OnEdge(state) => Some(state),
            MovementState::Airborne(_) => None,
        }
    }

    /// The airborne state, if that is the current variant.
    pub fn as_airborne(&self) -> Option<&Airborne> {
        match self {
            MovementState::OnEdge(_) => None,
            MovementState::Airborne(state) => Some(state),
        }
    }
}

impl From<OnEdge> for MovementState {
    fn from(state: OnEdge) -> Self {
        MovementState::OnEdge(state)
    }
}

impl From<Airborne> for MovementState {
    fn from(state: Airborne) -> Self {
        MovementState::Airborne(state)
    }
}
