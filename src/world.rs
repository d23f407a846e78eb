//! World - owns the route graph and the mob, and drives one tick at a time.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::LocomotionConfig;
use crate::error::WorldError;
use crate::graph::RouteGraph;
use crate::input::{InputSmoother, Intent, IntentSource};
use crate::locomotion::{Facing, Mode, MovementState, OnEdge};
use crate::math::Vector2;

/// What a renderer needs to draw the mob after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// World position.
    pub position: Vector2,
    /// Unit heading (zero when airborne at rest).
    pub direction: Vector2,
    /// Current locomotion mode.
    pub mode: Mode,
}

/// The simulation: one graph, one mob.
///
/// Ticks are fully deterministic. The same graph, config, starting state and
/// intent sequence always produce the same frames.
#[derive(Debug, Clone)]
pub struct World {
    graph: RouteGraph,
    config: LocomotionConfig,
    state: MovementState,
    smoother: InputSmoother,
    ticks: u64,
}

impl World {
    /// Create a world with the mob attached to the edge closest to `spawn`.
    pub fn new(graph: RouteGraph, config: LocomotionConfig, spawn: Vector2) -> Result<Self, WorldError> {
        config.validate()?;
        let state = spawn_state(&graph, &config, spawn)?;
        Self::with_state(graph, config, state.into())
    }

    /// Create a world with an explicit starting state.
    ///
    /// An on-edge state must name an edge of `graph` with its offset on that
    /// edge; every coordinate, velocity and speed must be finite.
    pub fn with_state(
        graph: RouteGraph,
        config: LocomotionConfig,
        state: MovementState,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        check_state(&graph, &state)?;
        Ok(Self {
            graph,
            config,
            state,
            smoother: InputSmoother::new(config.input_smoothing),
            ticks: 0,
        })
    }

    /// Advance one tick: smooth the input, then step the movement state.
    pub fn tick(&mut self, intent: Intent) -> Frame {
        let intent = self.smoother.apply(intent);
        self.state = self.state.advance(&self.graph, &self.config, intent);
        self.ticks += 1;
        self.frame()
    }

    /// Poll `source` once per tick for `ticks` ticks, collecting the frames.
    pub fn run(&mut self, source: &mut impl IntentSource, ticks: usize) -> Vec<Frame> {
        (0..ticks).map(|_| self.tick(source.poll())).collect()
    }

    /// The current frame without advancing.
    pub fn frame(&self) -> Frame {
        Frame {
            position: self.state.position(&self.graph),
            direction: self.state.direction(&self.graph),
            mode: self.state.mode(),
        }
    }

    /// The route graph.
    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// The active configuration.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// The mob's current movement state.
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    /// Ticks run since creation.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Teleport the mob onto the edge closest to `point` and clear smoothed input.
    ///
    /// A non-finite point is refused and the mob stays where it is.
    pub fn respawn(&mut self, point: Vector2) -> Result<(), WorldError> {
        let state = spawn_state(&self.graph, &self.config, point)
            .inspect_err(|err| warn!("respawn refused: {}", err))?;
        self.state = state.into();
        self.smoother.reset();
        Ok(())
    }
}

fn spawn_state(graph: &RouteGraph, config: &LocomotionConfig, point: Vector2) -> Result<OnEdge, WorldError> {
    if !point.is_finite() {
        return Err(WorldError::NonFiniteSpawn { point });
    }
    let edge = graph.closest_edge(point);
    Ok(OnEdge::anchored(graph, edge, point, config.base_speed, Facing::Forward))
}

fn check_state(graph: &RouteGraph, state: &MovementState) -> Result<(), WorldError> {
    match state {
        MovementState::OnEdge(on_edge) => {
            if on_edge.edge.index() >= graph.edge_count() {
                return Err(WorldError::UnknownEdge {
                    edge: on_edge.edge,
                    edge_count: graph.edge_count(),
                });
            }
            if !on_edge.edge_position.is_finite() {
                return Err(WorldError::NonFiniteState { field: "edge_position" });
            }
            if !on_edge.speed.is_finite() {
                return Err(WorldError::NonFiniteState { field: "speed" });
            }
            let length = graph.edge(on_edge.edge).length();
            if !(0.0..=length).contains(&on_edge.edge_position) {
                return Err(WorldError::OffsetOutOfRange {
                    edge: on_edge.edge,
                    offset: on_edge.edge_position,
                    length,
                });
            }
        }
        MovementState::Airborne(airborne) => {
            if !airborne.position.is_finite() {
                return Err(WorldError::NonFiniteState { field: "position" });
            }
            if !airborne.velocity.is_finite() {
                return Err(WorldError::NonFiniteState { field: "velocity" });
            }
        }
    }
    Ok(())
}
