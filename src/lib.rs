//! Squirrel - WASM Module
//!
//! This module provides the locomotion engine for Squirrel: a single mob
//! running along a fixed planar graph of route segments, able to jump off
//! into free flight and grab back on. It is compiled to WebAssembly and
//! exposes a JavaScript-friendly API via wasm-bindgen; drawing, input capture
//! and the animation loop stay on the JavaScript side.
//!
//! # Architecture
//!
//! - `math`: 2D vector value type
//! - `graph`: Route graph (petgraph StableGraph topology + edge geometry)
//! - `spatial`: R-tree index over ground edges
//! - `locomotion`: OnEdge / Airborne state machine and vertex crossing
//! - `world`: Owns graph and mob, runs one tick at a time
//! - `input`: Per-tick intent, intent sources and smoothing
//! - `routes`: Route-layer polylines to edge descriptors

use js_sys::Float64Array;
use log::LevelFilter;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod locomotion;
pub mod logging;
pub mod math;
pub mod routes;
pub mod spatial;
pub mod world;

pub use config::LocomotionConfig;
pub use error::{ConfigError, GraphError, RouteError, WorldError};
pub use graph::{EdgeDescriptor, EdgeId, RouteGraph};
pub use input::{Intent, IntentSource, ScriptedIntents};
pub use locomotion::{Mode, MovementState};
pub use math::Vector2;
pub use world::{Frame, World};

use routes::RouteLayer;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Warn);
}

/// Set the console log level (`"off"`, `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    logging::init(logging::parse_level(level));
}

/// Main entry point for the locomotion engine.
///
/// This struct wraps the internal World and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct SquirrelWorldWasm {
    world: World,
}

#[wasm_bindgen]
impl SquirrelWorldWasm {
    /// Create a world from edge descriptors.
    ///
    /// # Arguments
    ///
    /// * `edges` - Array of `{ start: [x, y], end: [x, y], ground?: boolean }`
    /// * `config` - Optional partial `LocomotionConfig` (camelCase keys)
    /// * `spawn_x`, `spawn_y` - The mob starts on the edge closest to this point
    #[wasm_bindgen(constructor)]
    pub fn new(edges: JsValue, config: JsValue, spawn_x: f64, spawn_y: f64) -> Result<SquirrelWorldWasm, JsError> {
        let descriptors: Vec<EdgeDescriptor> = serde_wasm_bindgen::from_value(edges)?;
        Self::build(&descriptors, config, spawn_x, spawn_y)
    }

    /// Create a world from route layers.
    ///
    /// `layers` is an array of `{ name, polylines: [[[x, y], ...]], lines: [[[x, y], [x, y]]] }`.
    /// The `ground` layer becomes ground edges and the `ref` layer is skipped.
    #[wasm_bindgen(js_name = fromLayers)]
    pub fn from_layers(layers: JsValue, config: JsValue, spawn_x: f64, spawn_y: f64) -> Result<SquirrelWorldWasm, JsError> {
        let layers: Vec<RouteLayer> = serde_wasm_bindgen::from_value(layers)?;
        Self::build(&routes::layers_to_edges(&layers), config, spawn_x, spawn_y)
    }

    /// Create a world on the built-in courtyard routes.
    #[wasm_bindgen(js_name = sample)]
    pub fn sample(config: JsValue) -> Result<SquirrelWorldWasm, JsError> {
        Self::build(&routes::sample_courtyard(), config, 50.0, 50.0)
    }

    fn build(
        descriptors: &[EdgeDescriptor],
        config: JsValue,
        spawn_x: f64,
        spawn_y: f64,
    ) -> Result<SquirrelWorldWasm, JsError> {
        let config: LocomotionConfig = if config.is_undefined() || config.is_null() {
            LocomotionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let graph = RouteGraph::from_descriptors(descriptors)?;
        let world = World::new(graph, config, Vector2::new(spawn_x, spawn_y))?;
        Ok(Self { world })
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance one tick with a direction and jump flag.
    ///
    /// Returns the frame as `{ position: {x, y}, direction: {x, y}, mode }`.
    pub fn tick(&mut self, dx: f64, dy: f64, jump: bool) -> Result<JsValue, JsError> {
        let frame = self.world.tick(Intent {
            direction: Vector2::new(dx, dy),
            jump,
        });
        Ok(serde_wasm_bindgen::to_value(&frame)?)
    }

    /// Advance one tick from held keys (WASD style).
    #[wasm_bindgen(js_name = tickKeys)]
    pub fn tick_keys(&mut self, left: bool, right: bool, up: bool, down: bool, jump: bool) -> Result<JsValue, JsError> {
        let frame = self.world.tick(Intent::from_keys(left, right, up, down, jump));
        Ok(serde_wasm_bindgen::to_value(&frame)?)
    }

    /// Move the mob onto the edge closest to a point.
    ///
    /// Fails without moving the mob when the point is not finite.
    pub fn respawn(&mut self, x: f64, y: f64) -> Result<(), JsError> {
        self.world.respawn(Vector2::new(x, y))?;
        Ok(())
    }

    /// Get the number of ticks run.
    #[wasm_bindgen(js_name = tickCount)]
    pub fn tick_count(&self) -> f64 {
        self.world.tick_count() as f64
    }

    // =========================================================================
    // Mob State
    // =========================================================================

    /// Get the mob's X position.
    #[wasm_bindgen(js_name = positionX)]
    pub fn position_x(&self) -> f64 {
        self.world.frame().position.x
    }

    /// Get the mob's Y position.
    #[wasm_bindgen(js_name = positionY)]
    pub fn position_y(&self) -> f64 {
        self.world.frame().position.y
    }

    /// Get the mob's X heading.
    #[wasm_bindgen(js_name = directionX)]
    pub fn direction_x(&self) -> f64 {
        self.world.frame().direction.x
    }

    /// Get the mob's Y heading.
    #[wasm_bindgen(js_name = directionY)]
    pub fn direction_y(&self) -> f64 {
        self.world.frame().direction.y
    }

    /// Check if the mob is in free flight.
    #[wasm_bindgen(js_name = isAirborne)]
    pub fn is_airborne(&self) -> bool {
        self.world.state().mode() == Mode::Airborne
    }

    // =========================================================================
    // Route Geometry
    // =========================================================================

    /// Get the edges as `[sx0, sy0, ex0, ey0, ground0, ...]` for drawing.
    #[wasm_bindgen(js_name = edgeSegments)]
    pub fn edge_segments(&self) -> Float64Array {
        Float64Array::from(&self.world.graph().edge_segments()[..])
    }

    /// Get vertex positions as `[x0, y0, x1, y1, ...]`.
    #[wasm_bindgen(js_name = vertexPositions)]
    pub fn vertex_positions(&self) -> Float64Array {
        let positions: Vec<f64> = self
            .world
            .graph()
            .vertices()
            .iter()
            .flat_map(|v| [v.position().x, v.position().y])
            .collect();
        Float64Array::from(&positions[..])
    }

    /// Get the bounding box of all vertices as `[min_x, min_y, max_x, max_y]`.
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Vec<f64> {
        let (min, max) = self.world.graph().bounds();
        vec![min.x, min.y, max.x, max.y]
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use locomotion::OnEdge;

    /// Test the full pipeline: route layers → descriptors → graph → world ticks.
    /// This mirrors what `fromLayers` + `tick` do, without JS types.
    #[test]
    fn test_layers_to_world_pipeline() {
        let layers = vec![
            RouteLayer::new("branches")
                .with_points("10,10 450,10 800,100")
                .unwrap(),
            RouteLayer::new(routes::GROUND_LAYER).with_line((0.0, 400.0), (900.0, 400.0)),
        ];
        let descriptors = routes::layers_to_edges(&layers);
        println!("descriptors: {:?}", descriptors);
        assert_eq!(descriptors.len(), 3);

        let graph = RouteGraph::from_descriptors(&descriptors).unwrap();
        let mut world = World::new(graph, LocomotionConfig::default(), Vector2::new(100.0, 15.0)).unwrap();
        assert_eq!(world.state().as_on_edge().map(|s| s.edge), Some(EdgeId(0)));

        // Run right along the top branch until past the corner
        let mut source = ScriptedIntents::repeat(Intent::toward(Vector2::new(1.0, 0.0)), 150);
        let frames = world.run(&mut source, 150);
        assert!(frames.iter().all(|f| f.mode == Mode::OnEdge));

        let state = world.state().as_on_edge().unwrap();
        println!("after run: {:?}", state);
        assert_eq!(state.edge, EdgeId(1));
        assert!(world.frame().position.x > 450.0);
    }

    /// Same graph, same start, same intents: identical frames.
    #[test]
    fn test_deterministic_replay() {
        let script = || {
            ScriptedIntents::repeat(Intent::toward(Vector2::new(1.0, 0.2)), 40)
                .then(Intent::jump(Vector2::new(0.6, -0.8)), 1)
                .then(Intent::toward(Vector2::new(-1.0, 0.0)), 80)
                .then(Intent::jump(Vector2::new(0.0, -1.0)), 3)
                .then(Intent::idle(), 60)
        };

        let run = || {
            let graph = RouteGraph::from_descriptors(&routes::sample_courtyard()).unwrap();
            let mut world = World::new(graph, LocomotionConfig::default(), Vector2::new(50.0, 50.0)).unwrap();
            world.run(&mut script(), 200)
        };

        let first = run();
        let second = run();
        assert_eq!(first.len(), 200);
        assert_eq!(first, second);
        assert!(first.iter().any(|f| f.mode == Mode::Airborne));
    }

    /// Horizontal edge of length 100, starting at offset 50 with aligned input:
    /// reaches the end, then crosses onto the best neighbour at one of its ends.
    #[test]
    fn test_run_to_vertex_and_cross() {
        let graph = RouteGraph::from_descriptors(&[
            EdgeDescriptor::new((0.0, 0.0), (100.0, 0.0), false),
            EdgeDescriptor::new((100.0, 0.0), (100.0, 100.0), false),
            EdgeDescriptor::new((200.0, -20.0), (100.0, 0.0), false),
        ])
        .unwrap();
        let config = LocomotionConfig::default();
        let start = OnEdge::new(EdgeId(0), 50.0, config.base_speed, locomotion::Facing::Forward);
        let mut state = MovementState::from(start);
        let right = Intent::toward(Vector2::new(1.0, 0.0));

        let mut previous = start;
        for _ in 0..100 {
            state = state.advance(&graph, &config, right);
            let on_edge = state.as_on_edge().copied().unwrap();
            if on_edge.edge == EdgeId(0) {
                assert!(on_edge.edge_position <= 100.0);
                previous = on_edge;
                continue;
            }

            // Crosses on the tick whose target first passes the end vertex
            assert!(previous.edge_position + on_edge.speed > 100.0);

            // Straight on is the entry edge from (200, -20), run in reverse
            assert_eq!(on_edge.edge, EdgeId(2));
            assert_eq!(on_edge.edge_position, graph.edge(on_edge.edge).length());
            assert_eq!(on_edge.facing, locomotion::Facing::Reverse);
            return;
        }

        panic!("never crossed the vertex");
    }
}
