//! Route layers: turning drawn polylines and lines into edge descriptors.
//!
//! A drawing tool exports each layer as polylines (a `points` list such as
//! `"10,10 450,10 450,200"`) and loose lines. Consecutive polyline points
//! become edges, then each line becomes one edge. Edges from the layer named
//! `ground` are flagged as ground; the `ref` layer holds reference artwork and
//! is skipped. Reading the drawing file itself is left to the host.

use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::graph::EdgeDescriptor;

/// Layer name whose edges are ground.
pub const GROUND_LAYER: &str = "ground";

/// Layer name ignored during conversion.
pub const REFERENCE_LAYER: &str = "ref";

type Point = (f64, f64);

/// One drawing layer's route geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLayer {
    /// Layer name.
    pub name: String,
    /// Polylines, each an ordered list of points.
    #[serde(default)]
    pub polylines: Vec<Vec<Point>>,
    /// Standalone line segments.
    #[serde(default)]
    pub lines: Vec<(Point, Point)>,
}

impl RouteLayer {
    /// Create an empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a polyline parsed from a `points` attribute.
    pub fn with_points(mut self, points: &str) -> Result<Self, RouteError> {
        self.polylines.push(parse_points(points)?);
        Ok(self)
    }

    /// Add a single line segment.
    pub fn with_line(mut self, start: Point, end: Point) -> Self {
        self.lines.push((start, end));
        self
    }

    /// Whether this layer's edges are ground.
    pub fn is_ground(&self) -> bool {
        self.name == GROUND_LAYER
    }

    /// Edge descriptors for this layer: polylines first, then lines.
    pub fn edges(&self) -> Vec<EdgeDescriptor> {
        let ground = self.is_ground();
        let polyline_edges = self
            .polylines
            .iter()
            .flat_map(|points| points.windows(2))
            .map(|pair| EdgeDescriptor::new(pair[0], pair[1], ground));
        let line_edges = self
            .lines
            .iter()
            .map(|&(start, end)| EdgeDescriptor::new(start, end, ground));

        polyline_edges.chain(line_edges).collect()
    }
}

/// Parse a whitespace-separated list of `x,y` pairs.
pub fn parse_points(points: &str) -> Result<Vec<Point>, RouteError> {
    points
        .split_whitespace()
        .map(|token| -> Result<Point, RouteError> {
            let (x, y) = token
                .split_once(',')
                .ok_or_else(|| RouteError::MalformedPoint { token: token.to_string() })?;
            Ok((parse_coordinate(x)?, parse_coordinate(y)?))
        })
        .collect()
}

fn parse_coordinate(value: &str) -> Result<f64, RouteError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RouteError::InvalidCoordinate { value: value.to_string() })
}

/// Edge descriptors for every layer in order, skipping the reference layer.
pub fn layers_to_edges(layers: &[RouteLayer]) -> Vec<EdgeDescriptor> {
    layers
        .iter()
        .filter(|layer| layer.name != REFERENCE_LAYER)
        .flat_map(RouteLayer::edges)
        .collect()
}

/// A small courtyard: four junctions around a hub above a sloping ground.
pub fn sample_courtyard() -> Vec<EdgeDescriptor> {
    let (a, b, c, d, e) = (
        (10.0, 10.0),
        (450.0, 10.0),
        (450.0, 200.0),
        (800.0, 100.0),
        (450.0, 100.0),
    );

    let branches = RouteLayer {
        name: "branches".to_string(),
        polylines: Vec::new(),
        lines: vec![(a, b), (a, c), (b, d), (c, d), (e, a), (e, b), (e, c), (e, d)],
    };
    let ground = RouteLayer {
        name: GROUND_LAYER.to_string(),
        polylines: vec![vec![(0.0, 380.0), (400.0, 400.0), (850.0, 390.0)]],
        lines: Vec::new(),
    };

    layers_to_edges(&[branches, ground])
}
