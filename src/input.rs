//! Per-tick movement intent and the seam to whatever produces it.
//!
//! Device capture lives outside the crate. An [`IntentSource`] is polled once
//! per tick by the host driver and the resulting [`Intent`] is handed to the
//! world as a plain value.

use serde::{Deserialize, Serialize};

use crate::math::Vector2;

/// What the player wants the mob to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Intent {
    /// Desired direction, magnitude in `[0, 1]`.
    pub direction: Vector2,
    /// Jump held this tick.
    #[serde(default)]
    pub jump: bool,
}

impl Intent {
    /// No input.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Move toward `direction` without jumping.
    pub fn toward(direction: Vector2) -> Self {
        Self {
            direction,
            jump: false,
        }
    }

    /// Jump while steering toward `direction`.
    pub fn jump(direction: Vector2) -> Self {
        Self {
            direction,
            jump: true,
        }
    }

    /// Map held keys to an intent, WASD style.
    ///
    /// Opposite keys cancel. Diagonals are normalized so the magnitude never
    /// exceeds 1.
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool, jump: bool) -> Self {
        let axis = |negative: bool, positive: bool| match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let direction = Vector2::new(axis(left, right), axis(up, down));
        Self {
            direction: direction.normalize(),
            jump,
        }
    }

    /// Replace a non-finite direction with zero and clamp the magnitude to 1.
    pub fn sanitized(self) -> Self {
        let direction = if self.direction.is_finite() {
            self.direction.clamp_length(1.0)
        } else {
            Vector2::ZERO
        };
        Self { direction, ..self }
    }
}

/// Produces one intent per tick.
pub trait IntentSource {
    /// Sample the current intent. Called exactly once per tick.
    fn poll(&mut self) -> Intent;
}

/// Replays a fixed list of intents, then idles forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIntents {
    script: Vec<Intent>,
    cursor: usize,
}

impl ScriptedIntents {
    /// Create a source from an ordered script.
    pub fn new(script: Vec<Intent>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Repeat `intent` for `ticks` ticks.
    pub fn repeat(intent: Intent, ticks: usize) -> Self {
        Self::new(vec![intent; ticks])
    }

    /// Append `intent` for `ticks` more ticks.
    pub fn then(mut self, intent: Intent, ticks: usize) -> Self {
        self.script.extend(std::iter::repeat_n(intent, ticks));
        self
    }
}

impl IntentSource for ScriptedIntents {
    fn poll(&mut self) -> Intent {
        match self.script.get(self.cursor) {
            Some(&intent) => {
                self.cursor += 1;
                intent
            }
            None => Intent::idle(),
        }
    }
}

/// Exponential smoothing of the intent direction across ticks.
///
/// The smoothed direction persists between ticks and moves toward each new
/// raw direction by `factor`. The jump flag passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSmoother {
    factor: f64,
    direction: Vector2,
}

impl InputSmoother {
    /// Create a smoother; `factor` of 1.0 passes input through unchanged.
    pub fn new(factor: f64) -> Self {
        Self {
            factor: factor.clamp(f64::EPSILON, 1.0),
            direction: Vector2::ZERO,
        }
    }

    /// Blend `raw` into the running direction and return the smoothed intent.
    pub fn apply(&mut self, raw: Intent) -> Intent {
        let raw = raw.sanitized();
        let mixed = self.direction.mix(raw.direction, self.factor).clamp_length(1.0);
        // Snap tiny residuals to rest so an idle mob really stops
        self.direction = if mixed.length_squared() < 1e-12 {
            Vector2::ZERO
        } else {
            mixed
        };
        Intent {
            direction: self.direction,
            jump: raw.jump,
        }
    }

    /// The current smoothed direction.
    pub fn direction(&self) -> Vector2 {
        self.direction
    }

    /// Forget accumulated direction.
    pub fn reset(&mut self) {
        self.direction = Vector2::ZERO;
    }
}
