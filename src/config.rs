//! Locomotion tunables.
//!
//! All values are per tick: the engine assumes a fixed step, so speeds are
//! canvas units per tick and gravity is units per tick squared.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for on-edge and airborne movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocomotionConfig {
    /// On-edge speed with no sustained input (default: 2.0).
    pub base_speed: f64,
    /// Cap for the on-edge speed ramp (default: 6.0).
    pub max_speed: f64,
    /// Speed gained per tick of sustained input (default: 0.15).
    pub acceleration: f64,
    /// Input magnitude above which the speed ramps (default: 0.5).
    pub input_threshold: f64,
    /// Downward acceleration while airborne (default: 0.35).
    pub gravity: f64,
    /// Horizontal airborne speed the mob steers toward at full input (default: 4.0).
    pub air_speed: f64,
    /// Mix factor toward the steering target per tick, in `(0, 1]` (default: 0.1).
    pub air_control: f64,
    /// Ticks after take-off during which grabbing an edge is disabled (default: 8).
    pub standoff_ticks: i32,
    /// Mix factor for direction smoothing across ticks, in `(0, 1]`.
    /// `1.0` disables smoothing (default: 0.35).
    pub input_smoothing: f64,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            max_speed: 6.0,
            acceleration: 0.15,
            input_threshold: 0.5,
            gravity: 0.35,
            air_speed: 4.0,
            air_control: 0.1,
            standoff_ticks: 8,
            input_smoothing: 0.35,
        }
    }
}

impl LocomotionConfig {
    /// Check every tunable is finite and within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("input_threshold", self.input_threshold),
            ("gravity", self.gravity),
            ("air_speed", self.air_speed),
            ("air_control", self.air_control),
            ("input_smoothing", self.input_smoothing),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }

        let out_of_range = |field, value, expected| ConfigError::OutOfRange {
            field,
            value,
            expected,
        };

        if self.base_speed <= 0.0 {
            return Err(out_of_range("base_speed", self.base_speed, "> 0"));
        }
        if self.max_speed < self.base_speed {
            return Err(out_of_range("max_speed", self.max_speed, ">= base_speed"));
        }
        if self.acceleration < 0.0 {
            return Err(out_of_range("acceleration", self.acceleration, ">= 0"));
        }
        if !(0.0..1.0).contains(&self.input_threshold) {
            return Err(out_of_range("input_threshold", self.input_threshold, "0 <= value < 1"));
        }
        if self.gravity < 0.0 {
            return Err(out_of_range("gravity", self.gravity, ">= 0"));
        }
        if self.air_speed < 0.0 {
            return Err(out_of_range("air_speed", self.air_speed, ">= 0"));
        }
        if self.air_control <= 0.0 || self.air_control > 1.0 {
            return Err(out_of_range("air_control", self.air_control, "0 < value <= 1"));
        }
        // The first airborne tick counts down before the grab check, so one
        // tick of standoff would still allow a grab straight after take-off.
        if self.standoff_ticks < 2 {
            return Err(out_of_range("standoff_ticks", f64::from(self.standoff_ticks), ">= 2"));
        }
        if self.input_smoothing <= 0.0 || self.input_smoothing > 1.0 {
            return Err(out_of_range("input_smoothing", self.input_smoothing, "0 < value <= 1"));
        }

        Ok(())
    }
}
