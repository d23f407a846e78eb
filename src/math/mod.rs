//! Planar math primitives.
//!
//! Everything in the engine works in canvas space: `x` grows to the right
//! and `y` grows downward, so gravity is a positive `y` component.

mod vector;

pub use vector::Vector2;
