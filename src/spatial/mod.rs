//! Spatial indexing for the per-tick ground check.
//!
//! This module provides an R-tree over ground-edge bounding boxes so an
//! airborne mob only tests the ground segments under its current x.

mod rtree;

pub use rtree::GroundIndex;
