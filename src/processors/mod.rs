//! Geometric processing shared by the arbitration pipeline.

pub mod geometry;

pub use geometry::{BoundingBox, IOU_EPSILON, Point};
