//! Geometric utilities for matching text regions across engines.
//!
//! This module provides the point type used by detection polygons and the
//! axis-aligned bounding box derived from them, together with the overlap
//! measures used when regions from different engines are compared.

use serde::{Deserialize, Serialize};

/// Small constant added to the IoU denominator so that two zero-area boxes
/// never divide by zero.
pub const IOU_EPSILON: f32 = 1e-6;

/// A 2D point with floating-point coordinates.
///
/// On the wire a point is a two-element array `[x, y]`, which is the layout
/// recognition engines and clients exchange polygons in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// An axis-aligned bounding box `(x_min, y_min, x_max, y_max)`.
///
/// Boxes are derived from detection polygons on demand and are never stored
/// alongside them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    /// Creates a bounding box from its corner coordinates.
    pub fn from_coords(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Computes the bounding box enclosing a polygon.
    ///
    /// # Returns
    ///
    /// `None` if `points` is empty, since the extent of an empty polygon is
    /// undefined.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self::from_coords(first.x, first.y, first.x, first.y);
        Some(points[1..].iter().fold(init, |acc, p| Self {
            x_min: acc.x_min.min(p.x),
            y_min: acc.y_min.min(p.y),
            x_max: acc.x_max.max(p.x),
            y_max: acc.y_max.max(p.y),
        }))
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Computes the area of intersection between this bounding box and another.
    ///
    /// The intersection width and height are clamped at zero, so disjoint
    /// boxes yield `0.0` rather than a negative area.
    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let inter_w = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let inter_h = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        inter_w * inter_h
    }

    /// Computes the Intersection over Union (IoU) between this bounding box and another.
    ///
    /// Returns exactly `0.0` when the boxes do not intersect. Otherwise the
    /// union is padded with [`IOU_EPSILON`], so the IoU of a box with itself
    /// is `area / (area + IOU_EPSILON)` rather than exactly one.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let inter_area = self.intersection_area(other);
        if inter_area == 0.0 {
            return 0.0;
        }

        inter_area / (self.area() + other.area() - inter_area + IOU_EPSILON)
    }
}
