//! Math type re-exports and small geometric value types.
//!
//! This module re-exports types from `glam` and provides the value types
//! stored by the geometry kinds (intervals, lines, planes, bounding boxes).
//! Nothing here evaluates curves or surfaces.

// Re-export glam types
pub use glam::{DVec2, DVec3, DVec4, Vec3};

use std::fmt;

/// Closed parameter interval `[t0, t1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub t0: f64,
    pub t1: f64,
}

impl Interval {
    /// Create an interval.
    #[inline]
    pub const fn new(t0: f64, t1: f64) -> Self {
        Self { t0, t1 }
    }

    /// Signed length `t1 - t0`.
    #[inline]
    pub fn length(&self) -> f64 {
        self.t1 - self.t0
    }

    /// True when `t0 < t1` and both ends are finite.
    #[inline]
    pub fn is_increasing(&self) -> bool {
        self.t0.is_finite() && self.t1.is_finite() && self.t0 < self.t1
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Line segment between two points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Line {
    pub from: DVec3,
    pub to: DVec3,
}

impl Line {
    /// Create a line.
    #[inline]
    pub const fn new(from: DVec3, to: DVec3) -> Self {
        Self { from, to }
    }

    /// Distance between the end points.
    #[inline]
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// Plane frame: origin plus two in-plane axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub origin: DVec3,
    pub x_axis: DVec3,
    pub y_axis: DVec3,
}

impl Plane {
    /// World XY plane.
    pub const WORLD_XY: Self = Self {
        origin: DVec3::ZERO,
        x_axis: DVec3::X,
        y_axis: DVec3::Y,
    };

    /// Plane normal (`x_axis` cross `y_axis`).
    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.x_axis.cross(self.y_axis)
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::WORLD_XY
    }
}

/// Axis aligned bounding box with double precision.
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Bounding box of a point set. Empty for an empty set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.expand_by_point(*p);
        }
        b
    }

    /// Check if this box contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand this box to include another box.
    #[inline]
    pub fn expand_by_box(&mut self, other: &Self) {
        if !other.is_empty() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    /// Get the center of the box.
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (extents) of the box.
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundingBox({:?} - {:?})", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mut b = BoundingBox::EMPTY;
        assert!(b.is_empty());

        b.expand_by_point(DVec3::new(-1.0, -1.0, -1.0));
        b.expand_by_point(DVec3::new(1.0, 1.0, 1.0));

        assert_eq!(b.center(), DVec3::ZERO);
        assert_eq!(b.size(), DVec3::splat(2.0));
    }

    #[test]
    fn test_bounding_box_from_points() {
        let pts = [DVec3::new(0.0, 2.0, 0.0), DVec3::new(3.0, -1.0, 1.0)];
        let b = BoundingBox::from_points(&pts);
        assert_eq!(b.min, DVec3::new(0.0, -1.0, 0.0));
        assert_eq!(b.max, DVec3::new(3.0, 2.0, 1.0));

        let empty: [DVec3; 0] = [];
        assert!(BoundingBox::from_points(&empty).is_empty());
    }

    #[test]
    fn test_interval() {
        let i = Interval::new(2.0, 5.0);
        assert_eq!(i.length(), 3.0);
        assert!(i.is_increasing());
        assert!(!Interval::new(1.0, 1.0).is_increasing());
    }

    #[test]
    fn test_plane_normal() {
        assert_eq!(Plane::WORLD_XY.normal(), DVec3::Z);
    }
}
