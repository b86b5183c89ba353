//! Circular arc curve.

use std::f64::consts::TAU;

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, ARC_CURVE_CLASS_ID};
use crate::util::{BoundingBox, DVec3, Interval, Plane, Result};

/// Arc of a circle lying in a plane, centered at the plane origin.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcCurve {
    pub plane: Plane,
    pub radius: f64,
    /// Sweep in radians measured from the plane x axis.
    pub angle: Interval,
    pub domain: Interval,
    pub dimension: u32,
}

impl ArcCurve {
    /// Create an arc whose domain equals its angle interval.
    pub fn new(plane: Plane, radius: f64, angle: Interval) -> Self {
        Self {
            plane,
            radius,
            angle,
            domain: angle,
            dimension: 3,
        }
    }

    /// Full circle.
    pub fn circle(plane: Plane, radius: f64) -> Self {
        Self::new(plane, radius, Interval::new(0.0, TAU))
    }

    pub fn is_circle(&self) -> bool {
        (self.angle.length() - TAU).abs() <= f64::EPSILON * TAU
    }

    pub fn center(&self) -> DVec3 {
        self.plane.origin
    }

    pub fn is_valid(&self) -> bool {
        self.radius > 0.0
            && self.angle.is_increasing()
            && self.angle.length() <= TAU * (1.0 + f64::EPSILON)
            && self.domain.is_increasing()
            && self.plane.normal().length_squared() > 0.0
    }

    /// Box around the full circle the arc lies on.
    pub fn bounding_box(&self) -> BoundingBox {
        let n = self.plane.normal().normalize_or_zero();
        let extent = (DVec3::ONE - n * n).max(DVec3::ZERO);
        let half = DVec3::new(extent.x.sqrt(), extent.y.sqrt(), extent.z.sqrt()) * self.radius.abs();
        BoundingBox::new(self.center() - half, self.center() + half)
    }
}

impl Archivable for ArcCurve {
    const CLASS_ID: ClassId = ARC_CURVE_CLASS_ID;
    const CLASS_NAME: &'static str = "ArcCurve";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_point3(self.plane.origin)?;
        w.write_point3(self.plane.x_axis)?;
        w.write_point3(self.plane.y_axis)?;
        w.write_f64(self.radius)?;
        w.write_interval(self.angle)?;
        w.write_interval(self.domain)?;
        w.write_u32(self.dimension)
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let plane = Plane {
            origin: r.read_point3()?,
            x_axis: r.read_point3()?,
            y_axis: r.read_point3()?,
        };
        Ok(Self {
            plane,
            radius: r.read_f64()?,
            angle: r.read_interval()?,
            domain: r.read_interval()?,
            dimension: r.read_u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle() {
        let c = ArcCurve::circle(Plane::WORLD_XY, 2.0);
        assert!(c.is_circle());
        assert!(c.is_valid());
        let bbox = c.bounding_box();
        assert_eq!(bbox.min, DVec3::new(-2.0, -2.0, 0.0));
        assert_eq!(bbox.max, DVec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_invalid_arcs() {
        assert!(!ArcCurve::new(Plane::WORLD_XY, 0.0, Interval::new(0.0, 1.0)).is_valid());
        assert!(!ArcCurve::new(Plane::WORLD_XY, 1.0, Interval::new(1.0, 0.0)).is_valid());
        assert!(!ArcCurve::new(Plane::WORLD_XY, 1.0, Interval::new(0.0, 7.0)).is_valid());
    }
}
