//! Polyline curve.

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, POLYLINE_CURVE_CLASS_ID};
use crate::util::{BoundingBox, DVec3, Error, Interval, Result};

/// Piecewise linear curve with one parameter per point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolylineCurve {
    points: Vec<DVec3>,
    params: Vec<f64>,
}

impl PolylineCurve {
    /// Create a polyline with parameters `0, 1, ..., n-1`.
    pub fn new(points: Vec<DVec3>) -> Self {
        let params = (0..points.len()).map(|i| i as f64).collect();
        Self { points, params }
    }

    /// Create a polyline with explicit parameters.
    ///
    /// Returns None when the counts differ.
    pub fn with_params(points: Vec<DVec3>, params: Vec<f64>) -> Option<Self> {
        (points.len() == params.len()).then_some(Self { points, params })
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn point(&self, index: usize) -> Option<DVec3> {
        self.points.get(index).copied()
    }

    /// Append a point one parameter unit after the last.
    pub fn push(&mut self, point: DVec3) {
        let t = self.params.last().map_or(0.0, |t| t + 1.0);
        self.points.push(point);
        self.params.push(t);
    }

    pub fn domain(&self) -> Interval {
        match (self.params.first(), self.params.last()) {
            (Some(&t0), Some(&t1)) => Interval::new(t0, t1),
            _ => Interval::default(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2
            && self.params.len() == self.points.len()
            && self.params.windows(2).all(|t| t[0] < t[1])
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }
}

impl Archivable for PolylineCurve {
    const CLASS_ID: ClassId = POLYLINE_CURVE_CLASS_ID;
    const CLASS_NAME: &'static str = "PolylineCurve";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.points.len() * std::mem::size_of::<DVec3>()
            + self.params.len() * std::mem::size_of::<f64>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        w.write_point3_array(&self.points)?;
        w.write_f64_array(&self.params)
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let points = r.read_point3_array()?;
        let params = r.read_f64_array()?;
        if params.len() != points.len() {
            return Err(Error::invalid(format!(
                "PolylineCurve has {} points and {} parameters",
                points.len(),
                params.len()
            )));
        }
        Ok(Self { points, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let c = PolylineCurve::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y]);
        assert_eq!(c.params(), &[0.0, 1.0, 2.0]);
        assert_eq!(c.domain(), Interval::new(0.0, 2.0));
        assert!(c.is_valid());
    }

    #[test]
    fn test_push_extends_domain() {
        let mut c = PolylineCurve::default();
        assert!(!c.is_valid());
        c.push(DVec3::ZERO);
        c.push(DVec3::X);
        assert_eq!(c.domain(), Interval::new(0.0, 1.0));
        assert!(c.is_valid());
    }

    #[test]
    fn test_mismatched_params() {
        assert!(PolylineCurve::with_params(vec![DVec3::ZERO], vec![]).is_none());
        let c = PolylineCurve::with_params(vec![DVec3::ZERO, DVec3::X], vec![1.0, 1.0]).unwrap();
        assert!(!c.is_valid());
    }
}
