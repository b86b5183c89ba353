//! NURBS curve data.
//!
//! Knot vectors follow the compact convention: a curve of `order` with
//! `cv_count` control vertices has `order + cv_count - 2` knots, and its
//! domain runs from `knots[order - 2]` to `knots[cv_count - 1]`.

use crate::archive::{Archivable, BufferReader, BufferWriter, ClassId, NURBS_CURVE_CLASS_ID};
use crate::util::{BoundingBox, DVec3, DVec4, Error, Interval, Result};

/// Number of knots for an order and control vertex count.
#[inline]
pub fn knot_count(order: u32, cv_count: u32) -> usize {
    (order as usize + cv_count as usize).saturating_sub(2)
}

/// Non-uniform rational B-spline curve.
///
/// Control vertices are stored homogeneous: `(x*w, y*w, z*w, w)` for
/// rational curves, `(x, y, z, 1)` otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct NurbsCurve {
    dimension: u32,
    is_rational: bool,
    order: u32,
    cv_count: u32,
    cvs: Vec<DVec4>,
    knots: Vec<f64>,
}

impl NurbsCurve {
    /// Create a curve with zeroed control vertices and knots.
    pub fn new(dimension: u32, is_rational: bool, order: u32, cv_count: u32) -> Self {
        Self {
            dimension,
            is_rational,
            order,
            cv_count,
            cvs: vec![DVec4::W; cv_count as usize],
            knots: vec![0.0; knot_count(order, cv_count)],
        }
    }

    /// Create a non-rational clamped curve with uniform interior knots
    /// through the given control points.
    ///
    /// Returns None when there are fewer points than `order` or `order < 2`.
    pub fn create_clamped_uniform(dimension: u32, order: u32, points: &[DVec3]) -> Option<Self> {
        let cv_count = u32::try_from(points.len()).ok()?;
        if order < 2 || cv_count < order {
            return None;
        }
        let mut curve = Self::new(dimension, false, order, cv_count);
        for (cv, p) in curve.cvs.iter_mut().zip(points) {
            *cv = p.extend(1.0);
        }
        let last = (cv_count - order + 1) as i64;
        for (i, k) in curve.knots.iter_mut().enumerate() {
            *k = (i as i64 + 2 - order as i64).clamp(0, last) as f64;
        }
        Some(curve)
    }

    #[inline]
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    #[inline]
    pub fn is_rational(&self) -> bool {
        self.is_rational
    }

    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[inline]
    pub fn degree(&self) -> u32 {
        self.order.saturating_sub(1)
    }

    #[inline]
    pub fn cv_count(&self) -> u32 {
        self.cv_count
    }

    #[inline]
    pub fn knot_count(&self) -> usize {
        self.knots.len()
    }

    pub fn cvs(&self) -> &[DVec4] {
        &self.cvs
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Homogeneous control vertex.
    pub fn cv(&self, index: usize) -> Option<DVec4> {
        self.cvs.get(index).copied()
    }

    /// Euclidean location of a control vertex.
    pub fn cv_point(&self, index: usize) -> Option<DVec3> {
        let cv = self.cv(index)?;
        if self.is_rational && cv.w != 0.0 {
            Some(cv.truncate() / cv.w)
        } else {
            Some(cv.truncate())
        }
    }

    /// Set a homogeneous control vertex. Returns false when out of range.
    pub fn set_cv(&mut self, index: usize, cv: DVec4) -> bool {
        match self.cvs.get_mut(index) {
            Some(slot) => {
                *slot = cv;
                true
            }
            None => false,
        }
    }

    /// Set a control vertex from a Euclidean point and weight.
    pub fn set_cv_point(&mut self, index: usize, point: DVec3, weight: f64) -> bool {
        let cv = if self.is_rational {
            (point * weight).extend(weight)
        } else {
            point.extend(1.0)
        };
        self.set_cv(index, cv)
    }

    pub fn knot(&self, index: usize) -> Option<f64> {
        self.knots.get(index).copied()
    }

    /// Set a knot value. Returns false when out of range.
    pub fn set_knot(&mut self, index: usize, value: f64) -> bool {
        match self.knots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Parameter domain taken from the knot vector.
    pub fn domain(&self) -> Interval {
        let start = (self.order as usize).checked_sub(2).and_then(|i| self.knot(i));
        let end = (self.cv_count as usize).checked_sub(1).and_then(|i| self.knot(i));
        match (start, end) {
            (Some(t0), Some(t1)) => Interval::new(t0, t1),
            _ => Interval::default(),
        }
    }

    fn has_consistent_counts(&self) -> bool {
        self.cvs.len() == self.cv_count as usize
            && self.knots.len() == knot_count(self.order, self.cv_count)
    }

    pub fn is_valid(&self) -> bool {
        self.dimension >= 1
            && self.order >= 2
            && self.cv_count >= self.order
            && self.has_consistent_counts()
            && self.knots.windows(2).all(|k| k[0] <= k[1])
            && self.domain().is_increasing()
            && (!self.is_rational || self.cvs.iter().all(|cv| cv.w != 0.0))
    }

    /// Box around the control points. Contains the curve.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::EMPTY;
        for i in 0..self.cvs.len() {
            if let Some(p) = self.cv_point(i) {
                bbox.expand_by_point(p);
            }
        }
        bbox
    }
}

impl Archivable for NurbsCurve {
    const CLASS_ID: ClassId = NURBS_CURVE_CLASS_ID;
    const CLASS_NAME: &'static str = "NurbsCurve";

    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.cvs.len() * std::mem::size_of::<DVec4>()
            + self.knots.len() * std::mem::size_of::<f64>()
    }

    fn write_fields(&self, w: &mut BufferWriter) -> Result<()> {
        if self.order < 2 {
            return Err(Error::write_failed(format!(
                "NurbsCurve order {} is below 2",
                self.order
            )));
        }
        if !self.has_consistent_counts() {
            return Err(Error::write_failed(format!(
                "NurbsCurve has {} CVs and {} knots, expected {} and {}",
                self.cvs.len(),
                self.knots.len(),
                self.cv_count,
                knot_count(self.order, self.cv_count)
            )));
        }
        w.write_u32(self.dimension)?;
        w.write_bool(self.is_rational)?;
        w.write_u32(self.order)?;
        w.write_u32(self.cv_count)?;
        w.write_f64_array(&self.knots)?;
        for cv in &self.cvs {
            if self.is_rational {
                w.write_point4(*cv)?;
            } else {
                w.write_point3(cv.truncate())?;
            }
        }
        Ok(())
    }

    fn read_fields(r: &mut BufferReader<'_>, _minor: u8) -> Result<Self> {
        let dimension = r.read_u32()?;
        let is_rational = r.read_bool()?;
        let order = r.read_u32()?;
        let cv_count = r.read_u32()?;
        if order < 2 {
            return Err(Error::invalid(format!("NurbsCurve order {} is below 2", order)));
        }

        let knots = r.read_f64_array()?;
        if knots.len() != knot_count(order, cv_count) {
            return Err(Error::invalid(format!(
                "NurbsCurve of order {} with {} CVs has {} knots",
                order,
                cv_count,
                knots.len()
            )));
        }

        let stride: u64 = if is_rational { 32 } else { 24 };
        r.require(cv_count as u64 * stride)?;
        let mut cvs = Vec::with_capacity(cv_count as usize);
        for _ in 0..cv_count {
            let cv = if is_rational {
                r.read_point4()?
            } else {
                r.read_point3()?.extend(1.0)
            };
            cvs.push(cv);
        }

        Ok(Self {
            dimension,
            is_rational,
            order,
            cv_count,
            cvs,
            knots,
        })
    }
}
