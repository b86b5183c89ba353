//! The curve kinds.

use crate::archive::Archivable;
use crate::util::{BoundingBox, Interval};

use super::{ArcCurve, LineCurve, NurbsCurve, PolyCurve, PolylineCurve};

/// Any curve.
#[derive(Clone, Debug, PartialEq)]
pub enum Curve {
    Nurbs(NurbsCurve),
    Line(LineCurve),
    Polyline(PolylineCurve),
    Poly(PolyCurve),
    Arc(ArcCurve),
}

impl Curve {
    /// Parameter domain.
    pub fn domain(&self) -> Interval {
        match self {
            Self::Nurbs(c) => c.domain(),
            Self::Line(c) => c.domain,
            Self::Polyline(c) => c.domain(),
            Self::Poly(c) => c.domain(),
            Self::Arc(c) => c.domain,
        }
    }

    /// Number of coordinates the curve is defined in (2 or 3).
    pub fn dimension(&self) -> u32 {
        match self {
            Self::Nurbs(c) => c.dimension(),
            Self::Line(c) => c.dimension,
            Self::Polyline(_) => 3,
            Self::Poly(c) => c.dimension(),
            Self::Arc(c) => c.dimension,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::Nurbs(c) => c.is_valid(),
            Self::Line(c) => c.is_valid(),
            Self::Polyline(c) => c.is_valid(),
            Self::Poly(c) => c.is_valid(),
            Self::Arc(c) => c.is_valid(),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Self::Nurbs(c) => c.bounding_box(),
            Self::Line(c) => c.bounding_box(),
            Self::Polyline(c) => c.bounding_box(),
            Self::Poly(c) => c.bounding_box(),
            Self::Arc(c) => c.bounding_box(),
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Nurbs(_) => NurbsCurve::CLASS_NAME,
            Self::Line(_) => LineCurve::CLASS_NAME,
            Self::Polyline(_) => PolylineCurve::CLASS_NAME,
            Self::Poly(_) => PolyCurve::CLASS_NAME,
            Self::Arc(_) => ArcCurve::CLASS_NAME,
        }
    }

    pub fn size_of(&self) -> usize {
        match self {
            Self::Nurbs(c) => c.size_of(),
            Self::Line(c) => c.size_of(),
            Self::Polyline(c) => c.size_of(),
            Self::Poly(c) => c.size_of(),
            Self::Arc(c) => c.size_of(),
        }
    }
}

macro_rules! curve_from {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Curve {
                fn from(value: $ty) -> Self {
                    Curve::$variant(value)
                }
            }
        )*
    };
}

curve_from! {
    NurbsCurve => Nurbs,
    LineCurve => Line,
    PolylineCurve => Polyline,
    PolyCurve => Poly,
    ArcCurve => Arc,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{DVec3, Plane};

    #[test]
    fn test_domain_and_dimension_delegate() {
        let line: Curve = LineCurve::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 4.0)).into();
        assert_eq!(line.domain(), Interval::new(0.0, 4.0));
        assert_eq!(line.dimension(), 3);
        assert_eq!(line.class_name(), "LineCurve");

        let arc: Curve = ArcCurve::new(Plane::WORLD_XY, 1.0, Interval::new(0.0, 1.5)).into();
        assert_eq!(arc.domain(), Interval::new(0.0, 1.5));

        let nurbs: Curve = NurbsCurve::new(2, false, 2, 2).into();
        assert_eq!(nurbs.dimension(), 2);
    }
}
