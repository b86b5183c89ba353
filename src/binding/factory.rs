//! Type dispatch factory.
//!
//! [`create_wrapper`] inspects an object and returns the most specific
//! wrapper for its kind:
//!
//! | Object kind                   | Wrapper                  |
//! |-------------------------------|--------------------------|
//! | Layer                         | [`LayerWrapper`]         |
//! | unknown class                 | [`CommonObjectWrapper`]  |
//! | Mesh                          | [`MeshWrapper`]          |
//! | Brep                          | [`BrepWrapper`]          |
//! | NurbsCurve                    | [`NurbsCurveWrapper`]    |
//! | LineCurve                     | [`LineCurveWrapper`]     |
//! | PolylineCurve                 | [`PolylineCurveWrapper`] |
//! | PolyCurve                     | [`PolyCurveWrapper`]     |
//! | ArcCurve                      | [`ArcCurveWrapper`]      |
//! | Point                         | [`PointWrapper`]         |
//! | Viewport                      | [`ViewportWrapper`]      |
//! | other geometry (TextDot)      | [`GeometryWrapper`]      |
//!
//! The curve kinds form a closed set, so every curve has a specific
//! wrapper; [`CurveBase`] is the surface they share.

use crate::core::{Geometry, Object, ObjectData};
use crate::geom::Curve;

use super::wrappers::*;
use super::{CommonObject, CurveBase, GeometryBase, ObjectHandle};

/// Wrapper kinds, most specific first within each family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    Common,
    Geometry,
    NurbsCurve,
    LineCurve,
    PolylineCurve,
    PolyCurve,
    ArcCurve,
    Mesh,
    Brep,
    Viewport,
    Point,
    Layer,
}

impl WrapperKind {
    /// Public type name of the wrapper.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Common => "CommonObject",
            Self::Geometry => "GeometryBase",
            Self::NurbsCurve => "NurbsCurve",
            Self::LineCurve => "LineCurve",
            Self::PolylineCurve => "PolylineCurve",
            Self::PolyCurve => "PolyCurve",
            Self::ArcCurve => "ArcCurve",
            Self::Mesh => "Mesh",
            Self::Brep => "Brep",
            Self::Viewport => "ViewportInfo",
            Self::Point => "Point",
            Self::Layer => "Layer",
        }
    }

    pub fn is_geometry(&self) -> bool {
        !matches!(self, Self::Common | Self::Layer)
    }

    pub fn is_curve(&self) -> bool {
        matches!(
            self,
            Self::NurbsCurve
                | Self::LineCurve
                | Self::PolylineCurve
                | Self::PolyCurve
                | Self::ArcCurve
        )
    }
}

/// Kind of wrapper an object gets.
pub fn classify(object: &Object) -> WrapperKind {
    match object.data() {
        ObjectData::Layer(_) => WrapperKind::Layer,
        ObjectData::Unknown(_) => WrapperKind::Common,
        ObjectData::Geometry(g) => match g {
            Geometry::Mesh(_) => WrapperKind::Mesh,
            Geometry::Brep(_) => WrapperKind::Brep,
            Geometry::Curve(c) => match c {
                Curve::Nurbs(_) => WrapperKind::NurbsCurve,
                Curve::Line(_) => WrapperKind::LineCurve,
                Curve::Polyline(_) => WrapperKind::PolylineCurve,
                Curve::Poly(_) => WrapperKind::PolyCurve,
                Curve::Arc(_) => WrapperKind::ArcCurve,
            },
            Geometry::Point(_) => WrapperKind::Point,
            Geometry::Viewport(_) => WrapperKind::Viewport,
            Geometry::TextDot(_) => WrapperKind::Geometry,
        },
    }
}

/// A wrapper of any kind.
#[derive(Debug)]
pub enum Wrapper {
    Common(CommonObjectWrapper),
    Geometry(GeometryWrapper),
    NurbsCurve(NurbsCurveWrapper),
    LineCurve(LineCurveWrapper),
    PolylineCurve(PolylineCurveWrapper),
    PolyCurve(PolyCurveWrapper),
    ArcCurve(ArcCurveWrapper),
    Mesh(MeshWrapper),
    Brep(BrepWrapper),
    Viewport(ViewportWrapper),
    Point(PointWrapper),
    Layer(LayerWrapper),
}

macro_rules! each_wrapper {
    ($value:expr, $w:ident => $body:expr) => {
        match $value {
            Wrapper::Common($w) => $body,
            Wrapper::Geometry($w) => $body,
            Wrapper::NurbsCurve($w) => $body,
            Wrapper::LineCurve($w) => $body,
            Wrapper::PolylineCurve($w) => $body,
            Wrapper::PolyCurve($w) => $body,
            Wrapper::ArcCurve($w) => $body,
            Wrapper::Mesh($w) => $body,
            Wrapper::Brep($w) => $body,
            Wrapper::Viewport($w) => $body,
            Wrapper::Point($w) => $body,
            Wrapper::Layer($w) => $body,
        }
    };
}

macro_rules! typed_accessors {
    ($($fn:ident, $fn_mut:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            pub fn $fn(&self) -> Option<&$ty> {
                match self {
                    Wrapper::$variant(w) => Some(w),
                    _ => None,
                }
            }

            pub fn $fn_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Wrapper::$variant(w) => Some(w),
                    _ => None,
                }
            }
        )*
    };
}

impl Wrapper {
    fn from_kind(kind: WrapperKind, handle: ObjectHandle) -> Self {
        match kind {
            WrapperKind::Common => Self::Common(CommonObjectWrapper::from_handle(handle)),
            WrapperKind::Geometry => Self::Geometry(GeometryWrapper::from_handle(handle)),
            WrapperKind::NurbsCurve => Self::NurbsCurve(NurbsCurveWrapper::from_handle(handle)),
            WrapperKind::LineCurve => Self::LineCurve(LineCurveWrapper::from_handle(handle)),
            WrapperKind::PolylineCurve => {
                Self::PolylineCurve(PolylineCurveWrapper::from_handle(handle))
            }
            WrapperKind::PolyCurve => Self::PolyCurve(PolyCurveWrapper::from_handle(handle)),
            WrapperKind::ArcCurve => Self::ArcCurve(ArcCurveWrapper::from_handle(handle)),
            WrapperKind::Mesh => Self::Mesh(MeshWrapper::from_handle(handle)),
            WrapperKind::Brep => Self::Brep(BrepWrapper::from_handle(handle)),
            WrapperKind::Viewport => Self::Viewport(ViewportWrapper::from_handle(handle)),
            WrapperKind::Point => Self::Point(PointWrapper::from_handle(handle)),
            WrapperKind::Layer => Self::Layer(LayerWrapper::from_handle(handle)),
        }
    }

    pub fn kind(&self) -> WrapperKind {
        match self {
            Self::Common(_) => WrapperKind::Common,
            Self::Geometry(_) => WrapperKind::Geometry,
            Self::NurbsCurve(_) => WrapperKind::NurbsCurve,
            Self::LineCurve(_) => WrapperKind::LineCurve,
            Self::PolylineCurve(_) => WrapperKind::PolylineCurve,
            Self::PolyCurve(_) => WrapperKind::PolyCurve,
            Self::ArcCurve(_) => WrapperKind::ArcCurve,
            Self::Mesh(_) => WrapperKind::Mesh,
            Self::Brep(_) => WrapperKind::Brep,
            Self::Viewport(_) => WrapperKind::Viewport,
            Self::Point(_) => WrapperKind::Point,
            Self::Layer(_) => WrapperKind::Layer,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn as_common(&self) -> &dyn CommonObject {
        each_wrapper!(self, w => w)
    }

    pub fn as_common_mut(&mut self) -> &mut dyn CommonObject {
        each_wrapper!(self, w => w)
    }

    /// Geometry view; None for layers and unknown classes.
    pub fn as_geometry(&self) -> Option<&dyn GeometryBase> {
        match self {
            Self::Common(_) | Self::Layer(_) => None,
            Self::Geometry(w) => Some(w),
            Self::NurbsCurve(w) => Some(w),
            Self::LineCurve(w) => Some(w),
            Self::PolylineCurve(w) => Some(w),
            Self::PolyCurve(w) => Some(w),
            Self::ArcCurve(w) => Some(w),
            Self::Mesh(w) => Some(w),
            Self::Brep(w) => Some(w),
            Self::Viewport(w) => Some(w),
            Self::Point(w) => Some(w),
        }
    }

    /// Curve view; None for anything that is not a curve.
    pub fn as_curve(&self) -> Option<&dyn CurveBase> {
        match self {
            Self::NurbsCurve(w) => Some(w),
            Self::LineCurve(w) => Some(w),
            Self::PolylineCurve(w) => Some(w),
            Self::PolyCurve(w) => Some(w),
            Self::ArcCurve(w) => Some(w),
            _ => None,
        }
    }

    typed_accessors! {
        as_nurbs_curve, as_nurbs_curve_mut => NurbsCurve(NurbsCurveWrapper),
        as_line_curve, as_line_curve_mut => LineCurve(LineCurveWrapper),
        as_polyline_curve, as_polyline_curve_mut => PolylineCurve(PolylineCurveWrapper),
        as_poly_curve, as_poly_curve_mut => PolyCurve(PolyCurveWrapper),
        as_arc_curve, as_arc_curve_mut => ArcCurve(ArcCurveWrapper),
        as_mesh, as_mesh_mut => Mesh(MeshWrapper),
        as_brep, as_brep_mut => Brep(BrepWrapper),
        as_viewport, as_viewport_mut => Viewport(ViewportWrapper),
        as_point, as_point_mut => Point(PointWrapper),
        as_layer, as_layer_mut => Layer(LayerWrapper),
    }

    pub fn handle(&self) -> &ObjectHandle {
        self.as_common().handle()
    }

    pub fn into_handle(self) -> ObjectHandle {
        each_wrapper!(self, w => w.into_handle())
    }
}

/// Build the most specific wrapper for an object.
///
/// Returns None for a missing handle and for a borrowed handle whose
/// table entry is gone.
pub fn create_wrapper(handle: Option<ObjectHandle>) -> Option<Wrapper> {
    let handle = handle?;
    let kind = match handle.with(classify) {
        Ok(kind) => kind,
        Err(e) => {
            tracing::debug!("cannot wrap object: {}", e);
            return None;
        }
    };
    Some(Wrapper::from_kind(kind, handle))
}

impl From<Object> for Wrapper {
    /// Wrap an owned object. Every object has a wrapper kind.
    fn from(object: Object) -> Self {
        let kind = classify(&object);
        Self::from_kind(kind, ObjectHandle::Owned(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ClassId;
    use crate::core::UnknownObject;
    use crate::geom::{
        ArcCurve, Brep, LineCurve, Mesh, NurbsCurve, Point, PolyCurve, PolylineCurve, TextDot,
        Viewport,
    };
    use crate::model::Layer;
    use crate::util::{DVec3, Plane};

    fn every_kind() -> Vec<(Object, WrapperKind)> {
        vec![
            (Object::new(Layer::new("L")), WrapperKind::Layer),
            (
                Object::new(UnknownObject {
                    class_id: ClassId(9),
                    data: vec![],
                }),
                WrapperKind::Common,
            ),
            (Object::new(Mesh::new()), WrapperKind::Mesh),
            (Object::new(Brep::new()), WrapperKind::Brep),
            (Object::new(NurbsCurve::new(3, false, 2, 2)), WrapperKind::NurbsCurve),
            (Object::new(LineCurve::new(DVec3::ZERO, DVec3::X)), WrapperKind::LineCurve),
            (Object::new(PolylineCurve::new(vec![])), WrapperKind::PolylineCurve),
            (Object::new(PolyCurve::new()), WrapperKind::PolyCurve),
            (Object::new(ArcCurve::circle(Plane::WORLD_XY, 1.0)), WrapperKind::ArcCurve),
            (Object::new(Point::new(DVec3::ZERO)), WrapperKind::Point),
            (Object::new(Viewport::new()), WrapperKind::Viewport),
            (Object::new(TextDot::new(DVec3::ZERO, "t")), WrapperKind::Geometry),
        ]
    }

    #[test]
    fn test_dispatch_is_total_and_specific() {
        for (obj, expected) in every_kind() {
            let w = create_wrapper(Some(ObjectHandle::Owned(obj))).unwrap();
            assert_eq!(w.kind(), expected);
            assert_eq!(w.as_geometry().is_some(), expected.is_geometry());
            assert_eq!(w.as_curve().is_some(), expected.is_curve());
            assert!(w.as_common().is_owned());
        }
    }

    #[test]
    fn test_none_in_none_out() {
        assert!(create_wrapper(None).is_none());
    }

    #[test]
    fn test_typed_accessors() {
        let mut w = Wrapper::from(Object::new(Point::new(DVec3::X)));
        assert_eq!(w.type_name(), "Point");
        assert!(w.as_mesh().is_none());
        w.as_point_mut().unwrap().set_location(DVec3::Y).unwrap();
        assert_eq!(w.as_point().unwrap().location().unwrap(), DVec3::Y);

        let obj = w.into_handle().into_object().unwrap();
        assert_eq!(obj.as_point().unwrap().location, DVec3::Y);
    }
}
