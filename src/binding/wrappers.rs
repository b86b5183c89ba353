//! Typed wrappers.
//!
//! A wrapper is a handle plus the operations of its kind. Constructors
//! create owned objects; the dispatch factory builds wrappers for decoded
//! or borrowed objects.

use crate::core::{Geometry, Object};
use crate::geom::{
    ArcCurve, Brep, Curve, LineCurve, Mesh, NurbsCurve, Point, PolyCurve, PolylineCurve, Viewport,
};
use crate::model::Layer;
use crate::util::{DVec3, DVec4, Interval, Line, Plane, Result};

use super::traits::sealed::HandleMut;
use super::{CommonObject, CurveBase, GeometryBase, ObjectHandle};

macro_rules! wrapper {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            handle: ObjectHandle,
        }

        impl $name {
            /// Wrap a handle. The dispatch factory guarantees the kind.
            pub(crate) fn from_handle(handle: ObjectHandle) -> Self {
                Self { handle }
            }

            pub fn into_handle(self) -> ObjectHandle {
                self.handle
            }
        }

        impl HandleMut for $name {
            fn handle_mut(&mut self) -> &mut ObjectHandle {
                &mut self.handle
            }
        }

        impl CommonObject for $name {
            fn handle(&self) -> &ObjectHandle {
                &self.handle
            }
        }
    };
}

wrapper!(
    /// Any object, including classes this library does not know.
    CommonObjectWrapper
);
wrapper!(
    /// Geometry without a more specific wrapper.
    GeometryWrapper
);
wrapper!(NurbsCurveWrapper);
wrapper!(LineCurveWrapper);
wrapper!(PolylineCurveWrapper);
wrapper!(PolyCurveWrapper);
wrapper!(ArcCurveWrapper);
wrapper!(MeshWrapper);
wrapper!(BrepWrapper);
wrapper!(ViewportWrapper);
wrapper!(PointWrapper);
wrapper!(LayerWrapper);

impl GeometryBase for GeometryWrapper {}
impl GeometryBase for NurbsCurveWrapper {}
impl GeometryBase for LineCurveWrapper {}
impl GeometryBase for PolylineCurveWrapper {}
impl GeometryBase for PolyCurveWrapper {}
impl GeometryBase for ArcCurveWrapper {}
impl GeometryBase for MeshWrapper {}
impl GeometryBase for BrepWrapper {}
impl GeometryBase for ViewportWrapper {}
impl GeometryBase for PointWrapper {}

impl CurveBase for NurbsCurveWrapper {}
impl CurveBase for LineCurveWrapper {}
impl CurveBase for PolylineCurveWrapper {}
impl CurveBase for PolyCurveWrapper {}
impl CurveBase for ArcCurveWrapper {}

impl CommonObjectWrapper {
    pub fn new(object: Object) -> Self {
        Self::from_handle(ObjectHandle::Owned(object))
    }
}

impl GeometryWrapper {
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(geometry.into())))
    }
}

impl NurbsCurveWrapper {
    /// Curve with zeroed control vertices and knots.
    pub fn new(dimension: u32, is_rational: bool, order: u32, cv_count: u32) -> Self {
        Self::from_curve(NurbsCurve::new(dimension, is_rational, order, cv_count))
    }

    pub fn from_curve(curve: NurbsCurve) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(curve)))
    }

    pub fn order(&self) -> Result<u32> {
        self.handle.view(Object::as_nurbs_curve, NurbsCurve::order)
    }

    pub fn cv_count(&self) -> Result<u32> {
        self.handle.view(Object::as_nurbs_curve, NurbsCurve::cv_count)
    }

    pub fn is_rational(&self) -> Result<bool> {
        self.handle.view(Object::as_nurbs_curve, NurbsCurve::is_rational)
    }

    pub fn knots(&self) -> Result<Vec<f64>> {
        self.handle.view(Object::as_nurbs_curve, |c| c.knots().to_vec())
    }

    pub fn cv(&self, index: usize) -> Result<Option<DVec4>> {
        self.handle.view(Object::as_nurbs_curve, |c| c.cv(index))
    }

    pub fn set_cv(&mut self, index: usize, cv: DVec4) -> Result<bool> {
        self.handle
            .view_mut(Object::as_nurbs_curve_mut, |c| c.set_cv(index, cv))
    }

    pub fn set_knot(&mut self, index: usize, value: f64) -> Result<bool> {
        self.handle
            .view_mut(Object::as_nurbs_curve_mut, |c| c.set_knot(index, value))
    }
}

impl LineCurveWrapper {
    pub fn new(from: DVec3, to: DVec3) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(LineCurve::new(from, to))))
    }

    pub fn line(&self) -> Result<Line> {
        self.handle.view(Object::as_line_curve, |c| c.line)
    }

    pub fn set_line(&mut self, line: Line) -> Result<()> {
        self.handle
            .view_mut(Object::as_line_curve_mut, |c| c.line = line)
    }
}

impl PolylineCurveWrapper {
    pub fn new(points: Vec<DVec3>) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(PolylineCurve::new(points))))
    }

    pub fn point_count(&self) -> Result<usize> {
        self.handle
            .view(Object::as_polyline_curve, PolylineCurve::point_count)
    }

    pub fn point(&self, index: usize) -> Result<Option<DVec3>> {
        self.handle.view(Object::as_polyline_curve, |c| c.point(index))
    }
}

impl PolyCurveWrapper {
    pub fn new() -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(PolyCurve::new())))
    }

    pub fn segment_count(&self) -> Result<usize> {
        self.handle.view(Object::as_poly_curve, PolyCurve::segment_count)
    }

    pub fn append(&mut self, segment: impl Into<Curve>) -> Result<()> {
        let segment = segment.into();
        self.handle
            .view_mut(Object::as_poly_curve_mut, |c| c.append(segment))
    }
}

impl Default for PolyCurveWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcCurveWrapper {
    pub fn new(plane: Plane, radius: f64, angle: Interval) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(ArcCurve::new(plane, radius, angle))))
    }

    pub fn radius(&self) -> Result<f64> {
        self.handle.view(Object::as_arc_curve, |a| a.radius)
    }

    /// Sweep in radians.
    pub fn angle(&self) -> Result<Interval> {
        self.handle.view(Object::as_arc_curve, |a| a.angle)
    }

    pub fn plane(&self) -> Result<Plane> {
        self.handle.view(Object::as_arc_curve, |a| a.plane)
    }

    pub fn is_circle(&self) -> Result<bool> {
        self.handle.view(Object::as_arc_curve, ArcCurve::is_circle)
    }

    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        self.handle
            .view_mut(Object::as_arc_curve_mut, |a| a.radius = radius)
    }
}

impl MeshWrapper {
    pub fn new() -> Self {
        Self::from_mesh(Mesh::new())
    }

    pub fn from_mesh(mesh: Mesh) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(mesh)))
    }

    pub fn vertex_count(&self) -> Result<usize> {
        self.handle.view(Object::as_mesh, Mesh::vertex_count)
    }

    pub fn face_count(&self) -> Result<usize> {
        self.handle.view(Object::as_mesh, Mesh::face_count)
    }

    pub fn add_vertex(&mut self, p: DVec3) -> Result<usize> {
        self.handle.view_mut(Object::as_mesh_mut, |m| m.add_vertex(p))
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) -> Result<Option<usize>> {
        self.handle
            .view_mut(Object::as_mesh_mut, |m| m.add_triangle(a, b, c))
    }

    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) -> Result<Option<usize>> {
        self.handle
            .view_mut(Object::as_mesh_mut, |m| m.add_quad(a, b, c, d))
    }
}

impl Default for MeshWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl BrepWrapper {
    pub fn from_brep(brep: Brep) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(brep)))
    }

    pub fn face_count(&self) -> Result<usize> {
        self.handle.view(Object::as_brep, |b| b.faces().len())
    }

    pub fn edge_count(&self) -> Result<usize> {
        self.handle.view(Object::as_brep, |b| b.edges().len())
    }
}

impl ViewportWrapper {
    pub fn new() -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(Viewport::new())))
    }

    pub fn is_perspective_projection(&self) -> Result<bool> {
        self.handle
            .view(Object::as_viewport, Viewport::is_perspective_projection)
    }

    pub fn camera_location(&self) -> Result<DVec3> {
        self.handle.view(Object::as_viewport, Viewport::camera_location)
    }

    pub fn set_camera_location(&mut self, p: DVec3) -> Result<()> {
        self.handle
            .view_mut(Object::as_viewport_mut, |v| v.set_camera_location(p))
    }
}

impl Default for ViewportWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl PointWrapper {
    pub fn new(location: DVec3) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(Point::new(location))))
    }

    pub fn location(&self) -> Result<DVec3> {
        self.handle.view(Object::as_point, |p| p.location)
    }

    pub fn set_location(&mut self, location: DVec3) -> Result<()> {
        self.handle
            .view_mut(Object::as_point_mut, |p| p.location = location)
    }
}

impl LayerWrapper {
    pub fn new(name: &str) -> Self {
        Self::from_handle(ObjectHandle::Owned(Object::new(Layer::new(name))))
    }

    pub fn name(&self) -> Result<String> {
        self.handle.view(Object::as_layer, |l| l.name.clone())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.handle
            .view_mut(Object::as_layer_mut, |l| l.name = name.to_string())
    }

    pub fn is_visible(&self) -> Result<bool> {
        self.handle.view(Object::as_layer, |l| l.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{Error, Interval};

    #[test]
    fn test_constructors_own_their_objects() {
        let w = NurbsCurveWrapper::new(3, false, 4, 4);
        assert!(w.is_owned());
        assert_eq!(w.order().unwrap(), 4);
        assert_eq!(w.knots().unwrap().len(), 6);
        assert_eq!(w.dimension().unwrap(), 3);
    }

    #[test]
    fn test_curve_base_through_line() {
        let w = LineCurveWrapper::new(DVec3::ZERO, DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(w.domain().unwrap(), Interval::new(0.0, 2.0));
        assert!(w.is_valid().unwrap());
        assert_eq!(w.bounding_box().unwrap().max, DVec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_user_strings() {
        let mut w = PointWrapper::new(DVec3::ZERO);
        assert!(w.set_user_string("a", "1").unwrap());
        assert!(!w.set_user_string("a", "2").unwrap());
        assert_eq!(w.get_user_string("a").unwrap().as_deref(), Some("2"));
        assert_eq!(w.get_user_string("b").unwrap(), None);
        assert_eq!(w.user_string_count().unwrap(), 1);
        assert_eq!(w.user_strings().unwrap(), vec![("a".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_mutation() {
        let mut m = MeshWrapper::new();
        for p in [DVec3::ZERO, DVec3::X, DVec3::Y] {
            m.add_vertex(p).unwrap();
        }
        assert_eq!(m.add_triangle(0, 1, 2).unwrap(), Some(0));
        assert_eq!(m.add_triangle(0, 1, 5).unwrap(), None);
        assert_eq!(m.face_count().unwrap(), 1);

        let mut pc = PolyCurveWrapper::new();
        pc.append(LineCurve::new(DVec3::ZERO, DVec3::X)).unwrap();
        assert_eq!(pc.segment_count().unwrap(), 1);
        assert_eq!(pc.domain().unwrap(), Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_arc_accessors() {
        let mut w = ArcCurveWrapper::new(Plane::WORLD_XY, 2.0, Interval::new(0.0, 1.5));
        assert_eq!(w.radius().unwrap(), 2.0);
        assert_eq!(w.angle().unwrap(), Interval::new(0.0, 1.5));
        assert_eq!(w.plane().unwrap(), Plane::WORLD_XY);
        assert!(!w.is_circle().unwrap());
        w.set_radius(3.0).unwrap();
        assert_eq!(w.radius().unwrap(), 3.0);
        assert_eq!(w.domain().unwrap(), Interval::new(0.0, 1.5));
    }

    #[test]
    fn test_wrong_kind_handle_reports_mismatch() {
        let w = MeshWrapper::from_handle(ObjectHandle::Owned(Object::new(Point::new(DVec3::ZERO))));
        assert!(matches!(w.vertex_count(), Err(Error::TypeMismatch { .. })));
    }
}
