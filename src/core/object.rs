//! The generic object: a closed tree of object kinds plus user strings.
//!
//! The kind tree mirrors a single-inheritance hierarchy:
//!
//! ```text
//! Object
//! ├── Geometry
//! │   ├── Mesh
//! │   ├── Brep
//! │   ├── Curve ── Nurbs | Line | Polyline | Poly | Arc
//! │   ├── Viewport
//! │   ├── Point
//! │   └── TextDot
//! ├── Layer
//! └── Unknown (class id not recognised, payload kept verbatim)
//! ```

use crate::archive::{Archivable, ClassId};
use crate::geom::{
    ArcCurve, Brep, Curve, LineCurve, Mesh, NurbsCurve, Point, PolyCurve, PolylineCurve, TextDot,
    Viewport,
};
use crate::model::Layer;
use crate::util::BoundingBox;

use super::UserStrings;

/// Object category, reported by wrappers and the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Unknown,
    Point,
    Curve,
    Brep,
    Mesh,
    TextDot,
    Viewport,
    Layer,
}

impl ObjectType {
    /// Stable lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Point => "point",
            Self::Curve => "curve",
            Self::Brep => "brep",
            Self::Mesh => "mesh",
            Self::TextDot => "textdot",
            Self::Viewport => "viewport",
            Self::Layer => "layer",
        }
    }
}

/// Payload of a class the reader does not know.
///
/// The class data body is kept byte for byte so the object can be written
/// again with the same dialect it was read with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownObject {
    pub class_id: ClassId,
    pub data: Vec<u8>,
}

/// Geometry kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Mesh(Mesh),
    Brep(Brep),
    Curve(Curve),
    Viewport(Viewport),
    Point(Point),
    TextDot(TextDot),
}

impl Geometry {
    /// Class name of the concrete kind.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Mesh(_) => Mesh::CLASS_NAME,
            Self::Brep(_) => Brep::CLASS_NAME,
            Self::Curve(c) => c.class_name(),
            Self::Viewport(_) => Viewport::CLASS_NAME,
            Self::Point(_) => Point::CLASS_NAME,
            Self::TextDot(_) => TextDot::CLASS_NAME,
        }
    }

    /// Bounding box of the stored points.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Self::Mesh(m) => m.bounding_box(),
            Self::Brep(b) => b.bounding_box(),
            Self::Curve(c) => c.bounding_box(),
            Self::Viewport(_) => BoundingBox::EMPTY,
            Self::Point(p) => BoundingBox::from_points([&p.location]),
            Self::TextDot(d) => BoundingBox::from_points([&d.center]),
        }
    }

    /// Structural validity of the stored data.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Mesh(m) => m.is_valid(),
            Self::Brep(b) => b.is_valid(),
            Self::Curve(c) => c.is_valid(),
            Self::Viewport(v) => v.is_valid(),
            Self::Point(p) => p.location.is_finite(),
            Self::TextDot(d) => d.is_valid(),
        }
    }

    fn size_of(&self) -> usize {
        match self {
            Self::Mesh(m) => m.size_of(),
            Self::Brep(b) => b.size_of(),
            Self::Curve(c) => c.size_of(),
            Self::Viewport(v) => v.size_of(),
            Self::Point(p) => p.size_of(),
            Self::TextDot(d) => d.size_of(),
        }
    }

    fn object_type(&self) -> ObjectType {
        match self {
            Self::Mesh(_) => ObjectType::Mesh,
            Self::Brep(_) => ObjectType::Brep,
            Self::Curve(_) => ObjectType::Curve,
            Self::Viewport(_) => ObjectType::Viewport,
            Self::Point(_) => ObjectType::Point,
            Self::TextDot(_) => ObjectType::TextDot,
        }
    }
}

/// Object data: geometry, model components, or an unknown class.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectData {
    Geometry(Geometry),
    Layer(Layer),
    Unknown(UnknownObject),
}

/// A dynamically typed object with attached user strings.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    data: ObjectData,
    user_strings: UserStrings,
}

impl Object {
    /// Create an object without user strings.
    pub fn new(data: impl Into<ObjectData>) -> Self {
        Self {
            data: data.into(),
            user_strings: UserStrings::new(),
        }
    }

    /// Create an object with user strings.
    pub fn with_user_strings(data: impl Into<ObjectData>, user_strings: UserStrings) -> Self {
        Self {
            data: data.into(),
            user_strings,
        }
    }

    pub fn data(&self) -> &ObjectData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ObjectData {
        &mut self.data
    }

    pub fn into_data(self) -> ObjectData {
        self.data
    }

    pub fn user_strings(&self) -> &UserStrings {
        &self.user_strings
    }

    pub fn user_strings_mut(&mut self) -> &mut UserStrings {
        &mut self.user_strings
    }

    /// Move the user strings out, leaving none attached.
    pub(crate) fn take_user_strings(&mut self) -> UserStrings {
        std::mem::take(&mut self.user_strings)
    }

    /// Attach user strings moved out by [`take_user_strings`](Self::take_user_strings).
    pub(crate) fn restore_user_strings(&mut self, strings: UserStrings) {
        self.user_strings = strings;
    }

    /// Category of this object.
    pub fn object_type(&self) -> ObjectType {
        match &self.data {
            ObjectData::Geometry(g) => g.object_type(),
            ObjectData::Layer(_) => ObjectType::Layer,
            ObjectData::Unknown(_) => ObjectType::Unknown,
        }
    }

    /// Class name of the concrete kind.
    pub fn class_name(&self) -> &'static str {
        match &self.data {
            ObjectData::Geometry(g) => g.class_name(),
            ObjectData::Layer(_) => Layer::CLASS_NAME,
            ObjectData::Unknown(_) => "Unknown",
        }
    }

    /// Self-reported size estimate in bytes.
    ///
    /// Used to pre-size write buffers; not a bound on the encoded length.
    pub fn size_of(&self) -> usize {
        let data = match &self.data {
            ObjectData::Geometry(g) => g.size_of(),
            ObjectData::Layer(l) => l.size_of(),
            ObjectData::Unknown(u) => std::mem::size_of::<UnknownObject>() + u.data.len(),
        };
        data + self.user_strings.size_of()
    }

    // ------------------------------------------------------------------
    // Type tests
    // ------------------------------------------------------------------

    pub fn is_geometry(&self) -> bool {
        matches!(self.data, ObjectData::Geometry(_))
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match &self.data {
            ObjectData::Geometry(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.data {
            ObjectData::Geometry(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self.as_geometry()? {
            Geometry::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self.as_geometry_mut()? {
            Geometry::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_brep(&self) -> Option<&Brep> {
        match self.as_geometry()? {
            Geometry::Brep(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_brep_mut(&mut self) -> Option<&mut Brep> {
        match self.as_geometry_mut()? {
            Geometry::Brep(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&Curve> {
        match self.as_geometry()? {
            Geometry::Curve(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_curve_mut(&mut self) -> Option<&mut Curve> {
        match self.as_geometry_mut()? {
            Geometry::Curve(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_nurbs_curve(&self) -> Option<&NurbsCurve> {
        match self.as_curve()? {
            Curve::Nurbs(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_nurbs_curve_mut(&mut self) -> Option<&mut NurbsCurve> {
        match self.as_curve_mut()? {
            Curve::Nurbs(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_line_curve(&self) -> Option<&LineCurve> {
        match self.as_curve()? {
            Curve::Line(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_line_curve_mut(&mut self) -> Option<&mut LineCurve> {
        match self.as_curve_mut()? {
            Curve::Line(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_polyline_curve(&self) -> Option<&PolylineCurve> {
        match self.as_curve()? {
            Curve::Polyline(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_polyline_curve_mut(&mut self) -> Option<&mut PolylineCurve> {
        match self.as_curve_mut()? {
            Curve::Polyline(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_poly_curve(&self) -> Option<&PolyCurve> {
        match self.as_curve()? {
            Curve::Poly(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_poly_curve_mut(&mut self) -> Option<&mut PolyCurve> {
        match self.as_curve_mut()? {
            Curve::Poly(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_arc_curve(&self) -> Option<&ArcCurve> {
        match self.as_curve()? {
            Curve::Arc(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_arc_curve_mut(&mut self) -> Option<&mut ArcCurve> {
        match self.as_curve_mut()? {
            Curve::Arc(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_viewport(&self) -> Option<&Viewport> {
        match self.as_geometry()? {
            Geometry::Viewport(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_viewport_mut(&mut self) -> Option<&mut Viewport> {
        match self.as_geometry_mut()? {
            Geometry::Viewport(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self.as_geometry()? {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut Point> {
        match self.as_geometry_mut()? {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_text_dot(&self) -> Option<&TextDot> {
        match self.as_geometry()? {
            Geometry::TextDot(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_layer(&self) -> Option<&Layer> {
        match &self.data {
            ObjectData::Layer(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_layer_mut(&mut self) -> Option<&mut Layer> {
        match &mut self.data {
            ObjectData::Layer(l) => Some(l),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------

macro_rules! geometry_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Geometry {
                fn from(value: $ty) -> Self {
                    Geometry::$variant(value)
                }
            }

            impl From<$ty> for ObjectData {
                fn from(value: $ty) -> Self {
                    ObjectData::Geometry(Geometry::$variant(value))
                }
            }
        )*
    };
}

geometry_from! {
    Mesh => Mesh,
    Brep => Brep,
    Curve => Curve,
    Viewport => Viewport,
    Point => Point,
    TextDot => TextDot,
}

macro_rules! curve_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ObjectData {
                fn from(value: $ty) -> Self {
                    ObjectData::Geometry(Geometry::Curve(Curve::from(value)))
                }
            }
        )*
    };
}

curve_from!(NurbsCurve, LineCurve, PolylineCurve, PolyCurve, ArcCurve);

impl From<Geometry> for ObjectData {
    fn from(value: Geometry) -> Self {
        ObjectData::Geometry(value)
    }
}

impl From<Layer> for ObjectData {
    fn from(value: Layer) -> Self {
        ObjectData::Layer(value)
    }
}

impl From<UnknownObject> for ObjectData {
    fn from(value: UnknownObject) -> Self {
        ObjectData::Unknown(value)
    }
}
