//! Geometry kinds.
//!
//! This module provides the data of every geometry kind:
//! - [`Curve`] - Any curve: [`NurbsCurve`], [`LineCurve`], [`PolylineCurve`],
//!   [`PolyCurve`] or [`ArcCurve`]
//! - [`Mesh`] - Triangle and quad meshes
//! - [`Brep`] - Boundary representation topology
//! - [`Viewport`] - Camera
//! - [`Point`] - Single point
//! - [`TextDot`] - Text label at a point
//!
//! Each kind implements [`Archivable`](crate::archive::Archivable). Nothing
//! here evaluates curves or surfaces.

mod curve;
mod nurbs_curve;
mod line_curve;
mod polyline_curve;
mod poly_curve;
mod arc_curve;
mod mesh;
mod brep;
mod viewport;
mod point;
mod text_dot;

pub use curve::Curve;
pub use nurbs_curve::{knot_count, NurbsCurve};
pub use line_curve::LineCurve;
pub use polyline_curve::PolylineCurve;
pub use poly_curve::PolyCurve;
pub use arc_curve::ArcCurve;
pub use mesh::{Mesh, MeshFace};
pub use brep::{Brep, BrepEdge, BrepFace, BrepLoopEdge};
pub use viewport::{Frustum, Viewport};
pub use point::Point;
pub use text_dot::{TextDot, DEFAULT_FONT_HEIGHT, TEXT_DOT_SECONDARY_TEXT_VERSION};
