//! Typed wrappers and the dispatch factory.
//!
//! This module provides:
//! - [`ObjectHandle`] - Owned or table-borrowed access to an object
//! - [`CommonObject`] / [`GeometryBase`] / [`CurveBase`] - Wrapper capabilities
//! - Typed wrappers such as [`MeshWrapper`] and [`NurbsCurveWrapper`]
//! - [`create_wrapper`] - Builds the most specific wrapper for an object

mod handle;
mod traits;
mod wrappers;
mod factory;

pub use handle::ObjectHandle;
pub use traits::{CommonObject, CurveBase, GeometryBase};
pub use wrappers::*;
pub use factory::{classify, create_wrapper, Wrapper, WrapperKind};
