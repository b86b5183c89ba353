//! # rhino3dm
//!
//! Versioned binary archives for 3dm geometry objects and typed wrappers
//! around decoded objects.
//!
//! An object is encoded into a chunked, class-tagged payload for a chosen
//! 3dm dialect and carried in a four-field envelope
//! (`version`, `archive3dm`, `opennurbs`, `data`). Decoding checks the
//! dialect, reads exactly one object, and hands it to a dispatch factory
//! that picks the most specific wrapper for its kind.
//!
//! ## Modules
//!
//! - [`util`] - Errors and small math types
//! - [`core`] - The object model and user strings
//! - [`geom`] - Geometry kinds (curves, meshes, breps, viewports, ...)
//! - [`archive`] - Chunked binary reader and writer, class framing
//! - [`codec`] - Encode / decode and the JSON envelope
//! - [`model`] - Layers and the shared component table
//! - [`binding`] - Typed wrappers and the dispatch factory
//!
//! ## Example
//!
//! ```
//! use rhino3dm::prelude::*;
//!
//! let mut line = Object::new(LineCurve::new(DVec3::ZERO, DVec3::X));
//! line.user_strings_mut().set("part", "A-7");
//!
//! let encoded = encode(Some(&mut line), &EncodeOptions::default()).unwrap();
//! let wrapper = decode_wrapper(&encoded).unwrap();
//! assert_eq!(wrapper.type_name(), "LineCurve");
//! ```

pub mod util;
pub mod core;
pub mod geom;
pub mod archive;
pub mod codec;
pub mod model;
pub mod binding;

// Python bindings (optional, enabled with "python" feature)
#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use util::{Error, Result};
pub use codec::{decode, decode_wrapper, encode, EncodeOptions, EncodedObject};
pub use binding::{create_wrapper, Wrapper};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{BoundingBox, DVec3, DVec4, Error, Interval, Result};
    pub use crate::core::{Geometry, Object, ObjectData, ObjectType, UserStrings};
    pub use crate::geom::*;
    pub use crate::model::{ComponentTable, Layer};
    pub use crate::codec::{decode, decode_wrapper, encode, EncodeOptions, EncodedObject};
    pub use crate::binding::{
        create_wrapper, CommonObject, CurveBase, GeometryBase, ObjectHandle, Wrapper, WrapperKind,
    };
}
