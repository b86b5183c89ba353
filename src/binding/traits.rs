//! Capabilities shared by wrappers.
//!
//! The traits mirror the wrapper hierarchy: every wrapper is a
//! [`CommonObject`], geometry wrappers add [`GeometryBase`], curve wrappers
//! add [`CurveBase`].

use crate::codec::{encode, EncodeOptions, EncodedObject};
use crate::core::{Geometry, Object, ObjectType};
use crate::geom::Curve;
use crate::util::{BoundingBox, Interval, Result};

use super::ObjectHandle;

pub(crate) mod sealed {
    use super::ObjectHandle;

    /// Mutable handle access. Only implemented and called inside the crate,
    /// so a wrapper's object keeps the kind it was dispatched with.
    pub trait HandleMut {
        fn handle_mut(&mut self) -> &mut ObjectHandle;
    }
}

/// Operations available on every wrapped object.
///
/// The trait is sealed: only the wrappers of this crate implement it.
pub trait CommonObject: sealed::HandleMut {
    fn handle(&self) -> &ObjectHandle;

    /// True when the wrapper owns its object.
    fn is_owned(&self) -> bool {
        self.handle().is_owned()
    }

    fn object_type(&self) -> Result<ObjectType> {
        self.handle().with(Object::object_type)
    }

    /// Encode with default options. None when the object cannot be
    /// encoded or is no longer reachable.
    fn encode(&mut self) -> Option<EncodedObject> {
        self.encode_with(&EncodeOptions::default())
    }

    fn encode_with(&mut self, options: &EncodeOptions) -> Option<EncodedObject> {
        self.handle_mut()
            .with_mut(|obj| encode(Some(obj), options))
            .ok()
            .flatten()
    }

    /// Set a user string. Returns true when the key is new.
    fn set_user_string(&mut self, key: &str, value: &str) -> Result<bool> {
        self.handle_mut()
            .with_mut(|obj| obj.user_strings_mut().set(key, value))
    }

    fn get_user_string(&self, key: &str) -> Result<Option<String>> {
        self.handle()
            .with(|obj| obj.user_strings().get(key).map(str::to_string))
    }

    fn user_string_count(&self) -> Result<usize> {
        self.handle().with(|obj| obj.user_strings().len())
    }

    /// All user strings in insertion order.
    fn user_strings(&self) -> Result<Vec<(String, String)>> {
        self.handle().with(|obj| {
            obj.user_strings()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
    }
}

/// Operations available on geometry.
pub trait GeometryBase: CommonObject {
    fn bounding_box(&self) -> Result<BoundingBox> {
        self.handle().view(Object::as_geometry, Geometry::bounding_box)
    }

    fn is_valid(&self) -> Result<bool> {
        self.handle().view(Object::as_geometry, Geometry::is_valid)
    }
}

/// Operations available on curves.
pub trait CurveBase: GeometryBase {
    fn domain(&self) -> Result<Interval> {
        self.handle().view(Object::as_curve, Curve::domain)
    }

    fn dimension(&self) -> Result<u32> {
        self.handle().view(Object::as_curve, Curve::dimension)
    }
}
