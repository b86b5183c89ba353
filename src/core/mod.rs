//! Core layer - the generic object model.
//!
//! This module provides:
//! - [`Object`] - A dynamically typed object with user strings
//! - [`ObjectData`] / [`Geometry`] - The closed tree of object kinds
//! - [`UserStrings`] - Key-value strings attached to objects
//! - [`UserDataHolder`] - Scoped detach/reattach of user strings

mod object;
mod user_strings;
mod holder;

pub use object::{Geometry, Object, ObjectData, ObjectType, UnknownObject};
pub use user_strings::UserStrings;
pub use holder::UserDataHolder;
