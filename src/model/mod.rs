//! Model components.
//!
//! - [`Layer`] - Non-geometry component
//! - [`ComponentTable`] - Objects owned by a model, shared with borrowed wrappers

mod layer;
mod table;

pub use layer::Layer;
pub use table::{ComponentRef, ComponentTable};
