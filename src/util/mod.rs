//! Utility types and functions for rhino3dm.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Math value types and glam re-exports

mod error;
mod math;

pub use error::*;
pub use math::*;
