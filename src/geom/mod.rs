//! Geometry primitives.
//!
//! This module provides the value types the request pipeline computes with:
//! - `Vector` - 3D vector and its algebra
//! - `Point` - 3D anchor for plane distance queries
//! - `Plane` - plane `ax + by + cz = d`
//!
//! All types are `Copy`; every operation returns a fresh value.

mod vector;
mod point;
mod plane;

pub use vector::Vector;
pub use point::Point;
pub use plane::Plane;
