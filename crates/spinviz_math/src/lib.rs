//! Math primitives for the spinviz renderer
//!
//! This crate provides the 3D vector and 4x4 matrix operations used by the
//! camera and the render pipeline.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 matrix for camera and projection transforms
//!
//! Matrices are right-handed and stored row-major; [`mat4::to_column_major`]
//! converts at the GPU boundary.

mod vec3;
pub mod mat4;

pub use vec3::Vec3;
pub use mat4::Mat4;
