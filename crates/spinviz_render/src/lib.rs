//! Spin-field rendering library
//!
//! This crate provides the wgpu-based pipeline for drawing a field of
//! oriented arrow glyphs with instanced rendering.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`geometry::GlyphMesh`] - Procedural cone+cylinder arrow mesh
//! - [`colormap::Colormap`] - Direction-to-color mappings embedded as WGSL
//! - [`pipeline::SpinPipeline`] - Instanced draw of the glyph over a spin field
//! - [`camera::Camera`] - Orbit/pan/zoom camera state
//!
//! The shader program is composed per colormap and rebuilt on demand; see
//! [`shader`] for the composition and verification rules.

pub mod camera;
pub mod colormap;
pub mod context;
pub mod geometry;
pub mod pipeline;
pub mod shader;

pub use camera::Camera;
pub use colormap::{Colormap, ColormapError, ColormapRegistry};
pub use context::{ContextError, RenderContext};
pub use geometry::{GlyphMesh, GlyphParams, GlyphVertex};
pub use pipeline::{SceneUniforms, SpinPipeline};
pub use shader::ShaderError;
