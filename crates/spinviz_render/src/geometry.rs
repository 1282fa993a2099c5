//! Procedural arrow glyph mesh
//!
//! The glyph is a cone (the head) on top of a cylinder (the shaft), pointing
//! along +z and centered about its own local origin. One mesh is shared by
//! every instance; orientation happens per instance in the vertex shader.

use bytemuck::{Pod, Zeroable};

/// A mesh vertex: position and shading normal
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlyphVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Shape parameters for the arrow glyph
///
/// All values are clamped by [`GlyphMesh::build`]: lengths and radii to >= 0,
/// `level_of_detail` to `[3, MAX_LEVEL_OF_DETAIL]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphParams {
    /// Number of angular segments approximating the circular cross-sections
    pub level_of_detail: u32,
    pub cone_height: f32,
    pub cone_radius: f32,
    pub cylinder_height: f32,
    pub cylinder_radius: f32,
}

impl Default for GlyphParams {
    fn default() -> Self {
        Self {
            level_of_detail: 20,
            cone_height: 0.6,
            cone_radius: 0.25,
            cylinder_height: 0.7,
            cylinder_radius: 0.125,
        }
    }
}

/// Upper bound on the level of detail.
///
/// Indices are 16-bit; the mesh has `1 + 5n` vertices, so n beyond this would
/// overflow the index range.
pub const MAX_LEVEL_OF_DETAIL: u32 = (u16::MAX as u32 - 1) / 5;

/// The arrow glyph mesh: vertex and index buffers ready for upload
///
/// Immutable once built; any shape-parameter change rebuilds the whole mesh.
/// Triangles are counter-clockwise wound and every index is less than the
/// vertex count.
#[derive(Clone, Debug)]
pub struct GlyphMesh {
    pub vertices: Vec<GlyphVertex>,
    pub indices: Vec<u16>,
}

impl GlyphMesh {
    /// Build the glyph mesh from shape parameters.
    ///
    /// Out-of-range parameters are clamped, not rejected. With n angular
    /// segments the mesh has `1 + 5n` vertices and `5n` triangles: a fan for
    /// the cone side, fans capping the cone base and the cylinder bottom, and
    /// a two-triangle strip segment per side of the cylinder wall.
    pub fn build(params: &GlyphParams) -> Self {
        let n = params.level_of_detail.clamp(3, MAX_LEVEL_OF_DETAIL) as usize;
        let cone_height = params.cone_height.max(0.0);
        let cone_radius = params.cone_radius.max(0.0);
        let cylinder_height = params.cylinder_height.max(0.0);
        let cylinder_radius = params.cylinder_radius.max(0.0);

        // Center the combined glyph about its local origin.
        let z_offset = (cylinder_height - cone_height) / 2.0;

        // Slant-normal factors for the cone side.
        let l = cone_radius.hypot(cone_height);
        let (f1, f2) = if l > 0.0 {
            (cone_radius / l, cone_height / l)
        } else {
            (0.0, 0.0)
        };

        let base_normal = [0.0, 0.0, -1.0];
        let mut vertices = Vec::with_capacity(1 + 5 * n);

        // The tip has no normal to prevent a shading discontinuity.
        vertices.push(GlyphVertex {
            position: [0.0, 0.0, z_offset + cone_height],
            normal: [0.0, 0.0, 0.0],
        });

        let angles: Vec<f32> = (0..n)
            .map(|i| 2.0 * std::f32::consts::PI * i as f32 / n as f32)
            .collect();

        // Ring A: cone lateral surface
        for &alpha in &angles {
            vertices.push(GlyphVertex {
                position: [cone_radius * alpha.cos(), cone_radius * alpha.sin(), z_offset],
                normal: [f2 * alpha.cos(), f2 * alpha.sin(), f1],
            });
        }
        // Ring B: cone base cap
        for &alpha in &angles {
            vertices.push(GlyphVertex {
                position: [cone_radius * alpha.cos(), cone_radius * alpha.sin(), z_offset],
                normal: base_normal,
            });
        }
        // Ring C: cylinder bottom cap
        for &alpha in &angles {
            vertices.push(GlyphVertex {
                position: [
                    cylinder_radius * alpha.cos(),
                    cylinder_radius * alpha.sin(),
                    z_offset - cylinder_height,
                ],
                normal: base_normal,
            });
        }
        // Ring D: cylinder wall, bottom edge
        for &alpha in &angles {
            vertices.push(GlyphVertex {
                position: [
                    cylinder_radius * alpha.cos(),
                    cylinder_radius * alpha.sin(),
                    z_offset - cylinder_height,
                ],
                normal: [alpha.cos(), alpha.sin(), 0.0],
            });
        }
        // Ring E: cylinder wall, top edge
        for &alpha in &angles {
            vertices.push(GlyphVertex {
                position: [
                    cylinder_radius * alpha.cos(),
                    cylinder_radius * alpha.sin(),
                    z_offset,
                ],
                normal: [alpha.cos(), alpha.sin(), 0.0],
            });
        }

        let n16 = n as u16;
        let mut indices = Vec::with_capacity(15 * n);

        // Cone side: fan from the apex over ring A.
        for i in 0..n16 {
            indices.extend_from_slice(&[1 + i, 1 + (i + 1) % n16, 0]);
        }
        // Cone base cap: fan over ring B.
        for i in 0..n16 {
            indices.extend_from_slice(&[n16 + 1, n16 + 1 + (i + 1) % n16, n16 + 1 + i]);
        }
        // Cylinder bottom cap: fan over ring C.
        for i in 0..n16 {
            indices.extend_from_slice(&[
                2 * n16 + 1,
                2 * n16 + 1 + (i + 1) % n16,
                2 * n16 + 1 + i,
            ]);
        }
        // Cylinder wall: two triangles per segment between rings D and E.
        for i in 0..n16 {
            indices.extend_from_slice(&[
                3 * n16 + 1 + i,
                3 * n16 + 1 + (i + 1) % n16,
                4 * n16 + 1 + i,
            ]);
            indices.extend_from_slice(&[
                4 * n16 + 1 + i,
                3 * n16 + 1 + (i + 1) % n16,
                4 * n16 + 1 + (i + 1) % n16,
            ]);
        }

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}
