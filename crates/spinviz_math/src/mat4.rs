//! 4x4 Matrix utilities for camera and projection transforms
//!
//! Matrices are stored row-major (`m[row][col]`) and right-handed. The GPU
//! expects column-major data, so [`to_column_major`] transposes at the upload
//! boundary and nowhere else.

use crate::Vec3;

/// 4x4 matrix type (row-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Create a rotation matrix about a unit axis (Rodrigues form).
///
/// # Arguments
/// * `axis` - Rotation axis, must be unit length
/// * `angle` - Rotation angle in radians
pub fn rotation(axis: Vec3, angle: f32) -> Mat4 {
    let c = angle.cos();
    let s = angle.sin();
    let Vec3 { x, y, z } = axis;

    [
        [x * x * (1.0 - c) + c, x * y * (1.0 - c) - z * s, x * z * (1.0 - c) + y * s, 0.0],
        [x * y * (1.0 - c) + z * s, y * y * (1.0 - c) + c, z * y * (1.0 - c) - x * s, 0.0],
        [x * z * (1.0 - c) - y * s, z * y * (1.0 - c) + x * s, z * z * (1.0 - c) + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create a view matrix looking from `eye` toward `target`.
///
/// `up` is only a reference direction; the matrix uses the orthonormalized
/// basis (right, up', -forward). Transforming `eye` by the result yields the
/// origin.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = (target - eye).normalized();
    let right = forward.cross(up.normalized()).normalized();
    let up = right.cross(forward);

    let mut m = [
        [right.x, right.y, right.z, 0.0],
        [up.x, up.y, up.z, 0.0],
        [-forward.x, -forward.y, -forward.z, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    // Translation column: rotate the eye first, then negate.
    let t = transform_point(m, eye);
    m[0][3] = -t.x;
    m[1][3] = -t.y;
    m[2][3] = -t.z;
    m
}

/// Create a symmetric-frustum perspective projection.
///
/// Maps view-space z = -near to clip depth 0 and z = -far to clip depth 1
/// (wgpu convention).
///
/// # Arguments
/// * `fov_y` - Vertical field of view in radians
/// * `aspect` - Width / height
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far / (near - far), near * far / (near - far)],
        [0.0, 0.0, -1.0, 0.0],
    ]
}

/// Transform a point by an affine matrix (implicit w = 1).
pub fn transform_point(m: Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3],
        m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3],
        m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3],
    )
}

/// Transform a direction by a matrix (implicit w = 0, no translation).
pub fn transform_direction(m: Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
        m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
        m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
    )
}

/// Serialize a row-major matrix to the column-major layout the GPU expects.
///
/// The outer index of the result is the column, matching a WGSL `mat4x4<f32>`
/// uniform.
pub fn to_column_major(m: Mat4) -> [[f32; 4]; 4] {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}
