//! Instanced glyph render pipeline
//!
//! Owns the static mesh buffers, the per-instance position/direction buffers,
//! and the active shader program. One frame is a single instanced draw over
//! all spins; the mesh itself never changes between frames.

use wgpu::util::DeviceExt;

use bytemuck::{Pod, Zeroable};
use spinviz_math::mat4;

use crate::camera::Camera;
use crate::geometry::{GlyphMesh, GlyphVertex};
use crate::shader::{self, ShaderError};

/// Near clip plane distance
const Z_NEAR: f32 = 0.1;
/// Far clip plane distance
const Z_FAR: f32 = 10000.0;

/// Uniforms shared by both shader stages
/// Layout: 144 bytes (must match glyph.wgsl SceneUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Projection matrix, column-major (64 bytes)
    pub projection: [[f32; 4]; 4],
    /// Modelview matrix, column-major (64 bytes)
    pub modelview: [[f32; 4]; 4],
    /// Light position in view space + padding (16 bytes)
    pub light_position: [f32; 3],
    pub _padding: f32,
}

impl SceneUniforms {
    /// Build the frame uniforms from the camera and the live surface size.
    ///
    /// The light rides at the camera: its view-space position is the image of
    /// the camera location under the view matrix, which is the origin by
    /// construction.
    pub fn from_camera(camera: &Camera, width: u32, height: u32) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        let projection =
            mat4::perspective(camera.vertical_fov.to_radians(), aspect, Z_NEAR, Z_FAR);
        let view = camera.view_matrix();
        let light = mat4::transform_point(view, camera.location);
        Self {
            projection: mat4::to_column_major(projection),
            modelview: mat4::to_column_major(view),
            light_position: light.to_array(),
            _padding: 0.0,
        }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            projection: mat4::to_column_major(mat4::IDENTITY),
            modelview: mat4::to_column_major(mat4::IDENTITY),
            light_position: [0.0; 3],
            _padding: 0.0,
        }
    }
}

/// Instanced render pipeline for the spin field
pub struct SpinPipeline {
    pipeline: wgpu::RenderPipeline,
    pipeline_layout: wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
    instance_positions: Option<wgpu::Buffer>,
    instance_directions: Option<wgpu::Buffer>,
    num_instances: u32,
    instance_capacity: u32,
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl SpinPipeline {
    /// Create the pipeline with an initial mesh and colormap.
    ///
    /// Fails if the initial shader program does not build; the pipeline is
    /// never left without a valid program.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        mesh: &GlyphMesh,
        colormap_source: &str,
    ) -> Result<Self, ShaderError> {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Glyph Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Glyph Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = shader::build_program(
            device,
            &pipeline_layout,
            surface_format,
            &Self::vertex_buffer_layouts(),
            colormap_source,
        )?;

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Glyph Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Glyph Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let (vertex_buffer, index_buffer) = Self::create_mesh_buffers(device, mesh);

        Ok(Self {
            pipeline,
            pipeline_layout,
            surface_format,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            num_indices: mesh.index_count() as u32,
            instance_positions: None,
            instance_directions: None,
            num_instances: 0,
            instance_capacity: 0,
            depth_texture: None,
            depth_size: (0, 0),
        })
    }

    /// Vertex buffer layouts: slot 0 is the mesh, slots 1 and 2 advance per
    /// instance (positions, directions).
    fn vertex_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    // position: vec3<f32>
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    // normal: vec3<f32>
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 12,
                        shader_location: 1,
                    },
                ],
            },
            wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 2,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 3,
                }],
            },
        ]
    }

    fn create_mesh_buffers(
        device: &wgpu::Device,
        mesh: &GlyphMesh,
    ) -> (wgpu::Buffer, wgpu::Buffer) {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Glyph Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Glyph Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        (vertex_buffer, index_buffer)
    }

    /// Replace the glyph mesh wholesale (after a shape-parameter change)
    pub fn upload_mesh(&mut self, device: &wgpu::Device, mesh: &GlyphMesh) {
        let (vertex_buffer, index_buffer) = Self::create_mesh_buffers(device, mesh);
        self.vertex_buffer = vertex_buffer;
        self.index_buffer = index_buffer;
        self.num_indices = mesh.index_count() as u32;
        log::debug!(
            "Uploaded glyph mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
    }

    /// Replace the instance buffers wholesale.
    ///
    /// `positions` and `directions` must have equal length (caller
    /// precondition, not validated in release builds). The upload streams
    /// into the existing allocation when it is large enough; in-flight frames
    /// reading the old contents are superseded by the next draw anyway.
    pub fn update_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        positions: &[[f32; 3]],
        directions: &[[f32; 3]],
    ) {
        debug_assert_eq!(positions.len(), directions.len());
        self.num_instances = positions.len() as u32;
        if positions.is_empty() {
            return;
        }

        let fits = self.num_instances <= self.instance_capacity;
        match (&self.instance_positions, &self.instance_directions, fits) {
            (Some(position_buffer), Some(direction_buffer), true) => {
                queue.write_buffer(position_buffer, 0, bytemuck::cast_slice(positions));
                queue.write_buffer(direction_buffer, 0, bytemuck::cast_slice(directions));
            }
            _ => {
                self.instance_positions =
                    Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Instance Position Buffer"),
                        contents: bytemuck::cast_slice(positions),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    }));
                self.instance_directions =
                    Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Instance Direction Buffer"),
                        contents: bytemuck::cast_slice(directions),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    }));
                self.instance_capacity = self.num_instances;
            }
        }
    }

    /// Rebuild the shader program for a new colormap source.
    ///
    /// The candidate program is built and verified before the active one is
    /// touched; on failure the previous program stays active and the error
    /// (with diagnostics) is returned.
    pub fn set_colormap(
        &mut self,
        device: &wgpu::Device,
        colormap_source: &str,
    ) -> Result<(), ShaderError> {
        let candidate = shader::build_program(
            device,
            &self.pipeline_layout,
            self.surface_format,
            &Self::vertex_buffer_layouts(),
            colormap_source,
        )?;
        self.pipeline = candidate;
        Ok(())
    }

    /// Upload the frame uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Ensure the depth texture matches the surface size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Depth32Float,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            self.depth_texture =
                Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Number of instances the next draw will cover
    pub fn instance_count(&self) -> u32 {
        self.num_instances
    }

    /// True when the next render pass will issue a draw call
    pub fn will_draw(&self) -> bool {
        self.num_instances > 0 && self.instance_positions.is_some()
    }

    /// Record one frame: clear to the background unconditionally, then draw
    /// every instance in a single call unless the field is empty.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        background: [f32; 3],
    ) {
        let depth_view = self
            .depth_texture
            .as_ref()
            .expect("Depth texture not created. Call ensure_depth_texture first.");

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Glyph Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: background[0] as f64,
                        g: background[1] as f64,
                        b: background[2] as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if !self.will_draw() {
            return;
        }
        let (positions, directions) = match (&self.instance_positions, &self.instance_directions)
        {
            (Some(p), Some(d)) => (p, d),
            _ => return,
        };

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, positions.slice(..));
        render_pass.set_vertex_buffer(2, directions.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.num_indices, 0, 0..self.num_instances);
    }
}
