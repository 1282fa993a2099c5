//! GPU rendering system
//!
//! Owns the render context, the glyph pipeline, the camera, and the current
//! option set. Hosts drive it through the public operations: option updates
//! (with diff-directed rebuilds), wholesale instance updates, and frame
//! rendering.

use std::sync::Arc;
use winit::window::Window;

use spinviz_render::{
    Camera, ColormapRegistry, ContextError, GlyphMesh, RenderContext, SceneUniforms, ShaderError,
    SpinPipeline,
};

use crate::options::{OptionsPatch, ViewOptions};

/// Construction failure: a required rendering capability is unavailable.
///
/// Reported once; the host keeps running with rendering disabled.
#[derive(Debug)]
pub enum InitError {
    Context(ContextError),
    Shader(ShaderError),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::Context(e) => write!(f, "render context init failed: {}", e),
            InitError::Shader(e) => write!(f, "initial shader build failed: {}", e),
        }
    }
}

impl std::error::Error for InitError {}

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Manages GPU rendering of the spin field
pub struct RenderSystem {
    context: RenderContext,
    pipeline: SpinPipeline,
    registry: ColormapRegistry,
    options: ViewOptions,
    camera: Camera,
    home_camera: Camera,
}

impl RenderSystem {
    /// Create the render system from a window and the initial options.
    pub fn new(window: Arc<Window>, options: ViewOptions, vsync: bool) -> Result<Self, InitError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))
            .map_err(InitError::Context)?;

        let registry = ColormapRegistry::new();
        let source = registry.resolve(&options.colormap).unwrap_or_else(|| {
            log::warn!(
                "Unknown colormap '{}', falling back to 'red'",
                options.colormap
            );
            spinviz_render::Colormap::Red.source()
        });

        let mesh = GlyphMesh::build(&options.glyph);
        let mut pipeline =
            SpinPipeline::new(&context.device, context.config.format, &mesh, source)
                .map_err(InitError::Shader)?;
        pipeline.ensure_depth_texture(&context.device, context.config.width, context.config.height);

        log::info!(
            "Render system ready: {} glyph vertices, colormap '{}'",
            mesh.vertex_count(),
            options.colormap
        );

        let camera = Self::camera_from_options(&options);
        Ok(Self {
            context,
            pipeline,
            registry,
            options,
            camera,
            home_camera: camera,
        })
    }

    fn camera_from_options(options: &ViewOptions) -> Camera {
        Camera {
            location: options.camera_location.into(),
            center: options.center_location.into(),
            up: options.up_vector.into(),
            vertical_fov: options.vertical_fov,
            background: options.background_color,
        }
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.ensure_depth_texture(
            &self.context.device,
            self.context.config.width,
            self.context.config.height,
        );
    }

    /// Apply an option patch, rebuilding exactly what the diff invalidates.
    ///
    /// A rejected colormap (unknown name or failed shader build) leaves the
    /// previous colormap and program active; everything else in the patch
    /// still applies.
    pub fn update_options(&mut self, patch: &OptionsPatch) {
        let (mut next, rebuild) = self.options.apply(patch);

        if rebuild.mesh {
            let mesh = GlyphMesh::build(&next.glyph);
            self.pipeline.upload_mesh(&self.context.device, &mesh);
        }

        if rebuild.shader {
            match self.registry.resolve(&next.colormap) {
                None => {
                    log::warn!(
                        "Unknown colormap '{}', keeping '{}'",
                        next.colormap,
                        self.options.colormap
                    );
                    next.colormap = self.options.colormap.clone();
                }
                Some(source) => {
                    if let Err(e) = self.pipeline.set_colormap(&self.context.device, source) {
                        log::error!(
                            "Colormap '{}' rejected, keeping '{}': {}",
                            next.colormap,
                            self.options.colormap,
                            e
                        );
                        next.colormap = self.options.colormap.clone();
                    }
                }
            }
        }

        if rebuild.camera {
            self.camera = Self::camera_from_options(&next);
            self.home_camera = self.camera;
        }

        self.options = next;
    }

    /// Replace the spin field wholesale.
    ///
    /// `positions` and `directions` must have equal length, and directions
    /// are expected to be unit vectors (caller preconditions).
    pub fn update_instances(&mut self, positions: &[[f32; 3]], directions: &[[f32; 3]]) {
        self.pipeline.update_instances(
            &self.context.device,
            &self.context.queue,
            positions,
            directions,
        );
    }

    /// Render a single frame at the live surface size
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => return Err(RenderError::SurfaceLost),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let uniforms = SceneUniforms::from_camera(
            &self.camera,
            self.context.config.width,
            self.context.config.height,
        );
        self.pipeline.update_uniforms(&self.context.queue, &uniforms);

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.pipeline
            .render(&mut encoder, &view, self.camera.background);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Current options (immutable; change through [`update_options`](Self::update_options))
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera access for the input-translation layer
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Return the camera to its configured home state
    pub fn reset_camera(&mut self) {
        self.camera = self.home_camera;
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }
}
