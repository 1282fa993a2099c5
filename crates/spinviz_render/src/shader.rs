//! Shader program composition and verification
//!
//! The glyph shader is a template with a splice point for the selected
//! colormap source. Programs are built and fully validated before callers
//! swap them in; a failed build carries the compiler diagnostics and leaves
//! the caller's current program untouched.

/// Glyph shader template; `MARKER` is replaced by the colormap source.
const SHADER_TEMPLATE: &str = include_str!("shaders/glyph.wgsl");
const MARKER: &str = "//__COLORMAP__";

/// A shader rebuild failure, fatal to that attempt only
#[derive(Debug)]
pub enum ShaderError {
    /// The composed module failed to compile; carries the diagnostic text
    Compile(String),
    /// Pipeline creation failed against the compiled module
    Link(String),
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::Compile(msg) => write!(f, "shader compilation failed: {}", msg),
            ShaderError::Link(msg) => write!(f, "shader program link failed: {}", msg),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Splice a colormap source into the glyph shader template.
pub fn compose_source(colormap_source: &str) -> String {
    SHADER_TEMPLATE.replace(MARKER, colormap_source)
}

/// Build and verify a glyph render pipeline for the given colormap source.
///
/// Both stages run inside validation error scopes so that malformed colormap
/// sources surface as [`ShaderError`] values instead of device panics. The
/// returned pipeline is fully linked; callers swap it in only on `Ok`.
pub fn build_program(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    vertex_buffers: &[wgpu::VertexBufferLayout<'_>],
    colormap_source: &str,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    let source = compose_source(colormap_source);

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Glyph Shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile(error.to_string()));
    }

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Glyph Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers: vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::Link(error.to_string())),
        None => Ok(pipeline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::Colormap;

    #[test]
    fn test_template_has_single_marker() {
        assert_eq!(SHADER_TEMPLATE.matches(MARKER).count(), 1);
    }

    #[test]
    fn test_compose_splices_colormap() {
        for c in Colormap::ALL {
            let source = compose_source(c.source());
            assert!(!source.contains(MARKER));
            assert!(source.contains("fn colormap(direction: vec3<f32>) -> vec3<f32>"));
            // Splice point precedes the vertex stage that calls it.
            let colormap_at = source.find("fn colormap(").unwrap();
            let vs_at = source.find("fn vs_main(").unwrap();
            assert!(colormap_at < vs_at);
        }
    }

    #[test]
    fn test_template_declares_instance_attributes() {
        assert!(SHADER_TEMPLATE.contains("instance_offset"));
        assert!(SHADER_TEMPLATE.contains("instance_direction"));
    }

    #[test]
    fn test_error_display_carries_diagnostics() {
        let err = ShaderError::Compile("unknown identifier 'colormop'".to_string());
        assert!(err.to_string().contains("colormop"));
    }
}
