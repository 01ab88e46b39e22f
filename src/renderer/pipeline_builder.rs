//! # WGPU Pipeline Builder
//!
//! This module provides a builder for creating WGPU render pipelines. It's designed to reduce
//! boilerplate code and make pipeline creation more maintainable in the forest renderer.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use crate::renderer::pipeline_builder::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new(&device, surface_format, shader_source)
//!     .with_label("Scene Pipeline")
//!     .with_vertex_buffer(Vertex::desc())
//!     .with_bind_group_layout(&bind_group_layout)
//!     .with_no_culling()
//!     .build();
//! ```

use wgpu;

/// Builder for creating render pipelines with the patterns used in the forest renderer.
///
/// This builder provides a fluent API that reduces boilerplate code and makes pipeline
/// creation more maintainable. It sets sensible defaults while allowing customization
/// of the parameters the renderer actually changes.
///
/// ## Default Configuration
///
/// - Vertex entry point: `"vs_main"`
/// - Fragment entry point: `"fs_main"`
/// - Blend state: `REPLACE` (no blending)
/// - Cull mode: `Back` face culling
/// - Primitive topology: `TriangleList`
/// - Front face: Counter-clockwise
/// - No depth testing
///
/// ## Builder Pattern Usage
///
/// Each method returns `Self`, allowing for method chaining. Call
/// [`build()`](PipelineBuilder::build) at the end to create the actual render pipeline.
pub struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    surface_format: wgpu::TextureFormat,
    shader_source: &'a str,
    label: Option<&'a str>,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    cull_mode: Option<wgpu::Face>,
    depth_stencil: Option<wgpu::DepthStencilState>,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a new pipeline builder with default settings.
    ///
    /// # Parameters
    ///
    /// - `device` - The WGPU device used to create the pipeline
    /// - `surface_format` - The texture format of the render target (usually from surface config)
    /// - `shader_source` - WGSL source containing both `vs_main` and `fs_main`
    pub fn new(
        device: &'a wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &'a str,
    ) -> Self {
        Self {
            device,
            surface_format,
            shader_source,
            label: None,
            vertex_buffers: Vec::new(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(wgpu::Face::Back),
            depth_stencil: None,
        }
    }

    /// Set a debug label for the pipeline, its layout and its shader module.
    ///
    /// Labels show up in graphics debuggers and in WGPU validation errors.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Add a vertex buffer layout to the pipeline.
    ///
    /// Layouts are bound in the order they are added, starting at slot 0.
    pub fn with_vertex_buffer(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    /// Add a bind group layout to the pipeline.
    ///
    /// The first layout added is group 0 in the shader, the second group 1, and so on.
    pub fn with_bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    /// Disable face culling.
    ///
    /// By default, back faces are culled. Use this method to render both
    /// front and back faces of triangles.
    pub fn with_no_culling(mut self) -> Self {
        self.cull_mode = None;
        self
    }

    /// Set depth and stencil testing configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// let depth_stencil = wgpu::DepthStencilState {
    ///     format: wgpu::TextureFormat::Depth24Plus,
    ///     depth_write_enabled: true,
    ///     depth_compare: wgpu::CompareFunction::Less,
    ///     stencil: wgpu::StencilState::default(),
    ///     bias: wgpu::DepthBiasState::default(),
    /// };
    /// let builder = builder.with_depth_stencil(depth_stencil);
    /// ```
    pub fn with_depth_stencil(mut self, depth_stencil: wgpu::DepthStencilState) -> Self {
        self.depth_stencil = Some(depth_stencil);
        self
    }

    /// Build the render pipeline with the configured parameters.
    ///
    /// This consumes the builder and creates the actual WGPU render pipeline.
    /// Shader compilation errors are reported by WGPU's validation layer.
    pub fn build(self) -> wgpu::RenderPipeline {
        let shader = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: self.label,
                source: wgpu::ShaderSource::Wgsl(self.shader_source.into()),
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: self.label,
                bind_group_layouts: &self.bind_group_layouts,
                push_constant_ranges: &[],
            });

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &self.vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: self.cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: self.depth_stencil,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
    }
}
