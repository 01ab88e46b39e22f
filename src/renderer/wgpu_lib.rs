//! WGPU-based renderer for Timberman.
//!
//! This module provides [`WgpuRenderer`], which owns the surface, device and queue and
//! orchestrates each frame: a sky-coloured clear, the forest scene, then the HUD text.
//!
//! # Usage
//! Create a [`WgpuRenderer`] via [`WgpuRenderer::new`] and call [`WgpuRenderer::update_canvas`]
//! each frame to render the current game state.

use crate::config::SKY_COLOR;
use crate::game::GameState;
use crate::game::scene::{SceneError, SceneRegistry};
use crate::renderer::scene_renderer::SceneRenderer;
use crate::renderer::text::TextRenderer;
use thiserror::Error;
use wgpu::{SurfaceTexture, TextureView};

/// Failures while setting up or drawing to the GPU.
#[derive(Debug, Error)]
pub enum RendererError {
    /// The window surface could not be created.
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    #[error("no suitable graphics adapter found")]
    NoAdapter,
    /// The adapter refused a device.
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    /// The surface reports no formats.
    #[error("surface supports no texture formats")]
    NoSurfaceFormat,
    /// The next frame could not be acquired.
    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    /// The scene volumes could not be loaded.
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Main WGPU renderer.
///
/// This struct manages the GPU resources shared by every pass and the scene renderer.
pub struct WgpuRenderer {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    /// The surface configuration (format, size, etc.).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// The WGPU device for resource creation.
    pub device: wgpu::Device,
    /// The WGPU queue for submitting commands.
    pub queue: wgpu::Queue,
    /// Draws the forest.
    pub scene_renderer: SceneRenderer,
}

impl WgpuRenderer {
    /// Initializes a new [`WgpuRenderer`] and all associated GPU resources.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        game_state: &GameState,
        registry: &SceneRegistry,
    ) -> Result<Self, RendererError> {
        let adapter = Self::create_adapter(instance, &surface).await?;
        log::info!("Using adapter: {}", adapter.get_info().name);
        let (device, queue) = Self::create_device(&adapter).await?;
        let surface_config = Self::create_surface_config(&surface, &adapter, width, height)?;

        surface.configure(&device, &surface_config);
        log::info!(
            "Configured {}x{} surface with format {:?}",
            width,
            height,
            surface_config.format
        );

        let scene_renderer =
            SceneRenderer::new(&device, &surface_config, registry, &game_state.world)?;

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            scene_renderer,
        })
    }

    /// Reconfigures the surface after the window is resized.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Renders the current frame to the surface.
    pub fn update_canvas(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        game_state: &GameState,
        text_renderer: &mut TextRenderer,
    ) -> Result<SurfaceTexture, RendererError> {
        let (surface_texture, surface_view) = self.get_surface_texture_and_view()?;
        let depth_texture_view = self.update_depth_texture();

        self.clear_render_target(encoder, &surface_view, &depth_texture_view);
        self.render_game_objects(encoder, &surface_view, &depth_texture_view, game_state);
        self.render_text(encoder, &surface_view, text_renderer);

        Ok(surface_texture)
    }

    // Private helper methods

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Result<wgpu::Adapter, RendererError> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .ok_or(RendererError::NoAdapter)
    }

    async fn create_device(
        adapter: &wgpu::Adapter,
    ) -> Result<(wgpu::Device, wgpu::Queue), RendererError> {
        let device = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;
        Ok(device)
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration, RendererError> {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|&&f| f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .or_else(|| capabilities.formats.iter().find(|f| f.is_srgb()))
            .or_else(|| capabilities.formats.first())
            .copied()
            .ok_or(RendererError::NoSurfaceFormat)?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        })
    }

    fn get_surface_texture_and_view(&self) -> Result<(SurfaceTexture, TextureView), RendererError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface.get_current_texture()?
            }
            Err(e) => return Err(e.into()),
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok((surface_texture, surface_view))
    }

    fn update_depth_texture(&mut self) -> TextureView {
        let (width, height) = (self.surface_config.width, self.surface_config.height);
        self.scene_renderer
            .update_depth_texture(&self.device, width, height)
    }

    fn clear_render_target(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        depth_texture_view: &TextureView,
    ) {
        let [r, g, b] = SKY_COLOR;
        let _clear_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
    }

    fn render_game_objects(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        depth_texture_view: &TextureView,
        game_state: &GameState,
    ) {
        let aspect = self.surface_config.width as f32 / self.surface_config.height.max(1) as f32;
        self.scene_renderer
            .prepare(&self.device, &self.queue, game_state, aspect);

        let mut main_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_texture_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        self.scene_renderer.render_scene(&mut main_pass);
    }

    fn render_text(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &TextureView,
        text_renderer: &mut TextRenderer,
    ) {
        self.prepare_text_renderer(text_renderer);

        let mut text_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Text Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = text_renderer.render(&mut text_pass) {
            log::error!("Text render failed: {e:?}");
        }
    }

    fn prepare_text_renderer(&self, text_renderer: &mut TextRenderer) {
        text_renderer.resize(
            &self.queue,
            glyphon::Resolution {
                width: self.surface_config.width,
                height: self.surface_config.height,
            },
        );

        if let Err(e) = text_renderer.prepare(&self.device, &self.queue, &self.surface_config) {
            log::warn!("Failed to prepare text renderer: {e:?}");
        }
    }
}
