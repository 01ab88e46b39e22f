//! AppState module for Timberman.
//!
//! This module defines the [`AppState`] struct, which holds all state required for a running
//! session: the renderers, the game and the input state.

use crate::config::GameConfig;
use crate::game::GameState;
use crate::game::keys::KeyState;
use crate::game::scene::SceneRegistry;
use crate::game::world::World;
use crate::renderer::text::TextRenderer;
use crate::renderer::wgpu_lib::{RendererError, WgpuRenderer};
use winit::window::{CursorGrabMode, Window};

/// Holds all state required for a running Timberman session.
pub struct AppState {
    /// The WGPU renderer for the forest.
    pub wgpu_renderer: WgpuRenderer,
    /// The main game state (player, world, quest, timing).
    pub game_state: GameState,
    /// The current input state (pressed keys, mouse travel).
    pub key_state: KeyState,
    /// The text renderer for the HUD.
    pub text_renderer: TextRenderer,
}

impl AppState {
    /// Asynchronously creates a new [`AppState`]: loads the scene volumes, scatters the forest
    /// and sets up the renderers.
    ///
    /// # Arguments
    /// - `instance`: The WGPU instance.
    /// - `surface`: The WGPU surface for rendering.
    /// - `window`: The application window.
    /// - `width`: Initial window width.
    /// - `height`: Initial window height.
    /// - `config`: Seed and scene overrides.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &Window,
        width: u32,
        height: u32,
        config: &GameConfig,
    ) -> Result<Self, RendererError> {
        let registry = SceneRegistry::load(config.scene_path.as_deref())?;
        let world = World::generate(&registry, config.seed)?;
        let game_state = GameState::new(world);

        let wgpu_renderer =
            WgpuRenderer::new(instance, surface, width, height, &game_state, &registry).await?;

        let mut text_renderer = TextRenderer::new(
            &wgpu_renderer.device,
            &wgpu_renderer.queue,
            wgpu_renderer.surface_config.format,
            window,
        );
        text_renderer.initialize_hud(width, height);

        let mut state = Self {
            wgpu_renderer,
            game_state,
            key_state: KeyState::new(),
            text_renderer,
        };
        state.triage_mouse(window);
        Ok(state)
    }

    /// Resizes the WGPU surface and moves the HUD to fit.
    ///
    /// # Arguments
    /// - `width`: New width of the surface.
    /// - `height`: New height of the surface.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.wgpu_renderer.resize(width, height);
        self.text_renderer.resize_hud(width, height);
    }

    /// Captures and hides the cursor so mouse travel turns the camera.
    ///
    /// Falls back from a locked to a confined cursor on platforms without locking.
    pub fn triage_mouse(&mut self, window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            log::warn!("Failed to grab cursor: {e}");
        }
        window.set_cursor_visible(false);
    }
}
