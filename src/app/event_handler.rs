//! Event handler module for Timberman.
//!
//! Contains the App struct and its event handling logic.

use crate::app::app_state::AppState;
use crate::config::{GameConfig, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::game::keys::{GameKey, winit_key_to_game_key};
use crate::renderer::wgpu_lib::RendererError;
use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Main application struct that manages the game lifecycle and event handling.
///
/// This struct implements the [`ApplicationHandler`] trait to handle all window and device events.
/// It manages the WGPU instance, application state, and window lifecycle.
///
/// # Fields
/// - `instance`: The WGPU instance for graphics operations
/// - `state`: Optional application state (None until window is created)
/// - `window`: Optional window reference (None until window is created)
///
/// # Lifecycle
/// 1. Created with `App::new()` - initializes WGPU instance
/// 2. Window is set via `set_window()` - creates surface and application state
/// 3. Events are handled via `ApplicationHandler` trait methods
/// 4. Application runs until window is closed or Escape is pressed
#[derive(Default)]
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    /// The current application state, None until initialized.
    pub state: Option<AppState>,
    /// The application window, None until set.
    pub window: Option<Arc<Window>>,
}

impl App {
    /// Creates a new [`App`] instance with default WGPU configuration.
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            state: None,
            window: None,
        }
    }

    /// Asynchronously sets up the application window and initializes all game systems.
    ///
    /// # Initialization Steps
    /// 1. Creates WGPU surface from the window
    /// 2. Reads the runtime configuration from the environment
    /// 3. Initializes [`AppState`] with the renderers and a freshly scattered forest
    /// 4. Stores window and state references
    ///
    /// # Errors
    /// Returns a [`RendererError`] if the surface, adapter, device or scene cannot be set up.
    pub async fn set_window(&mut self, window: Window) -> Result<(), RendererError> {
        let window = Arc::new(window);
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let surface = self.instance.create_surface(window.clone())?;
        log::info!("Created window and surface ({width}x{height})");

        let config = GameConfig::from_env();
        log::info!("World seed: {}", config.seed);

        let state = AppState::new(&self.instance, surface, &window, width, height, &config).await?;

        self.window.get_or_insert(window).request_redraw();
        self.state.get_or_insert(state);
        Ok(())
    }

    /// Handles window resize events and updates all rendering systems.
    ///
    /// Only processes the resize if both dimensions are greater than 0.
    pub fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            match &mut self.state {
                Some(state) => state.resize_surface(width, height),
                None => log::warn!("Cannot resize surface without state initialized"),
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, game_key: GameKey, pressed: bool) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if !pressed {
            state.key_state.release_key(game_key);
            return;
        }

        state.key_state.press_key(game_key);
        if game_key == GameKey::Quit {
            log::info!("Quit requested; stopping");
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    /// Handles application resume events by creating the window.
    ///
    /// Any setup failure is logged and ends the event loop.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = pollster::block_on(self.set_window(window)) {
            log::error!("Failed to initialize renderer: {err}");
            event_loop.exit();
        }
    }

    /// Records raw mouse travel for the camera orbit.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(state) = self.state.as_mut() {
                state.key_state.add_mouse_motion(delta.0, delta.1);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                self.handle_resized(new_size.width, new_size.height);
            }

            WindowEvent::Focused(true) => {
                if let (Some(state), Some(window)) = (self.state.as_mut(), self.window.as_ref()) {
                    state.triage_mouse(window);
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: key,
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(game_key) = winit_key_to_game_key(&key) {
                    self.handle_key(event_loop, game_key, key_state == ElementState::Pressed);
                }
            }

            WindowEvent::MouseInput {
                state: mouse_state,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_key(event_loop, GameKey::Chop, mouse_state == ElementState::Pressed);
            }

            WindowEvent::RedrawRequested => {
                self.handle_frame_timing(Instant::now());
                if let Err(err) = self.handle_redraw() {
                    match err {
                        RendererError::Surface(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of GPU memory: {err}");
                            event_loop.exit();
                        }
                        _ => log::warn!("Skipped frame: {err}"),
                    }
                }
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}
