//! Update logic for the Timberman App.
//!
//! Contains frame timing and the redraw loop for the App struct.

use crate::renderer::wgpu_lib::RendererError;
use std::time::Instant;

use super::event_handler::App;

impl App {
    /// Runs one frame: input snapshot, game update, HUD, render and present.
    ///
    /// # Rendering Pipeline
    /// 1. **Input**: Takes the pending key edges and mouse travel as one snapshot
    /// 2. **Game State Update**: Advances the game by the last frame's delta time
    /// 3. **HUD**: Copies the formatted HUD strings into the text buffers
    /// 4. **Rendering**: Encodes the clear, scene and text passes
    /// 5. **Frame Submission**: Submits commands and presents the frame
    ///
    /// Skips the frame while the window is minimized.
    pub fn handle_redraw(&mut self) -> Result<(), RendererError> {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return Ok(());
        };
        if window.is_minimized().unwrap_or(false) {
            return Ok(());
        }

        let input = state.key_state.snapshot();
        let delta_time = state.game_state.delta_time;
        state.game_state.update(&input, delta_time);
        state.text_renderer.apply_hud(&state.game_state.hud());

        let mut encoder = state
            .wgpu_renderer
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let surface_texture = state.wgpu_renderer.update_canvas(
            &mut encoder,
            &state.game_state,
            &mut state.text_renderer,
        )?;

        state.wgpu_renderer.queue.submit(Some(encoder.finish()));
        window.pre_present_notify();
        surface_texture.present();

        state.wgpu_renderer.device.poll(wgpu::Maintain::Poll);
        state.text_renderer.trim();
        Ok(())
    }

    /// Updates frame timing: delta time every frame, FPS once per second.
    pub fn handle_frame_timing(&mut self, current_time: Instant) {
        if let Some(state) = self.state.as_mut() {
            let game_state = &mut state.game_state;
            game_state.frame_count += 1;

            let since_fps = current_time
                .duration_since(game_state.last_fps_time)
                .as_secs_f32();
            if since_fps >= 1.0 {
                game_state.current_fps = game_state.frame_count as f32 / since_fps;
                log::debug!("{:.2} fps", game_state.current_fps);
                game_state.frame_count = 0;
                game_state.last_fps_time = current_time;
            }

            game_state.delta_time = current_time
                .duration_since(game_state.last_frame_time)
                .as_secs_f32();
            game_state.last_frame_time = current_time;
        }
    }
}
