//! Application module for Timberman.
//!
//! This module contains the window lifecycle, event routing and the per-frame loop.
//!
//! # Module Structure
//!
//! - [`app_state`]: Contains the [`AppState`] struct which holds the renderers, game and input state
//! - [`event_handler`]: Contains the [`App`] struct and event handling logic
//! - [`update`]: Contains frame timing and the redraw loop
//!
//! # Event Flow
//!
//! 1. **Input Events**: Window and device events are recorded into [`KeyState`](crate::game::keys::KeyState)
//! 2. **State Updates**: Once per redraw, a snapshot of the input drives one game update
//! 3. **Rendering**: The updated state and its HUD are drawn to the screen
//!
//! # Threading Model
//!
//! The application runs on a single thread. Window events never touch the game state
//! directly; all changes happen inside the redraw.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;
