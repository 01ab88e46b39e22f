//! Timberman - A Forest Woodcutting Game
//!
//! This is the main entry point for Timberman. The player flies into a forest clearing,
//! takes quests from a villager and fells trees with an axe, rendered with WGPU.
//!
//! # Features
//! - **3D Graphics**: Real-time 3D rendering using WGPU
//! - **Seeded Forest**: Trees, rocks, logs and bushes scattered from a seed
//! - **Collision**: Sphere, box and footprint tests with per-frame rollback
//! - **Quests**: Three tiers of tree-chopping goals
//!
//! # Architecture
//! The application follows a modular architecture:
//! - `app/`: Application state management and event handling
//! - `game/`: Core game logic: player, camera, collision, world, chop and quest systems
//! - `renderer/`: Graphics rendering pipeline and HUD text
//! - `math/`: Mathematical utilities for 3D graphics
//! - `config`: Tuning constants and runtime configuration
//!
//! # Usage
//! Run the application with `cargo run`. Set `TIMBERMAN_SEED` to replay a forest,
//! `TIMBERMAN_SCENE` to load object bounds from an OBJ file, and `RUST_LOG` to change
//! the log level.

#![warn(missing_docs)]
pub mod app;
pub mod config;
pub mod game;
pub mod math;
pub mod renderer;

use env_logger::Env;
use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

/// Main entry point for Timberman.
///
/// Initializes logging and optional memory profiling, then runs the event loop.
fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    pollster::block_on(run());
}

/// Creates the event loop and runs the application until it exits.
///
/// Event loop failures are logged rather than panicking.
async fn run() {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Error creating event loop: {err}");
            return;
        }
    };

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new();

    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated with an error: {err}");
    }
}
