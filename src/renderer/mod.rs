//! Main renderer module.
//!
//! This module contains the pipeline builder, the vertex and uniform definitions, the forest
//! scene renderer, the HUD text renderer and the wgpu renderer that ties them together.

/// Pipeline building utilities for WGPU.
pub mod pipeline_builder;
/// Uniforms, vertices and box geometry.
pub mod primitives;
/// Forest scene rendering.
pub mod scene_renderer;
/// Text rendering system.
pub mod text;
/// Core WGPU library and utilities.
pub mod wgpu_lib;
