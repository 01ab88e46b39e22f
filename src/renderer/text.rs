//! Glyphon text rendering for the HUD.
//!
//! Each piece of HUD text lives in its own named [`TextBuffer`]. The game
//! produces a [`HudText`] every frame and [`TextRenderer::apply_hud`] copies it
//! into the buffers, hiding the ones with nothing to show.

use crate::game::HudText;
use glyphon::cosmic_text::Align;
use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, Style,
    SwashCache, TextArea, TextAtlas, TextBounds, TextRenderer as GlyphonTextRenderer, Viewport,
    Weight,
};
use std::collections::HashMap;
use wgpu::{Device, Queue, RenderPass, SurfaceConfiguration};
use winit::window::Window;

/// Trees felled on the current tier.
pub const TREES_CHOPPED: &str = "trees_chopped";
/// Current quest goal.
pub const QUEST: &str = "quest";
/// Time left on the current chop.
pub const COUNTDOWN: &str = "countdown";
/// The villager's lines.
pub const DIALOGUE: &str = "dialogue";
/// Title shown before the game starts.
pub const TITLE: &str = "title";
/// Start prompt under the title.
pub const PROMPT: &str = "prompt";
/// Frames per second.
pub const FPS: &str = "fps";

/// Font and layout settings for one text buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Line height in pixels.
    pub line_height: f32,
    /// Text colour.
    pub color: Color,
    /// Font weight.
    pub weight: Weight,
    /// Upright or italic.
    pub style: Style,
    /// Horizontal alignment inside the buffer width; `None` is left-aligned.
    pub align: Option<Align>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "DejaVu Sans".to_string(),
            font_size: 16.0,
            line_height: 20.0,
            color: Color::rgb(255, 255, 255),
            weight: Weight::NORMAL,
            style: Style::Normal,
            align: None,
        }
    }
}

/// Where a text buffer sits on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPosition {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Wrap width; `None` uses the window width.
    pub max_width: Option<f32>,
    /// Clip height; `None` uses the window height.
    pub max_height: Option<f32>,
}

/// A glyphon buffer with its style, position and visibility.
#[derive(Debug)]
pub struct TextBuffer {
    /// Shaped glyphon text.
    pub buffer: Buffer,
    /// Style the buffer was shaped with.
    pub style: TextStyle,
    /// Screen placement.
    pub position: TextPosition,
    /// Extra scale applied when drawing.
    pub scale: f32,
    /// Hidden buffers are skipped in `prepare`.
    pub visible: bool,
    /// Text currently shaped into the buffer.
    pub text_content: String,
}

/// Renders the HUD text buffers with glyphon.
pub struct TextRenderer {
    /// Loaded fonts.
    pub font_system: FontSystem,
    /// Rasterised glyph cache.
    pub swash_cache: SwashCache,
    /// Screen resolution uniform.
    pub viewport: Viewport,
    /// Glyph texture atlas.
    pub atlas: TextAtlas,
    /// Glyphon draw pipeline.
    pub text_renderer: GlyphonTextRenderer,
    /// HUD buffers by id.
    pub text_buffers: HashMap<String, TextBuffer>,
    /// DPI scale of the window.
    pub window_scale_factor: f32,
    /// Current window size in physical pixels.
    pub window_size: winit::dpi::PhysicalSize<u32>,
}

/// Where each HUD buffer goes in a `width` x `height` window.
pub fn hud_layout(width: u32, height: u32) -> [(&'static str, TextPosition); 7] {
    let (w, h) = (width as f32, height as f32);
    let full_width = |y: f32, max_height: f32| TextPosition {
        x: 0.0,
        y,
        max_width: Some(w),
        max_height: Some(max_height),
    };

    [
        (
            TREES_CHOPPED,
            TextPosition {
                x: 20.0,
                y: 20.0,
                max_width: Some(300.0),
                max_height: Some(30.0),
            },
        ),
        (
            QUEST,
            TextPosition {
                x: 20.0,
                y: 50.0,
                max_width: Some(300.0),
                max_height: Some(30.0),
            },
        ),
        (
            FPS,
            TextPosition {
                x: (w - 120.0).max(0.0),
                y: 20.0,
                max_width: Some(110.0),
                max_height: Some(30.0),
            },
        ),
        (COUNTDOWN, full_width(h * 0.5 + 40.0, 40.0)),
        (DIALOGUE, full_width((h - 110.0).max(0.0), 90.0)),
        (TITLE, full_width(h * 0.3, 120.0)),
        (PROMPT, full_width(h * 0.3 + 110.0, 40.0)),
    ]
}

fn hud_style(id: &str) -> TextStyle {
    let centered = Some(Align::Center);
    match id {
        TITLE => TextStyle {
            font_size: 72.0,
            line_height: 90.0,
            weight: Weight::BOLD,
            align: centered,
            ..Default::default()
        },
        PROMPT => TextStyle {
            font_size: 24.0,
            line_height: 30.0,
            align: centered,
            ..Default::default()
        },
        COUNTDOWN => TextStyle {
            font_size: 28.0,
            line_height: 34.0,
            color: Color::rgb(255, 230, 120),
            weight: Weight::BOLD,
            align: centered,
            ..Default::default()
        },
        DIALOGUE => TextStyle {
            font_size: 18.0,
            line_height: 26.0,
            color: Color::rgb(255, 255, 200),
            align: centered,
            ..Default::default()
        },
        FPS => TextStyle {
            font_size: 14.0,
            line_height: 18.0,
            color: Color::rgb(230, 230, 230),
            ..Default::default()
        },
        _ => TextStyle {
            font_size: 18.0,
            line_height: 24.0,
            weight: Weight::BOLD,
            ..Default::default()
        },
    }
}

impl TextRenderer {
    /// Creates the font system, atlas and glyphon pipeline.
    pub fn new(
        device: &Device,
        queue: &Queue,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, surface_format);
        let text_renderer =
            GlyphonTextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            text_renderer,
            text_buffers: HashMap::new(),
            window_scale_factor: window.scale_factor() as f32,
            window_size: window.inner_size(),
        }
    }

    /// Creates every HUD buffer, empty and hidden.
    pub fn initialize_hud(&mut self, width: u32, height: u32) {
        for (id, position) in hud_layout(width, height) {
            self.create_text_buffer(id, "", Some(hud_style(id)), Some(position));
            self.set_visible(id, false);
        }
        log::debug!("Created {} HUD text buffers", self.text_buffers.len());
    }

    /// Moves the HUD buffers to fit a resized window.
    pub fn resize_hud(&mut self, width: u32, height: u32) {
        self.window_size = winit::dpi::PhysicalSize::new(width, height);
        for (id, position) in hud_layout(width, height) {
            if let Err(e) = self.update_position(id, position) {
                log::warn!("Failed to move {id} text: {e}");
            }
        }
    }

    /// Copies one frame of HUD text into the buffers.
    pub fn apply_hud(&mut self, hud: &HudText) {
        self.show_text(TREES_CHOPPED, Some(&hud.trees_chopped));
        self.show_text(QUEST, hud.quest.as_deref());
        self.show_text(COUNTDOWN, hud.countdown.as_deref());
        let dialogue = hud.dialogue.map(|lines| lines.join("\n"));
        self.show_text(DIALOGUE, dialogue.as_deref());
        self.show_text(TITLE, hud.title.map(|[title, _]| title));
        self.show_text(PROMPT, hud.title.map(|[_, prompt]| prompt));
        self.show_text(FPS, Some(&hud.fps));

        if let Some(title) = self.text_buffers.get_mut(TITLE) {
            title.scale = hud.title_scale;
        }
    }

    fn show_text(&mut self, id: &str, text: Option<&str>) {
        match text {
            Some(text) => {
                if let Err(e) = self.update_text(id, text) {
                    log::warn!("Failed to update {id} text: {e}");
                }
                self.set_visible(id, true);
            }
            None => self.set_visible(id, false),
        }
    }

    /// Shows or hides a buffer by id.
    pub fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(text_buffer) = self.text_buffers.get_mut(id) {
            text_buffer.visible = visible;
        }
    }

    /// Create a new text buffer with the given ID, text, style, and position
    pub fn create_text_buffer(
        &mut self,
        id: &str,
        text: &str,
        style: Option<TextStyle>,
        position: Option<TextPosition>,
    ) {
        let style = style.unwrap_or_default();
        let position = position.unwrap_or_default();

        let metrics = Metrics::new(style.font_size, style.line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        let width = position.max_width.unwrap_or(self.window_size.width as f32);
        let height = position
            .max_height
            .unwrap_or(self.window_size.height as f32);
        buffer.set_size(&mut self.font_system, Some(width), Some(height));

        set_buffer_text(&mut self.font_system, &mut buffer, &style, text);

        let text_buffer = TextBuffer {
            buffer,
            style,
            position,
            scale: 1.0,
            visible: true,
            text_content: text.to_string(),
        };

        self.text_buffers.insert(id.to_string(), text_buffer);
    }

    /// Update the text content of an existing buffer
    pub fn update_text(&mut self, id: &str, text: &str) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        if text_buffer.text_content == text {
            return Ok(());
        }

        set_buffer_text(
            &mut self.font_system,
            &mut text_buffer.buffer,
            &text_buffer.style,
            text,
        );
        text_buffer.text_content = text.to_string();
        Ok(())
    }

    /// Update the position of an existing buffer
    pub fn update_position(&mut self, id: &str, position: TextPosition) -> Result<(), String> {
        let text_buffer = self
            .text_buffers
            .get_mut(id)
            .ok_or_else(|| format!("Text buffer '{}' not found", id))?;

        if text_buffer.position.max_width != position.max_width
            || text_buffer.position.max_height != position.max_height
        {
            let width = position.max_width.unwrap_or(self.window_size.width as f32);
            let height = position
                .max_height
                .unwrap_or(self.window_size.height as f32);
            text_buffer
                .buffer
                .set_size(&mut self.font_system, Some(width), Some(height));
            text_buffer
                .buffer
                .shape_until_scroll(&mut self.font_system, false);
        }

        text_buffer.position = position;
        Ok(())
    }

    /// Resize the viewport
    pub fn resize(&mut self, queue: &Queue, resolution: Resolution) {
        self.viewport.update(queue, resolution);
    }

    /// Prepare text rendering for the current frame
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface_config: &SurfaceConfiguration,
    ) -> Result<(), glyphon::PrepareError> {
        let text_areas: Vec<TextArea> = self
            .text_buffers
            .values()
            .filter(|buffer| buffer.visible)
            .map(|buffer| {
                let width = buffer
                    .position
                    .max_width
                    .unwrap_or(surface_config.width as f32);
                let height = buffer
                    .position
                    .max_height
                    .unwrap_or(surface_config.height as f32);
                // Centred text grows about the middle of its buffer when scaled.
                let left = match buffer.style.align {
                    Some(Align::Center) => buffer.position.x + width * (1.0 - buffer.scale) / 2.0,
                    _ => buffer.position.x,
                };

                TextArea {
                    buffer: &buffer.buffer,
                    left,
                    top: buffer.position.y,
                    scale: buffer.scale * self.window_scale_factor,
                    bounds: TextBounds {
                        left: 0,
                        top: buffer.position.y as i32,
                        right: surface_config.width as i32,
                        bottom: (buffer.position.y + height * buffer.scale.max(1.0)) as i32,
                    },
                    default_color: buffer.style.color,
                    custom_glyphs: &[],
                }
            })
            .collect();

        self.text_renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )
    }

    /// Render all visible text buffers
    pub fn render(&mut self, render_pass: &mut RenderPass) -> Result<(), glyphon::RenderError> {
        self.text_renderer
            .render(&self.atlas, &self.viewport, render_pass)
    }

    /// Trim the atlas to free up unused space
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}

fn set_buffer_text(font_system: &mut FontSystem, buffer: &mut Buffer, style: &TextStyle, text: &str) {
    let attrs = Attrs::new()
        .family(Family::Name(&style.font_family))
        .weight(style.weight)
        .style(style.style);

    buffer.set_text(font_system, text, attrs, Shaping::Advanced);
    if style.align.is_some() {
        for line in buffer.lines.iter_mut() {
            line.set_align(style.align);
        }
    }
    buffer.shape_until_scroll(font_system, false);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every buffer `apply_hud` touches has a place on screen.
    #[test]
    fn test_layout_names_every_buffer() {
        let ids: Vec<&str> = hud_layout(800, 600).iter().map(|(id, _)| *id).collect();
        for id in [TREES_CHOPPED, QUEST, COUNTDOWN, DIALOGUE, TITLE, PROMPT, FPS] {
            assert!(ids.contains(&id), "{id} missing from layout");
        }
    }

    /// The counter stays top-left and the FPS readout tracks the right edge.
    #[test]
    fn test_layout_follows_window_size() {
        let small = hud_layout(800, 600);
        let large = hud_layout(1600, 1200);
        let find = |layout: &[(&str, TextPosition)], id: &str| {
            layout.iter().find(|(name, _)| *name == id).map(|(_, p)| p.clone()).unwrap()
        };

        assert_eq!(find(&small, TREES_CHOPPED), find(&large, TREES_CHOPPED));
        assert_eq!(find(&small, FPS).x, 680.0);
        assert_eq!(find(&large, FPS).x, 1480.0);
        assert_eq!(find(&large, TITLE).max_width, Some(1600.0));
    }

    #[test]
    fn test_centred_styles() {
        assert_eq!(hud_style(TITLE).align, Some(Align::Center));
        assert_eq!(hud_style(DIALOGUE).align, Some(Align::Center));
        assert_eq!(hud_style(TREES_CHOPPED).align, None);
    }
}
