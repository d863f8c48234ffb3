mod palette;
mod raster;
mod recording;
mod renderer;

pub use palette::{sprite_color, tile_color};
pub use recording::{DrawCommand, DrawLog};
pub use renderer::PixelsRenderer;

use crate::app::Camera;
use crate::world::{ItemKind, Rect, Tile};

/// Independently cleared drawing layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Terrain, items and characters, composited in draw order.
    World,
    /// Darkness mask that light circles carve into.
    Lighting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn from_world(camera: &Camera, rect: Rect) -> Self {
        let (x, y) = camera.to_screen(rect.x, rect.y);
        Self {
            x,
            y,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn intersects_viewport(&self, width: u32, height: u32) -> bool {
        self.x + self.width > 0.0
            && self.y + self.height > 0.0
            && self.x < width as f32
            && self.y < height as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteRef {
    Character {
        type_name: &'static str,
        is_player: bool,
    },
    Item(ItemKind),
}

/// Light contribution of one circle: full `intensity` at the centre fading to none at the rim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub intensity: f32,
}

impl Default for Glow {
    fn default() -> Self {
        Self { intensity: 0.85 }
    }
}

/// Drawing capability handed to scenes.
pub trait RenderSurface {
    fn viewport_width(&self) -> u32;
    fn viewport_height(&self) -> u32;
    fn clear_region(&mut self, layer: Layer);
    fn draw_tile(&mut self, tile: &Tile, rect: ScreenRect);
    fn draw_sprite(&mut self, sprite: SpriteRef, rect: ScreenRect);
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, glow: Glow);
}
