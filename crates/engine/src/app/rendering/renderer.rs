use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::world::Tile;

use super::palette::{sprite_color, tile_color, BACKGROUND_COLOR, SHADOW_COLOR};
use super::raster::{fill, fill_rect, LightMask};
use super::{Glow, Layer, RenderSurface, ScreenRect, SpriteRef};

const SHADOW_STRIP_FRACTION: f32 = 0.2;
const SPRITE_INSET_PX: f32 = 6.0;

/// RGBA frame buffer renderer on top of `pixels`, with a darkness mask for lighting.
pub struct PixelsRenderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    lighting: LightMask,
}

impl PixelsRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
            lighting: LightMask::new(size.width, size.height),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        self.lighting.resize(width, height);
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Multiplies the lighting mask into the frame and hands it to the GPU.
    pub fn present(&mut self) -> Result<(), Error> {
        self.lighting.apply(self.pixels.frame_mut());
        self.pixels.render()
    }
}

impl RenderSurface for PixelsRenderer {
    fn viewport_width(&self) -> u32 {
        self.width
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }

    fn clear_region(&mut self, layer: Layer) {
        match layer {
            Layer::World => fill(self.pixels.frame_mut(), BACKGROUND_COLOR),
            Layer::Lighting => self.lighting.reset(),
        }
    }

    fn draw_tile(&mut self, tile: &Tile, rect: ScreenRect) {
        if !rect.intersects_viewport(self.width, self.height) {
            return;
        }
        let (width, height) = (self.width, self.height);
        let frame = self.pixels.frame_mut();
        fill_rect(frame, width, height, rect, tile_color(tile.kind));
        if tile.casts_shadow {
            let strip = rect.height * SHADOW_STRIP_FRACTION;
            let shadow = ScreenRect {
                y: rect.y + rect.height - strip,
                height: strip,
                ..rect
            };
            fill_rect(frame, width, height, shadow, SHADOW_COLOR);
        }
    }

    fn draw_sprite(&mut self, sprite: SpriteRef, rect: ScreenRect) {
        if !rect.intersects_viewport(self.width, self.height) {
            return;
        }
        let body = ScreenRect {
            x: rect.x + SPRITE_INSET_PX,
            y: rect.y + SPRITE_INSET_PX,
            width: (rect.width - 2.0 * SPRITE_INSET_PX).max(1.0),
            height: (rect.height - 2.0 * SPRITE_INSET_PX).max(1.0),
        };
        let (width, height) = (self.width, self.height);
        fill_rect(self.pixels.frame_mut(), width, height, body, sprite_color(sprite));
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, glow: Glow) {
        self.lighting.carve(x, y, radius, glow.intensity);
    }
}
