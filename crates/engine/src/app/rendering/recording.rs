use crate::world::{Tile, TileKind};

use super::{Glow, Layer, RenderSurface, ScreenRect, SpriteRef};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Layer),
    Tile { kind: TileKind, rect: ScreenRect },
    Sprite { sprite: SpriteRef, rect: ScreenRect },
    Circle { x: f32, y: f32, radius: f32, glow: Glow },
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawLog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn tile_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Tile { .. }))
            .count()
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Sprite { .. }))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Circle { .. }))
            .count()
    }
}

impl RenderSurface for DrawLog {
    fn viewport_width(&self) -> u32 {
        self.width
    }

    fn viewport_height(&self) -> u32 {
        self.height
    }

    fn clear_region(&mut self, layer: Layer) {
        self.commands.push(DrawCommand::Clear(layer));
    }

    fn draw_tile(&mut self, tile: &Tile, rect: ScreenRect) {
        self.commands.push(DrawCommand::Tile {
            kind: tile.kind,
            rect,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteRef, rect: ScreenRect) {
        self.commands.push(DrawCommand::Sprite { sprite, rect });
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, glow: Glow) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            glow,
        });
    }
}
