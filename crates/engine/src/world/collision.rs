use serde::Serialize;

use super::entity::Item;
use super::tile::Tile;

/// Axis-aligned box in world pixels; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrinks the box by `inset` on every side.
    pub fn inset(&self, inset: f32) -> Rect {
        Rect {
            x: self.x + inset,
            y: self.y + inset,
            width: (self.width - 2.0 * inset).max(0.0),
            height: (self.height - 2.0 * inset).max(0.0),
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }

    pub fn within(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

/// Blocking geometry for one movement check.
///
/// Only the tiles and items that are currently visible take part; anything outside the
/// visibility window cannot block.
#[derive(Debug, Clone, Copy)]
pub struct CollisionIndex<'a> {
    world_width: f32,
    world_height: f32,
    hitbox_inset: f32,
    tiles: &'a [Tile],
    items: &'a [Item],
}

impl<'a> CollisionIndex<'a> {
    pub fn new(
        world_width: f32,
        world_height: f32,
        hitbox_inset: f32,
        tiles: &'a [Tile],
        items: &'a [Item],
    ) -> Self {
        Self {
            world_width,
            world_height,
            hitbox_inset,
            tiles,
            items,
        }
    }

    pub fn would_collide(&self, body: Rect) -> bool {
        let hitbox = body.inset(self.hitbox_inset);
        if !hitbox.within(self.world_width, self.world_height) {
            return true;
        }

        let tile_hit = self.tiles.iter().any(|tile| {
            tile.blocking && hitbox.overlaps(&Rect::new(tile.px, tile.py, tile.width, tile.height))
        });
        if tile_hit {
            return true;
        }

        self.items
            .iter()
            .any(|item| item.visible && item.blocking && hitbox.overlaps(&item.rect()))
    }
}
