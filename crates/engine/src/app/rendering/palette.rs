use crate::world::{ItemKind, TileKind};

use super::SpriteRef;

pub const BACKGROUND_COLOR: [u8; 4] = [14, 16, 20, 255];
pub const SHADOW_COLOR: [u8; 4] = [0, 0, 0, 255];

pub fn tile_color(kind: TileKind) -> [u8; 4] {
    match kind {
        TileKind::Grass => [74, 112, 56, 255],
        TileKind::Water => [46, 92, 160, 255],
        TileKind::Rock => [110, 108, 104, 255],
        TileKind::Tree => [34, 72, 38, 255],
        TileKind::Torch => [196, 142, 64, 255],
    }
}

pub fn sprite_color(sprite: SpriteRef) -> [u8; 4] {
    match sprite {
        SpriteRef::Character {
            is_player: true, ..
        } => [80, 220, 255, 255],
        SpriteRef::Character { type_name, .. } => match type_name {
            "guard" => [200, 70, 70, 255],
            "villager" => [226, 196, 150, 255],
            _ => [220, 220, 240, 255],
        },
        SpriteRef::Item(ItemKind::Crate) => [140, 100, 60, 255],
        SpriteRef::Item(ItemKind::Barrel) => [120, 76, 44, 255],
        SpriteRef::Item(ItemKind::Lantern) => [255, 230, 120, 255],
    }
}
