mod collision;
mod entity;
mod grid;
mod map;
mod tile;
mod visibility;

pub use collision::{CollisionIndex, Rect};
pub use entity::{
    Axis, Character, CharacterType, CharacterTypes, Direction, EntityId, EntityIdAllocator, Item,
    ItemKind,
};
pub use grid::{GridError, SparseGrid};
pub use map::{
    ConfigError, LightSource, WorldConfig, WorldError, WorldMap, WorldSnapshot, PLAYER_TYPE,
};
pub use tile::{Tile, TileAttributes, TileCodec, TileCodecError, TileKey, TileKind};
pub use visibility::{TileWindow, VisibilityWindow};
