use std::collections::HashMap;

use thiserror::Error;

use super::tile::{Tile, TileCodec, TileCodecError, TileKey};
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error(transparent)]
    Codec(#[from] TileCodecError),
}

/// Lazily materialized terrain.
///
/// A cell is materialized the first time it is read: one draw picks its kind, the encoded
/// key is cached, and the key is never rewritten afterwards. A cached `None` is grass; a
/// missing entry has not been seen yet.
#[derive(Debug, Clone)]
pub struct SparseGrid {
    x_tiles: u32,
    y_tiles: u32,
    tile_width: f32,
    tile_height: f32,
    cells: HashMap<usize, Option<TileKey>>,
}

impl SparseGrid {
    pub fn new(x_tiles: u32, y_tiles: u32, tile_width: f32, tile_height: f32) -> Self {
        Self {
            x_tiles,
            y_tiles,
            tile_width,
            tile_height,
            cells: HashMap::new(),
        }
    }

    pub fn x_tiles(&self) -> u32 {
        self.x_tiles
    }

    pub fn y_tiles(&self) -> u32 {
        self.y_tiles
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    pub fn pixel_width(&self) -> f32 {
        self.x_tiles as f32 * self.tile_width
    }

    pub fn pixel_height(&self) -> f32 {
        self.y_tiles as f32 * self.tile_height
    }

    /// Row-major index with `y_tiles` as the row stride. Only injective while
    /// `x_tiles <= y_tiles`; `WorldConfig::validate` rejects wider grids.
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.y_tiles as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.x_tiles && y < self.y_tiles
    }

    pub fn is_materialized(&self, x: u32, y: u32) -> bool {
        self.contains(x, y) && self.cells.contains_key(&self.index_of(x, y))
    }

    pub fn materialized_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of materialized cells that hold a stored key (everything except grass).
    pub fn stored_key_count(&self) -> usize {
        self.cells.values().filter(|key| key.is_some()).count()
    }

    pub fn key_at(&self, x: u32, y: u32) -> Option<Option<TileKey>> {
        if !self.contains(x, y) {
            return None;
        }
        self.cells.get(&self.index_of(x, y)).copied()
    }

    pub fn get(&mut self, x: u32, y: u32, rng: &mut dyn RandomSource) -> Result<Tile, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.x_tiles,
                height: self.y_tiles,
            });
        }
        let index = self.index_of(x, y);
        let key = *self.cells.entry(index).or_insert_with(|| {
            let kind = TileCodec::choose_kind(rng.next_unit());
            TileCodec::encode_default(kind)
        });
        let attributes = TileCodec::decode(key)?;
        Ok(Tile::from_attributes(
            attributes,
            x,
            y,
            self.tile_width,
            self.tile_height,
        ))
    }
}
