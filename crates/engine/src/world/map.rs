use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::collision::{CollisionIndex, Rect};
use super::entity::{
    Character, CharacterType, CharacterTypes, EntityId, EntityIdAllocator, Item, ItemKind,
};
use super::grid::{GridError, SparseGrid};
use super::tile::Tile;
use super::visibility::VisibilityWindow;
use crate::app::Camera;
use crate::random::RandomSource;

pub const PLAYER_TYPE: &str = "player";
const ITEM_SIZE_PX: f32 = 50.0;
const NPC_TYPES: [&str; 2] = ["villager", "guard"];
const SPAWN_ATTEMPTS: u32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub x_tiles: u32,
    pub y_tiles: u32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub visibility_radius: u32,
    pub npc_count: u32,
    pub item_count: u32,
    pub hitbox_inset: f32,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            x_tiles: 500,
            y_tiles: 500,
            tile_width: 50.0,
            tile_height: 50.0,
            visibility_radius: 12,
            npc_count: 40,
            item_count: 60,
            hitbox_inset: 10.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("x_tiles ({x_tiles}) must not exceed y_tiles ({y_tiles}); the cell index strides by y_tiles")]
    AliasingGrid { x_tiles: u32, y_tiles: u32 },
    #[error("hitbox_inset {inset} leaves no hitbox inside a {tile_width}x{tile_height} tile")]
    InsetTooLarge {
        inset: f32,
        tile_width: f32,
        tile_height: f32,
    },
    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x_tiles == 0 {
            return Err(ConfigError::NotPositive { field: "x_tiles" });
        }
        if self.y_tiles == 0 {
            return Err(ConfigError::NotPositive { field: "y_tiles" });
        }
        if self.x_tiles > self.y_tiles {
            return Err(ConfigError::AliasingGrid {
                x_tiles: self.x_tiles,
                y_tiles: self.y_tiles,
            });
        }
        for (field, value) in [
            ("tile_width", self.tile_width),
            ("tile_height", self.tile_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field });
            }
        }
        if !self.hitbox_inset.is_finite() || self.hitbox_inset < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "hitbox_inset",
                value: self.hitbox_inset,
            });
        }
        if self.hitbox_inset * 2.0 >= self.tile_width.min(self.tile_height) {
            return Err(ConfigError::InsetTooLarge {
                inset: self.hitbox_inset,
                tile_width: self.tile_width,
                tile_height: self.tile_height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("no character with id {id:?}")]
    CharacterNotFound { id: EntityId },
    #[error("no character of type '{type_name}'")]
    CharacterTypeNotSpawned { type_name: String },
    #[error("no item with id {id:?}")]
    ItemNotFound { id: EntityId },
    #[error("unknown character type '{name}'")]
    UnknownCharacterType { name: String },
    #[error("invalid world config: {0}")]
    Config(#[from] ConfigError),
    #[error("no open spawn tile for a {width}x{height} body after {attempts} attempts")]
    NoOpenSpawn {
        width: f32,
        height: f32,
        attempts: u32,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// A point light for the lighting overlay, in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSource {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub x_tiles: u32,
    pub y_tiles: u32,
    pub materialized_tiles: usize,
    pub stored_tile_keys: usize,
    pub focal_tile: Option<(i64, i64)>,
    pub visible_tiles: usize,
    pub needs_redraw: bool,
    pub followed: Option<EntityId>,
    pub characters: Vec<Character>,
    pub items: Vec<Item>,
}

/// Terrain, visibility cache and every entity of one session.
///
/// The map owns its characters and items exclusively; nothing is despawned while it lives.
#[derive(Debug)]
pub struct WorldMap {
    config: WorldConfig,
    grid: SparseGrid,
    window: VisibilityWindow,
    character_types: CharacterTypes,
    characters: Vec<Character>,
    items: Vec<Item>,
    ids: EntityIdAllocator,
    followed: Option<EntityId>,
    needs_redraw: bool,
}

impl WorldMap {
    pub fn new(config: WorldConfig, character_types: CharacterTypes) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: SparseGrid::new(
                config.x_tiles,
                config.y_tiles,
                config.tile_width,
                config.tile_height,
            ),
            window: VisibilityWindow::new(config.visibility_radius),
            config,
            character_types,
            characters: Vec::new(),
            items: Vec::new(),
            ids: EntityIdAllocator::default(),
            followed: None,
            needs_redraw: true,
        })
    }

    /// Builds a populated map: the followed player first, then NPCs, then items.
    pub fn generate(
        config: WorldConfig,
        character_types: CharacterTypes,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, WorldError> {
        let npc_count = config.npc_count;
        let item_count = config.item_count;
        let mut map = Self::new(config, character_types)?;

        let player = map.spawn_character(PLAYER_TYPE, None, rng)?;
        map.set_followed(Some(player));
        for index in 0..npc_count {
            let type_name = NPC_TYPES[index as usize % NPC_TYPES.len()];
            map.spawn_character(type_name, None, rng)?;
        }
        for index in 0..item_count {
            let kind = ItemKind::ALL[index as usize % ItemKind::ALL.len()];
            map.spawn_item(kind, None, rng)?;
        }

        info!(
            x_tiles = map.config.x_tiles,
            y_tiles = map.config.y_tiles,
            characters = map.characters.len(),
            items = map.items.len(),
            "world_generated"
        );
        Ok(map)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &SparseGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut SparseGrid {
        &mut self.grid
    }

    pub fn visibility(&self) -> &VisibilityWindow {
        &self.window
    }

    pub fn visible_tiles(&self) -> &[Tile] {
        self.window.tiles()
    }

    pub fn character_types(&self) -> &CharacterTypes {
        &self.character_types
    }

    pub fn character_type(&self, name: &str) -> Result<&CharacterType, WorldError> {
        self.character_types
            .find(name)
            .ok_or_else(|| WorldError::UnknownCharacterType {
                name: name.to_string(),
            })
    }

    pub fn pixel_width(&self) -> f32 {
        self.grid.pixel_width()
    }

    pub fn pixel_height(&self) -> f32 {
        self.grid.pixel_height()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn set_needs_redraw(&mut self, needs_redraw: bool) {
        self.needs_redraw = needs_redraw;
    }

    pub fn followed(&self) -> Option<EntityId> {
        self.followed
    }

    pub fn set_followed(&mut self, followed: Option<EntityId>) {
        self.followed = followed;
    }

    pub fn is_followed(&self, id: EntityId) -> bool {
        self.followed == Some(id)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn character(&self, id: EntityId) -> Result<&Character, WorldError> {
        self.characters
            .iter()
            .find(|character| character.id == id)
            .ok_or(WorldError::CharacterNotFound { id })
    }

    pub fn character_mut(&mut self, id: EntityId) -> Result<&mut Character, WorldError> {
        self.characters
            .iter_mut()
            .find(|character| character.id == id)
            .ok_or(WorldError::CharacterNotFound { id })
    }

    /// First spawned character of the given type.
    pub fn character_by_type(&self, type_name: &str) -> Result<&Character, WorldError> {
        self.characters
            .iter()
            .find(|character| character.type_name == type_name)
            .ok_or_else(|| WorldError::CharacterTypeNotSpawned {
                type_name: type_name.to_string(),
            })
    }

    pub fn item(&self, id: EntityId) -> Result<&Item, WorldError> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or(WorldError::ItemNotFound { id })
    }

    pub fn player(&self) -> Option<&Character> {
        self.characters.iter().find(|character| character.is_player)
    }

    /// Spawns at `position`, or at a random tile-aligned spot when none is given.
    pub fn spawn_character(
        &mut self,
        type_name: &str,
        position: Option<(f32, f32)>,
        rng: &mut dyn RandomSource,
    ) -> Result<EntityId, WorldError> {
        let character_type = self.character_type(type_name)?.clone();
        let (x, y) = match position {
            Some(position) => position,
            None => self.random_position(character_type.width, character_type.height, rng)?,
        };
        let id = self.ids.allocate();
        let mut character = Character::new(id, &character_type, x, y);
        character.is_player = type_name == PLAYER_TYPE;
        self.characters.push(character);
        Ok(id)
    }

    pub fn spawn_item(
        &mut self,
        kind: ItemKind,
        position: Option<(f32, f32)>,
        rng: &mut dyn RandomSource,
    ) -> Result<EntityId, WorldError> {
        let (x, y) = match position {
            Some(position) => position,
            None => self.random_position(ITEM_SIZE_PX, ITEM_SIZE_PX, rng)?,
        };
        let id = self.ids.allocate();
        self.items
            .push(Item::new(id, kind, x, y, ITEM_SIZE_PX, ITEM_SIZE_PX));
        Ok(id)
    }

    /// Draws tile-aligned spots until one is open for a `width` x `height` body.
    fn random_position(
        &mut self,
        width: f32,
        height: f32,
        rng: &mut dyn RandomSource,
    ) -> Result<(f32, f32), WorldError> {
        let tile_width = self.config.tile_width;
        let tile_height = self.config.tile_height;
        let columns = ((self.pixel_width() - width) / tile_width).floor().max(0.0);
        let rows = ((self.pixel_height() - height) / tile_height).floor().max(0.0);
        for _ in 0..SPAWN_ATTEMPTS {
            let column = (rng.next_unit() as f32 * (columns + 1.0)).floor().min(columns);
            let row = (rng.next_unit() as f32 * (rows + 1.0)).floor().min(rows);
            let body = Rect::new(column * tile_width, row * tile_height, width, height);
            if self.is_open(body, rng)? {
                return Ok((body.x, body.y));
            }
        }
        Err(WorldError::NoOpenSpawn {
            width,
            height,
            attempts: SPAWN_ATTEMPTS,
        })
    }

    /// Whether `body`'s hitbox is clear of blocking terrain and every spawned entity.
    /// Materializes the terrain under the hitbox.
    fn is_open(&mut self, body: Rect, rng: &mut dyn RandomSource) -> Result<bool, WorldError> {
        let hitbox = body.inset(self.config.hitbox_inset);
        if !hitbox.within(self.pixel_width(), self.pixel_height()) {
            return Ok(false);
        }
        let occupied = self
            .characters
            .iter()
            .map(Character::rect)
            .chain(self.items.iter().map(Item::rect))
            .any(|rect| rect.inset(self.config.hitbox_inset).overlaps(&hitbox));
        if occupied {
            return Ok(false);
        }
        let (first_x, last_x) = tile_span(hitbox.x, hitbox.right(), self.config.tile_width);
        let (first_y, last_y) = tile_span(hitbox.y, hitbox.bottom(), self.config.tile_height);
        let last_x = last_x.min(self.config.x_tiles.saturating_sub(1));
        let last_y = last_y.min(self.config.y_tiles.saturating_sub(1));
        for ty in first_y..=last_y {
            for tx in first_x..=last_x {
                if self.grid.get(tx, ty, rng)?.blocking {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Recomputes the visible tile window around a focal point. Returns whether it changed.
    pub fn refresh_visibility(
        &mut self,
        focal_x: f32,
        focal_y: f32,
        rng: &mut dyn RandomSource,
    ) -> Result<bool, WorldError> {
        let changed = self
            .window
            .recompute(focal_x, focal_y, &mut self.grid, rng)?;
        if changed {
            self.needs_redraw = true;
        }
        Ok(changed)
    }

    pub fn invalidate_visibility(&mut self) {
        self.window.invalidate();
    }

    /// Updates every entity's `visible` flag against the camera's culling region.
    pub fn calculate_visible(&mut self, camera: &Camera) -> usize {
        let mut visible = 0;
        for character in &mut self.characters {
            character.visible = in_viewport(camera, character.rect());
            visible += usize::from(character.visible);
        }
        for item in &mut self.items {
            item.visible = in_viewport(camera, item.rect());
            visible += usize::from(item.visible);
        }
        visible
    }

    pub fn collision_index(&self) -> CollisionIndex<'_> {
        CollisionIndex::new(
            self.pixel_width(),
            self.pixel_height(),
            self.config.hitbox_inset,
            self.window.tiles(),
            &self.items,
        )
    }

    pub fn would_collide(&self, body: Rect) -> bool {
        self.collision_index().would_collide(body)
    }

    pub fn light_sources(&self) -> Vec<LightSource> {
        let tile_radius = self.config.tile_width.max(self.config.tile_height) * 1.5;
        let tiles = self
            .window
            .tiles()
            .iter()
            .filter(|tile| tile.emits_light)
            .map(|tile| LightSource {
                x: tile.px + tile.width / 2.0,
                y: tile.py + tile.height / 2.0,
                radius: tile_radius,
            });
        let items = self
            .items
            .iter()
            .filter(|item| item.visible && item.emits_light)
            .map(|item| LightSource {
                x: item.x + item.width / 2.0,
                y: item.y + item.height / 2.0,
                radius: item.width.max(item.height) * 2.0,
            });
        tiles.chain(items).collect()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            x_tiles: self.config.x_tiles,
            y_tiles: self.config.y_tiles,
            materialized_tiles: self.grid.materialized_count(),
            stored_tile_keys: self.grid.stored_key_count(),
            focal_tile: self.window.focal_tile(),
            visible_tiles: self.window.tiles().len(),
            needs_redraw: self.needs_redraw,
            followed: self.followed,
            characters: self.characters.clone(),
            items: self.items.clone(),
        }
    }
}

/// Inclusive range of tile indices covered by `[start, end)` along one axis.
fn tile_span(start: f32, end: f32, tile_size: f32) -> (u32, u32) {
    let first = (start / tile_size).floor().max(0.0) as u32;
    let last = ((end / tile_size).ceil() - 1.0).max(0.0) as u32;
    (first, last.max(first))
}

fn in_viewport(camera: &Camera, rect: Rect) -> bool {
    camera.in_viewport(rect.x, rect.y, rect.right(), rect.bottom())
}
