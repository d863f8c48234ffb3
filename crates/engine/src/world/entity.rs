use serde::Serialize;

use super::collision::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Movement directions, in velocity slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterType {
    pub name: &'static str,
    pub max_speed: f32,
    pub width: f32,
    pub height: f32,
    pub blocking: bool,
}

/// Registry of spawnable character types.
#[derive(Debug, Clone)]
pub struct CharacterTypes {
    types: Vec<CharacterType>,
}

impl Default for CharacterTypes {
    fn default() -> Self {
        Self {
            types: vec![
                CharacterType {
                    name: "player",
                    max_speed: 5.0,
                    width: 50.0,
                    height: 50.0,
                    blocking: true,
                },
                CharacterType {
                    name: "villager",
                    max_speed: 3.0,
                    width: 50.0,
                    height: 50.0,
                    blocking: true,
                },
                CharacterType {
                    name: "guard",
                    max_speed: 4.0,
                    width: 50.0,
                    height: 50.0,
                    blocking: true,
                },
            ],
        }
    }
}

impl CharacterTypes {
    pub fn find(&self, name: &str) -> Option<&CharacterType> {
        self.types.iter().find(|ty| ty.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.iter().map(|ty| ty.name)
    }

    pub fn register(&mut self, character_type: CharacterType) {
        self.types.retain(|ty| ty.name != character_type.name);
        self.types.push(character_type);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Character {
    pub id: EntityId,
    pub type_name: &'static str,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    /// Per-direction speed, indexed by `Direction::index`.
    pub velocities: [f32; 4],
    pub max_speed: f32,
    pub blocking: bool,
    pub width: f32,
    pub height: f32,
    pub is_player: bool,
    pub visible: bool,
    /// Set by an explicit stop; frozen characters get no autonomous retargeting.
    pub frozen: bool,
}

impl Character {
    pub fn new(id: EntityId, character_type: &CharacterType, x: f32, y: f32) -> Self {
        Self {
            id,
            type_name: character_type.name,
            x,
            y,
            target_x: x,
            target_y: y,
            velocities: [0.0; 4],
            max_speed: character_type.max_speed,
            blocking: character_type.blocking,
            width: character_type.width,
            height: character_type.height,
            is_player: false,
            visible: false,
            frozen: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn position(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn target(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.target_x,
            Axis::Y => self.target_y,
        }
    }

    pub fn set_position(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    pub fn set_target(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.target_x = value,
            Axis::Y => self.target_y = value,
        }
    }

    /// Box the character would occupy with `axis` moved to `value`.
    pub fn rect_with(&self, axis: Axis, value: f32) -> Rect {
        match axis {
            Axis::X => Rect::new(value, self.y, self.width, self.height),
            Axis::Y => Rect::new(self.x, value, self.width, self.height),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.x == self.target_x && self.y == self.target_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Crate,
    Barrel,
    Lantern,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Crate, ItemKind::Barrel, ItemKind::Lantern];

    pub const fn emits_light(self) -> bool {
        matches!(self, ItemKind::Lantern)
    }

    pub const fn blocking(self) -> bool {
        matches!(self, ItemKind::Crate | ItemKind::Barrel)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: EntityId,
    pub kind: ItemKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub blocking: bool,
    pub emits_light: bool,
    pub visible: bool,
}

impl Item {
    pub fn new(id: EntityId, kind: ItemKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            width,
            height,
            blocking: kind.blocking(),
            emits_light: kind.emits_light(),
            visible: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
