use serde::Serialize;
use thiserror::Error;

/// Terrain kinds. The discriminant order is the kind table index used in packed keys and
/// must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Grass,
    Water,
    Rock,
    Tree,
    Torch,
}

const KIND_TABLE: [TileKind; 5] = [
    TileKind::Grass,
    TileKind::Water,
    TileKind::Rock,
    TileKind::Tree,
    TileKind::Torch,
];

const GRASS_THRESHOLD: f64 = 0.90;
const WATER_THRESHOLD: f64 = 0.95;
const ROCK_THRESHOLD: f64 = 0.98;
const TREE_THRESHOLD: f64 = 0.995;

impl TileKind {
    pub const fn index(self) -> u32 {
        match self {
            TileKind::Grass => 0,
            TileKind::Water => 1,
            TileKind::Rock => 2,
            TileKind::Tree => 3,
            TileKind::Torch => 4,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        KIND_TABLE.get(index as usize).copied()
    }

    pub fn as_token(self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Water => "water",
            TileKind::Rock => "rock",
            TileKind::Tree => "tree",
            TileKind::Torch => "torch",
        }
    }

    /// Grass, water and rock never go through the packed encoding.
    pub const fn is_sentinel(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Water | TileKind::Rock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileAttributes {
    pub kind: TileKind,
    pub blocking: bool,
    pub casts_shadow: bool,
    pub emits_light: bool,
}

impl TileAttributes {
    const GRASS: Self = Self {
        kind: TileKind::Grass,
        blocking: false,
        casts_shadow: false,
        emits_light: false,
    };
    const WATER: Self = Self {
        kind: TileKind::Water,
        blocking: true,
        casts_shadow: false,
        emits_light: false,
    };
    const ROCK: Self = Self {
        kind: TileKind::Rock,
        blocking: true,
        casts_shadow: true,
        emits_light: false,
    };
}

/// A materialized cell with its grid and pixel placement attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tile {
    pub kind: TileKind,
    pub blocking: bool,
    pub casts_shadow: bool,
    pub emits_light: bool,
    pub tx: u32,
    pub ty: u32,
    pub px: f32,
    pub py: f32,
    pub width: f32,
    pub height: f32,
}

impl Tile {
    pub fn from_attributes(
        attributes: TileAttributes,
        tx: u32,
        ty: u32,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            kind: attributes.kind,
            blocking: attributes.blocking,
            casts_shadow: attributes.casts_shadow,
            emits_light: attributes.emits_light,
            tx,
            ty,
            px: tx as f32 * width,
            py: ty as f32 * height,
            width,
            height,
        }
    }

    pub fn attributes(&self) -> TileAttributes {
        TileAttributes {
            kind: self.kind,
            blocking: self.blocking,
            casts_shadow: self.casts_shadow,
            emits_light: self.emits_light,
        }
    }
}

/// Stored form of a non-grass cell. Grass has no key at all (`None` in the grid).
///
/// `Water` and `Rock` stand in for the one-character and empty-string sentinels of the
/// compact encoding; every other kind is a five-digit decimal
/// `[presence, kind, blocking, light, shadow]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKey {
    Water,
    Rock,
    Packed(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileCodecError {
    #[error("tile key {key} is not a valid packed key")]
    InvalidKey { key: u32 },
}

const PRESENCE_MARKER: u32 = 1;
const PACKED_MIN: u32 = 10_000;
const PACKED_MAX: u32 = 19_999;

pub struct TileCodec;

impl TileCodec {
    pub fn encode(kind: TileKind, blocking: bool, light: bool, shadow: bool) -> Option<TileKey> {
        match kind {
            TileKind::Grass => None,
            TileKind::Water => Some(TileKey::Water),
            TileKind::Rock => Some(TileKey::Rock),
            TileKind::Tree | TileKind::Torch => {
                let digits = [
                    PRESENCE_MARKER,
                    kind.index(),
                    u32::from(blocking),
                    u32::from(light),
                    u32::from(shadow),
                ];
                Some(TileKey::Packed(
                    digits.iter().fold(0, |acc, digit| acc * 10 + digit),
                ))
            }
        }
    }

    pub fn decode(key: Option<TileKey>) -> Result<TileAttributes, TileCodecError> {
        match key {
            None => Ok(TileAttributes::GRASS),
            Some(TileKey::Water) => Ok(TileAttributes::WATER),
            Some(TileKey::Rock) => Ok(TileAttributes::ROCK),
            Some(TileKey::Packed(packed)) => Self::decode_packed(packed),
        }
    }

    fn decode_packed(packed: u32) -> Result<TileAttributes, TileCodecError> {
        let invalid = TileCodecError::InvalidKey { key: packed };
        if !(PACKED_MIN..=PACKED_MAX).contains(&packed) {
            return Err(invalid);
        }
        let digit = |position: u32| (packed / 10u32.pow(position)) % 10;
        let flag = |position: u32| match digit(position) {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(invalid),
        };

        let kind = TileKind::from_index(digit(3)).ok_or(invalid)?;
        if kind.is_sentinel() {
            return Err(invalid);
        }
        Ok(TileAttributes {
            kind,
            blocking: flag(2)?,
            emits_light: flag(1)?,
            casts_shadow: flag(0)?,
        })
    }

    /// Categorical terrain pick from a single uniform draw.
    pub fn choose_kind(draw: f64) -> TileKind {
        if draw < GRASS_THRESHOLD {
            TileKind::Grass
        } else if draw < WATER_THRESHOLD {
            TileKind::Water
        } else if draw < ROCK_THRESHOLD {
            TileKind::Rock
        } else if draw < TREE_THRESHOLD {
            TileKind::Tree
        } else {
            TileKind::Torch
        }
    }

    pub fn default_attributes(kind: TileKind) -> TileAttributes {
        match kind {
            TileKind::Grass => TileAttributes::GRASS,
            TileKind::Water => TileAttributes::WATER,
            TileKind::Rock => TileAttributes::ROCK,
            TileKind::Tree => TileAttributes {
                kind,
                blocking: true,
                casts_shadow: true,
                emits_light: false,
            },
            TileKind::Torch => TileAttributes {
                kind,
                blocking: true,
                casts_shadow: false,
                emits_light: true,
            },
        }
    }

    pub fn encode_default(kind: TileKind) -> Option<TileKey> {
        let attributes = Self::default_attributes(kind);
        Self::encode(
            kind,
            attributes.blocking,
            attributes.emits_light,
            attributes.casts_shadow,
        )
    }
}
