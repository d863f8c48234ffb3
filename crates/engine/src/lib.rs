//! Tile-world engine core: sparse procedural terrain, a dead-zone follow camera, visibility
//! culling, and eased character movement driven by a virtual-clock timer queue.

pub mod app;
pub mod motion;
pub mod random;
pub mod world;

pub use app::{
    run_app, AppError, Camera, DeadZone, DrawCommand, DrawLog, Glow, InputAction, InputSnapshot,
    Layer, LoopConfig, RenderSurface, Scene, SceneCommand, SceneKey, ScreenRect, SpriteRef,
};
pub use motion::{MotionConfig, MotionController, StepReport, TimerKind, TimerQueue};
pub use random::{DrawSequence, FixedDraw, RandomSource, SeededRandom};
pub use world::{
    Axis, Character, CharacterType, CharacterTypes, CollisionIndex, ConfigError, Direction,
    EntityId, GridError, Item, ItemKind, LightSource, Rect, SparseGrid, Tile, TileCodec,
    TileCodecError, TileKey, TileKind, VisibilityWindow, WorldConfig, WorldError, WorldMap,
    WorldSnapshot,
};
