mod camera;
mod input;
mod loop_runner;
mod rendering;
mod scene;

pub use camera::{Camera, DeadZone};
pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    sprite_color, tile_color, DrawCommand, DrawLog, Glow, Layer, PixelsRenderer, RenderSurface,
    ScreenRect, SpriteRef,
};
pub use scene::{InputSnapshot, Scene, SceneCommand, SceneKey};
