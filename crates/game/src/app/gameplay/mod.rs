use engine::{
    Camera, CharacterTypes, Glow, InputAction, InputSnapshot, Layer, MotionConfig,
    MotionController, Rect, RenderSurface, Scene, SceneCommand, SceneKey, ScreenRect,
    SeededRandom, SpriteRef, StepReport, WorldConfig, WorldError, WorldMap, WorldSnapshot,
};
use serde::Serialize;
use tracing::{error, info, warn};

const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);
const MENU_GLOW_RADIUS_PX: f32 = 180.0;

include!("types.rs");
include!("scene_impl.rs");
include!("util.rs");

pub(crate) fn build_scene_pair(
    world_config: WorldConfig,
    motion_config: MotionConfig,
) -> (Box<dyn Scene>, Box<dyn Scene>) {
    let menu = MenuScene::default();
    let world = WorldScene::new(world_config, motion_config);
    (Box::new(menu), Box::new(world))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
