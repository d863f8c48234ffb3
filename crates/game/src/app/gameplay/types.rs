/// Title screen. Enter starts or resumes the world, Backspace starts a fresh one.
#[derive(Debug, Default)]
struct MenuScene;

/// Everything that exists only while the world scene is loaded.
#[derive(Debug)]
struct WorldSession {
    map: WorldMap,
    camera: Camera,
    motion: MotionController,
    rng: SeededRandom,
    tick: u64,
    last_report: StepReport,
}

#[derive(Debug)]
struct WorldScene {
    world_config: WorldConfig,
    motion_config: MotionConfig,
    session: Option<WorldSession>,
}

impl WorldScene {
    fn new(world_config: WorldConfig, motion_config: MotionConfig) -> Self {
        Self {
            world_config,
            motion_config,
            session: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct StateDump<'a> {
    tick: u64,
    now_ms: f64,
    seed: u64,
    camera: &'a Camera,
    last_step: &'a StepReport,
    world: WorldSnapshot,
}
