use engine::{LoopConfig, MotionConfig, Scene, WorldConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay;

const SEED_ENV_VAR: &str = "TILEWORLD_SEED";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) menu: Box<dyn Scene>,
    pub(crate) world: Box<dyn Scene>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "startup");

    let world_config = WorldConfig {
        seed: parse_seed(std::env::var(SEED_ENV_VAR).ok().as_deref()),
        ..WorldConfig::default()
    };
    info!(
        x_tiles = world_config.x_tiles,
        y_tiles = world_config.y_tiles,
        seed = ?world_config.seed,
        "world_config"
    );
    let (menu, world) = gameplay::build_scene_pair(world_config, MotionConfig::default());

    AppWiring {
        config: LoopConfig::default(),
        menu,
        world,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_seed(raw: Option<&str>) -> Option<u64> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(_) => {
            warn!(
                env_var = SEED_ENV_VAR,
                value = raw,
                "invalid seed value; using a random seed"
            );
            None
        }
    }
}
