mod controller;
mod timers;

pub use controller::{
    MotionConfig, MotionController, StepReport, MAX_PLAYER_SPEED, MIN_PLAYER_SPEED,
    MIN_STEP_DELAY_MS,
};
pub use timers::{DueTimer, TimerKind, TimerQueue};
