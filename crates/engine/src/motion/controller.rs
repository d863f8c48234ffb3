use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::timers::{DueTimer, TimerKind, TimerQueue};
use crate::app::{Camera, InputAction, InputSnapshot};
use crate::random::RandomSource;
use crate::world::{Axis, ConfigError, Direction, EntityId, WorldError, WorldMap};

/// Shortest delay between two easing steps.
pub const MIN_STEP_DELAY_MS: f64 = 1.0;
pub const MIN_PLAYER_SPEED: f32 = 1.0;
pub const MAX_PLAYER_SPEED: f32 = 20.0;

/// Distance at which an easing axis counts as arrived.
const ARRIVAL_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Divisor applied to the remaining distance for both step size and step delay.
    pub input_cooldown: f32,
    pub rate_of_increase: f32,
    pub npc_stride: f32,
    pub retarget_base_ms: f32,
    pub retarget_jitter_ms: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            input_cooldown: 30.0,
            rate_of_increase: 1.1,
            npc_stride: 10.0,
            retarget_base_ms: 1500.0,
            retarget_jitter_ms: 2500.0,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("input_cooldown", self.input_cooldown),
            ("rate_of_increase", self.rate_of_increase),
            ("retarget_base_ms", self.retarget_base_ms),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field });
            }
        }
        for (field, value) in [
            ("npc_stride", self.npc_stride),
            ("retarget_jitter_ms", self.retarget_jitter_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

/// Counters for one `advance` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub timers_fired: u32,
    pub steps_committed: u32,
    pub collisions: u32,
    pub arrivals: u32,
    pub retargets: u32,
}

/// Drives eased movement and NPC wandering off a virtual-clock timer queue.
///
/// Each character axis is either idle (position equals target) or easing with one pending
/// `Ease(axis)` timer. Handlers always re-read the character, so a timer that outlives the
/// state it was scheduled for only acts on what is current.
#[derive(Debug)]
pub struct MotionController {
    config: MotionConfig,
    timers: TimerQueue,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            timers: TimerQueue::default(),
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn now_ms(&self) -> f64 {
        self.timers.now_ms()
    }

    /// Sets a new destination and arms easing on every axis that has somewhere to go.
    pub fn set_target(
        &mut self,
        map: &mut WorldMap,
        id: EntityId,
        target_x: f32,
        target_y: f32,
    ) -> Result<(), WorldError> {
        let character = map.character_mut(id)?;
        character.target_x = target_x;
        character.target_y = target_y;
        for axis in Axis::BOTH {
            let difference = character.target(axis) - character.position(axis);
            self.arm_ease(id, axis, difference);
        }
        Ok(())
    }

    fn set_axis_target(
        &mut self,
        map: &mut WorldMap,
        id: EntityId,
        axis: Axis,
        target: f32,
    ) -> Result<(), WorldError> {
        let character = map.character_mut(id)?;
        character.set_target(axis, target);
        let difference = target - character.position(axis);
        self.arm_ease(id, axis, difference);
        Ok(())
    }

    fn arm_ease(&mut self, id: EntityId, axis: Axis, difference: f32) {
        if difference == 0.0 {
            self.timers.cancel(id, TimerKind::Ease(axis));
            return;
        }
        self.timers
            .schedule(id, TimerKind::Ease(axis), self.step_delay_ms(difference));
    }

    fn step_delay_ms(&self, difference: f32) -> f64 {
        (f64::from(difference.abs()) / f64::from(self.config.input_cooldown)).max(MIN_STEP_DELAY_MS)
    }

    /// Accelerates the followed character from the held direction actions.
    pub fn apply_player_input(
        &mut self,
        map: &mut WorldMap,
        input: &InputSnapshot,
    ) -> Result<(), WorldError> {
        let Some(id) = map.followed() else {
            return Ok(());
        };
        let rate = self.config.rate_of_increase;
        let character = map.character_mut(id)?;

        if input.was_pressed(InputAction::SpeedUp) {
            character.max_speed = (character.max_speed + 1.0).min(MAX_PLAYER_SPEED);
            debug!(entity = id.0, max_speed = character.max_speed, "player_speed_changed");
        }
        if input.was_pressed(InputAction::SpeedDown) {
            character.max_speed = (character.max_speed - 1.0).max(MIN_PLAYER_SPEED);
            debug!(entity = id.0, max_speed = character.max_speed, "player_speed_changed");
        }

        let max_speed = character.max_speed;
        for direction in Direction::ALL {
            let held = input.is_down(InputAction::for_direction(direction))
                && !input.is_down(InputAction::for_direction(direction.opposite()));
            let velocity = &mut character.velocities[direction.index()];
            *velocity = if !held {
                0.0
            } else if *velocity >= max_speed {
                max_speed
            } else {
                (*velocity + 1.0) * rate
            };
        }

        let velocities = character.velocities;
        let offset_x = velocities[Direction::Right.index()] - velocities[Direction::Left.index()];
        let offset_y = velocities[Direction::Down.index()] - velocities[Direction::Up.index()];
        let (x, y) = (character.x, character.y);

        if offset_x != 0.0 {
            self.set_axis_target(map, id, Axis::X, x + offset_x)?;
        }
        if offset_y != 0.0 {
            self.set_axis_target(map, id, Axis::Y, y + offset_y)?;
        }
        Ok(())
    }

    /// Arms wandering for visible NPCs and parks it for the rest. Returns how many were armed.
    pub fn sync_autonomy(&mut self, map: &WorldMap, rng: &mut dyn RandomSource) -> usize {
        let mut armed = 0;
        for character in map.characters() {
            if character.is_player || map.is_followed(character.id) {
                continue;
            }
            let wants_timer = character.visible && !character.frozen;
            let has_timer = self.timers.is_armed(character.id, TimerKind::Retarget);
            if wants_timer && !has_timer {
                let delay = self.retarget_delay_ms(rng);
                self.timers
                    .schedule(character.id, TimerKind::Retarget, delay);
                armed += 1;
            } else if !wants_timer && has_timer {
                self.timers.cancel(character.id, TimerKind::Retarget);
            }
        }
        armed
    }

    fn retarget_delay_ms(&self, rng: &mut dyn RandomSource) -> f64 {
        f64::from(self.config.retarget_base_ms)
            + rng.next_unit() * f64::from(self.config.retarget_jitter_ms)
    }

    /// Runs every timer that falls due within the next `dt_ms` of virtual time.
    pub fn advance(
        &mut self,
        dt_ms: f64,
        map: &mut WorldMap,
        camera: &mut Camera,
        rng: &mut dyn RandomSource,
    ) -> Result<StepReport, WorldError> {
        let dt_us = if dt_ms.is_finite() && dt_ms > 0.0 {
            (dt_ms * 1000.0).round() as u64
        } else {
            0
        };
        let deadline = self.timers.now_us().saturating_add(dt_us);
        let mut report = StepReport::default();

        while let Some(timer) = self.timers.pop_due(deadline) {
            report.timers_fired += 1;
            self.fire(timer, map, camera, rng, &mut report)?;
        }
        self.timers.advance_to(deadline);
        Ok(report)
    }

    fn fire(
        &mut self,
        timer: DueTimer,
        map: &mut WorldMap,
        camera: &mut Camera,
        rng: &mut dyn RandomSource,
        report: &mut StepReport,
    ) -> Result<(), WorldError> {
        if map.character(timer.entity).is_err() {
            warn!(entity = timer.entity.0, kind = ?timer.kind, "timer_for_unknown_entity");
            return Ok(());
        }
        match timer.kind {
            TimerKind::Ease(axis) => self.ease_step(timer.entity, axis, map, camera, rng, report),
            TimerKind::Retarget => self.retarget(timer.entity, map, rng, report),
        }
    }

    fn ease_step(
        &mut self,
        id: EntityId,
        axis: Axis,
        map: &mut WorldMap,
        camera: &mut Camera,
        rng: &mut dyn RandomSource,
        report: &mut StepReport,
    ) -> Result<(), WorldError> {
        let followed = map.is_followed(id);
        let character = map.character(id)?;
        let position = character.position(axis);
        let difference = character.target(axis) - position;

        if difference != 0.0 {
            let next = position + difference / self.config.input_cooldown;
            let body = character.rect_with(axis, next);
            if map.would_collide(body) {
                map.character_mut(id)?.set_target(axis, position);
                report.collisions += 1;
            } else {
                let character = map.character_mut(id)?;
                character.set_position(axis, next);
                let (x, y) = (character.x, character.y);
                report.steps_committed += 1;
                if followed {
                    camera.set_focus(x, y, false);
                    map.set_needs_redraw(true);
                    map.refresh_visibility(x, y, rng)?;
                }
            }
        }

        let character = map.character_mut(id)?;
        let remaining = character.target(axis) - character.position(axis);
        if remaining.abs() > ARRIVAL_DISTANCE {
            self.timers
                .schedule(id, TimerKind::Ease(axis), self.step_delay_ms(remaining));
        } else {
            let position = character.position(axis);
            character.set_target(axis, position);
            report.arrivals += 1;
            if followed {
                map.set_needs_redraw(false);
            }
        }
        Ok(())
    }

    fn retarget(
        &mut self,
        id: EntityId,
        map: &mut WorldMap,
        rng: &mut dyn RandomSource,
        report: &mut StepReport,
    ) -> Result<(), WorldError> {
        let character = map.character(id)?;
        if !character.visible || character.frozen {
            return Ok(());
        }
        let reach = character.max_speed * self.config.npc_stride;
        let (x, y) = (character.x, character.y);

        let target_x = x + (2.0 * rng.next_unit() as f32 - 1.0) * reach;
        let target_y = y + (2.0 * rng.next_unit() as f32 - 1.0) * reach;
        self.set_target(map, id, target_x, target_y)?;
        report.retargets += 1;
        debug!(entity = id.0, target_x, target_y, "npc_retargeted");

        let delay = self.retarget_delay_ms(rng);
        self.timers.schedule(id, TimerKind::Retarget, delay);
        Ok(())
    }

    /// Halts the character where it stands and keeps it from wandering until resumed.
    pub fn stop(&mut self, map: &mut WorldMap, id: EntityId) -> Result<(), WorldError> {
        let character = map.character_mut(id)?;
        self.timers.cancel_entity(id);
        character.target_x = character.x;
        character.target_y = character.y;
        character.velocities = [0.0; 4];
        character.frozen = true;
        Ok(())
    }

    pub fn resume(&mut self, map: &mut WorldMap, id: EntityId) -> Result<(), WorldError> {
        map.character_mut(id)?.frozen = false;
        Ok(())
    }

    /// Moves the character instantly, dropping any easing in flight.
    pub fn teleport(
        &mut self,
        map: &mut WorldMap,
        camera: &mut Camera,
        id: EntityId,
        x: f32,
        y: f32,
        rng: &mut dyn RandomSource,
    ) -> Result<(), WorldError> {
        let character = map.character_mut(id)?;
        for axis in Axis::BOTH {
            self.timers.cancel(id, TimerKind::Ease(axis));
        }
        character.x = x;
        character.y = y;
        character.target_x = x;
        character.target_y = y;
        character.velocities = [0.0; 4];

        if map.is_followed(id) {
            camera.set_focus(x, y, true);
            map.invalidate_visibility();
            map.refresh_visibility(x, y, rng)?;
            map.set_needs_redraw(true);
        }
        debug!(entity = id.0, x, y, "character_teleported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{DrawSequence, FixedDraw, SeededRandom};
    use crate::world::{CharacterTypes, ItemKind, WorldConfig};

    fn config() -> WorldConfig {
        WorldConfig {
            x_tiles: 20,
            y_tiles: 20,
            tile_width: 50.0,
            tile_height: 50.0,
            visibility_radius: 6,
            npc_count: 0,
            item_count: 0,
            hitbox_inset: 10.0,
            seed: Some(7),
        }
    }

    fn grass_map() -> WorldMap {
        WorldMap::new(config(), CharacterTypes::default()).expect("map")
    }

    fn controller() -> MotionController {
        MotionController::new(MotionConfig::default()).expect("controller")
    }

    fn camera() -> Camera {
        Camera::new(400.0, 300.0)
    }

    /// Player at (x, y), followed, with the visible window materialized as grass.
    fn map_with_player(x: f32, y: f32) -> (WorldMap, EntityId) {
        let mut map = grass_map();
        let mut rng = FixedDraw(0.5);
        let id = map
            .spawn_character("player", Some((x, y)), &mut rng)
            .expect("player");
        map.set_followed(Some(id));
        map.refresh_visibility(x, y, &mut rng).expect("visibility");
        (map, id)
    }

    #[test]
    fn default_config_is_valid_and_zero_cooldown_is_not() {
        assert_eq!(MotionConfig::default().validate(), Ok(()));
        let config = MotionConfig {
            input_cooldown: 0.0,
            ..MotionConfig::default()
        };
        assert!(MotionController::new(config).is_err());
    }

    #[test]
    fn easing_converges_within_one_pixel_and_goes_idle() {
        let (mut map, id) = map_with_player(200.0, 200.0);
        let mut motion = controller();
        let mut camera = camera();
        motion
            .set_target(&mut map, id, 300.0, 260.0)
            .expect("target");

        let report = motion
            .advance(2_000.0, &mut map, &mut camera, &mut FixedDraw(0.5))
            .expect("advance");

        let player = map.character(id).expect("player");
        assert!((player.x - 300.0).abs() <= 1.0);
        assert!((player.y - 260.0).abs() <= 1.0);
        assert!(player.is_idle());
        assert_eq!(report.collisions, 0);
        assert_eq!(report.arrivals, 2);
        assert_eq!(motion.timers().pending_count(), 0);
        assert!(!map.needs_redraw());
    }

    #[test]
    fn each_step_covers_a_cooldown_fraction_of_the_distance() {
        let (mut map, id) = map_with_player(200.0, 200.0);
        let mut motion = controller();
        motion.set_target(&mut map, id, 260.0, 200.0).expect("target");

        // 60 / 30 = 2ms until the first step.
        motion
            .advance(2.0, &mut map, &mut camera(), &mut FixedDraw(0.5))
            .expect("advance");
        let player = map.character(id).expect("player");
        assert_eq!(player.x, 202.0);
        assert!(motion.timers().is_armed(id, TimerKind::Ease(Axis::X)));
        assert!(!motion.timers().is_armed(id, TimerKind::Ease(Axis::Y)));
    }

    #[test]
    fn small_differences_wait_the_minimum_delay() {
        let (mut map, id) = map_with_player(200.0, 200.0);
        let mut motion = controller();
        motion.set_target(&mut map, id, 205.0, 200.0).expect("target");
        assert_eq!(
            motion.timers().due_at(id, TimerKind::Ease(Axis::X)),
            Some(1_000)
        );
    }

    #[test]
    fn collision_snaps_target_to_current_position() {
        let (mut map, id) = map_with_player(0.0, 0.0);
        let mut motion = controller();
        let mut camera = camera();
        // Hitbox leaves the world on the very first step to the left.
        motion.set_target(&mut map, id, -300.0, 0.0).expect("target");

        let report = motion
            .advance(100.0, &mut map, &mut camera, &mut FixedDraw(0.5))
            .expect("advance");
        let player = map.character(id).expect("player");
        assert!(player.x >= -10.0);
        assert_eq!(player.target_x, player.x);
        assert!(report.collisions >= 1);
        assert!(!motion.timers().is_armed(id, TimerKind::Ease(Axis::X)));
    }

    #[test]
    fn visible_blocking_item_stops_movement() {
        let (mut map, id) = map_with_player(200.0, 200.0);
        map.spawn_item(ItemKind::Crate, Some((300.0, 200.0)), &mut FixedDraw(0.5))
            .expect("crate");
        let mut camera = camera();
        camera.set_focus(200.0, 200.0, true);
        map.calculate_visible(&camera);

        let mut motion = controller();
        motion.set_target(&mut map, id, 400.0, 200.0).expect("target");
        motion
            .advance(5_000.0, &mut map, &mut camera, &mut FixedDraw(0.5))
            .expect("advance");

        let player = map.character(id).expect("player");
        // Hitbox right edge (x + 40) may not pass the crate's left edge at 300.
        assert!(player.x + 40.0 <= 300.0);
        assert!(player.is_idle());
    }

    #[test]
    fn followed_step_moves_camera_and_flags_redraw() {
        let (mut map, id) = map_with_player(200.0, 150.0);
        let mut motion = controller();
        let mut camera = camera();
        camera.set_focus(200.0, 150.0, true);
        motion.set_target(&mut map, id, 500.0, 150.0).expect("target");

        motion
            .advance(10.0, &mut map, &mut camera, &mut FixedDraw(0.5))
            .expect("advance");
        let player = map.character(id).expect("player");
        assert_eq!(camera.x, player.x);
        assert!(map.needs_redraw());
    }

    #[test]
    fn held_direction_accelerates_until_max_speed() {
        let (mut map, id) = map_with_player(400.0, 400.0);
        let mut motion = controller();
        let input = InputSnapshot::empty().with_action_down(InputAction::MoveRight, true);

        motion.apply_player_input(&mut map, &input).expect("input");
        let first = map.character(id).expect("player").velocities[Direction::Right.index()];
        assert!((first - 1.1).abs() < 1e-5);
        assert!((map.character(id).expect("player").target_x - 401.1).abs() < 1e-3);

        for _ in 0..10 {
            motion.apply_player_input(&mut map, &input).expect("input");
        }
        let velocity = map.character(id).expect("player").velocities[Direction::Right.index()];
        assert_eq!(velocity, 5.0);
    }

    #[test]
    fn opposed_directions_cancel_and_release_resets_velocity() {
        let (mut map, id) = map_with_player(400.0, 400.0);
        let mut motion = controller();
        let both = InputSnapshot::empty()
            .with_action_down(InputAction::MoveUp, true)
            .with_action_down(InputAction::MoveDown, true);
        motion.apply_player_input(&mut map, &both).expect("input");
        let player = map.character(id).expect("player");
        assert_eq!(player.velocities, [0.0; 4]);
        assert_eq!(player.target_y, 400.0);

        let up = InputSnapshot::empty().with_action_down(InputAction::MoveUp, true);
        motion.apply_player_input(&mut map, &up).expect("input");
        motion
            .apply_player_input(&mut map, &InputSnapshot::empty())
            .expect("input");
        assert_eq!(map.character(id).expect("player").velocities, [0.0; 4]);
    }

    #[test]
    fn speed_actions_are_clamped() {
        let (mut map, id) = map_with_player(400.0, 400.0);
        let mut motion = controller();
        let faster = InputSnapshot::empty().with_action_pressed(InputAction::SpeedUp);
        for _ in 0..30 {
            motion.apply_player_input(&mut map, &faster).expect("input");
        }
        assert_eq!(map.character(id).expect("player").max_speed, MAX_PLAYER_SPEED);

        let slower = InputSnapshot::empty().with_action_pressed(InputAction::SpeedDown);
        for _ in 0..30 {
            motion.apply_player_input(&mut map, &slower).expect("input");
        }
        assert_eq!(map.character(id).expect("player").max_speed, MIN_PLAYER_SPEED);
    }

    #[test]
    fn each_easing_step_shrinks_the_gap_without_overshoot() {
        let (mut map, id) = map_with_player(0.0, 0.0);
        let mut motion = controller();
        let mut camera = camera();
        let mut rng = FixedDraw(0.5);
        motion.set_target(&mut map, id, 100.0, 0.0).expect("target");
        assert!(!motion.timers().is_armed(id, TimerKind::Ease(Axis::Y)));

        // 100 * (29/30)^n <= 1 needs n = 136
        let mut gap = 100.0_f32;
        let mut steps = 0;
        while let Some(due_us) = motion.timers().due_at(id, TimerKind::Ease(Axis::X)) {
            let wait_ms = (due_us - motion.timers().now_us()) as f64 / 1000.0;
            let report = motion
                .advance(wait_ms, &mut map, &mut camera, &mut rng)
                .expect("advance");
            assert_eq!(report.timers_fired, 1);
            steps += 1;

            let x = map.character(id).expect("player").x;
            assert!(x <= 100.0, "overshot to {x}");
            let next_gap = 100.0 - x;
            assert!(next_gap < gap, "gap {next_gap} after {gap}");
            gap = next_gap;
            assert!(steps <= 140, "no arrival after {steps} steps");
        }

        assert!(gap <= 1.0);
        assert!(steps >= 130);
        assert!(map.character(id).expect("player").is_idle());
    }

    #[test]
    fn generated_players_can_take_their_first_step() {
        for seed in 0..30 {
            let mut rng = SeededRandom::new(seed);
            let mut map =
                WorldMap::generate(WorldConfig::default(), CharacterTypes::default(), &mut rng)
                    .expect("generate");
            let player = map.player().expect("player").clone();
            map.refresh_visibility(player.x, player.y, &mut rng).expect("visibility");
            let mut motion = controller();
            let mut camera = camera();
            camera.set_focus(player.x, player.y, true);
            let room_right = player.x + player.width + 100.0 <= map.pixel_width();
            let target_x = if room_right { player.x + 100.0 } else { player.x - 100.0 };
            motion
                .set_target(&mut map, player.id, target_x, player.y)
                .expect("target");

            let report = motion
                .advance(5.0, &mut map, &mut camera, &mut rng)
                .expect("advance");
            assert_eq!(report.collisions, 0, "seed {seed}");
            assert_ne!(map.character(player.id).expect("player").x, player.x, "seed {seed}");
        }
    }

    fn map_with_npc(visible: bool) -> (WorldMap, EntityId) {
        let (mut map, _player) = map_with_player(400.0, 400.0);
        let npc = map
            .spawn_character("villager", Some((300.0, 300.0)), &mut FixedDraw(0.5))
            .expect("npc");
        map.character_mut(npc).expect("npc").visible = visible;
        (map, npc)
    }

    #[test]
    fn invisible_npcs_never_get_a_retarget_timer() {
        let (map, npc) = map_with_npc(false);
        let mut motion = controller();
        assert_eq!(motion.sync_autonomy(&map, &mut FixedDraw(0.5)), 0);
        assert!(!motion.timers().is_armed(npc, TimerKind::Retarget));
    }

    #[test]
    fn npc_loses_its_timer_when_it_leaves_the_view() {
        let (mut map, npc) = map_with_npc(true);
        let mut motion = controller();
        assert_eq!(motion.sync_autonomy(&map, &mut FixedDraw(0.5)), 1);
        assert_eq!(motion.sync_autonomy(&map, &mut FixedDraw(0.5)), 0);

        map.character_mut(npc).expect("npc").visible = false;
        motion.sync_autonomy(&map, &mut FixedDraw(0.5));
        assert!(!motion.timers().is_armed(npc, TimerKind::Retarget));
    }

    #[test]
    fn npc_wanders_only_after_the_camera_brings_it_into_view() {
        let (mut map, _player) = map_with_player(400.0, 400.0);
        let npc = map
            .spawn_character("villager", Some((900.0, 900.0)), &mut FixedDraw(0.5))
            .expect("npc");
        let mut motion = controller();
        let mut camera = camera();
        let mut rng = FixedDraw(0.5);

        camera.set_focus(100.0, 100.0, true);
        map.calculate_visible(&camera);
        assert!(!map.character(npc).expect("npc").visible);
        assert_eq!(motion.sync_autonomy(&map, &mut rng), 0);
        let report = motion
            .advance(10_000.0, &mut map, &mut camera, &mut rng)
            .expect("advance");
        assert_eq!(report.timers_fired, 0);
        assert_eq!(motion.timers().pending_count(), 0);

        camera.set_focus(900.0, 900.0, true);
        map.calculate_visible(&camera);
        assert!(map.character(npc).expect("npc").visible);
        assert_eq!(motion.sync_autonomy(&map, &mut rng), 1);
        // 1500 + 0.5 * 2500
        let report = motion
            .advance(2_750.0, &mut map, &mut camera, &mut rng)
            .expect("advance");
        assert_eq!(report.retargets, 1);
    }

    #[test]
    fn retarget_offsets_scale_with_speed_and_stride() {
        let (mut map, npc) = map_with_npc(true);
        let mut motion = controller();
        let mut camera = camera();
        // 1500 + 0.0 * 2500
        motion.sync_autonomy(&map, &mut FixedDraw(0.0));

        // x draw 0.75, y draw 0.25, jitter draw 0.5
        let mut draws = DrawSequence::new(vec![0.75, 0.25, 0.5]);
        let report = motion
            .advance(1_500.0, &mut map, &mut camera, &mut draws)
            .expect("advance");

        assert_eq!(report.retargets, 1);
        let character = map.character(npc).expect("npc");
        // villager speed 3 * stride 10 = 30 px reach
        assert_eq!(character.target_x, 315.0);
        assert_eq!(character.target_y, 285.0);
        assert_eq!(
            motion.timers().due_at(npc, TimerKind::Retarget),
            Some(1_500_000 + 2_750_000)
        );
    }

    #[test]
    fn stop_freezes_and_cancels_all_timers() {
        let (mut map, npc) = map_with_npc(true);
        let mut motion = controller();
        motion.sync_autonomy(&map, &mut FixedDraw(0.5));
        motion.set_target(&mut map, npc, 350.0, 350.0).expect("target");

        motion.stop(&mut map, npc).expect("stop");
        assert!(map.character(npc).expect("npc").is_idle());
        assert!(map.character(npc).expect("npc").frozen);
        assert_eq!(motion.timers().pending_count(), 0);
        assert_eq!(motion.sync_autonomy(&map, &mut FixedDraw(0.5)), 0);

        motion.resume(&mut map, npc).expect("resume");
        assert_eq!(motion.sync_autonomy(&map, &mut FixedDraw(0.5)), 1);
    }

    #[test]
    fn teleport_is_not_fought_by_stale_easing() {
        let (mut map, id) = map_with_player(200.0, 200.0);
        let mut motion = controller();
        let mut camera = camera();
        motion.set_target(&mut map, id, 400.0, 400.0).expect("target");
        motion
            .teleport(&mut map, &mut camera, id, 600.0, 650.0, &mut FixedDraw(0.5))
            .expect("teleport");
        motion
            .advance(1_000.0, &mut map, &mut camera, &mut FixedDraw(0.5))
            .expect("advance");

        let player = map.character(id).expect("player");
        assert_eq!((player.x, player.y), (600.0, 650.0));
        assert_eq!(map.visibility().focal_tile(), Some((12, 13)));
        assert_eq!(camera.offset_x, -400.0);
    }

    #[test]
    fn unknown_entities_are_reported() {
        let mut map = grass_map();
        let mut motion = controller();
        assert_eq!(
            motion.set_target(&mut map, EntityId(99), 0.0, 0.0),
            Err(WorldError::CharacterNotFound { id: EntityId(99) })
        );
        assert!(motion.stop(&mut map, EntityId(99)).is_err());
    }
}
