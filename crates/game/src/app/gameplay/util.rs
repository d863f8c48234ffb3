impl WorldSession {
    fn start(world_config: WorldConfig, motion_config: MotionConfig) -> Result<Self, WorldError> {
        let mut rng = match world_config.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        };
        let motion = MotionController::new(motion_config)?;
        let mut map = WorldMap::generate(world_config, CharacterTypes::default(), &mut rng)?;
        let mut camera = Camera::new(DEFAULT_VIEWPORT.0 as f32, DEFAULT_VIEWPORT.1 as f32);

        if let Some(player) = map.player() {
            let (x, y) = (player.x, player.y);
            camera.set_focus(x, y, true);
            map.refresh_visibility(x, y, &mut rng)?;
        }
        map.calculate_visible(&camera);

        Ok(Self {
            map,
            camera,
            motion,
            rng,
            tick: 0,
            last_report: StepReport::default(),
        })
    }

    /// One fixed step: player input, culling, NPC autonomy, then due timers.
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> Result<(), WorldError> {
        self.tick += 1;
        let (width, height) = input.window_size();
        if width > 0
            && height > 0
            && (width as f32 != self.camera.width || height as f32 != self.camera.height)
        {
            self.camera.resize(width as f32, height as f32);
        }

        self.motion.apply_player_input(&mut self.map, input)?;
        self.map.calculate_visible(&self.camera);
        self.motion.sync_autonomy(&self.map, &mut self.rng);
        self.last_report = self.motion.advance(
            f64::from(fixed_dt_seconds) * 1000.0,
            &mut self.map,
            &mut self.camera,
            &mut self.rng,
        )?;
        Ok(())
    }

    fn state_dump_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&StateDump {
            tick: self.tick,
            now_ms: self.motion.now_ms(),
            seed: self.rng.seed(),
            camera: &self.camera,
            last_step: &self.last_report,
            world: self.map.snapshot(),
        })
    }

    fn draw(&self, surface: &mut dyn RenderSurface) {
        let camera = &self.camera;
        for tile in self.map.visible_tiles() {
            let rect = Rect::new(tile.px, tile.py, tile.width, tile.height);
            surface.draw_tile(tile, ScreenRect::from_world(camera, rect));
        }
        for item in self.map.items().iter().filter(|item| item.visible) {
            surface.draw_sprite(
                SpriteRef::Item(item.kind),
                ScreenRect::from_world(camera, item.rect()),
            );
        }
        for character in self.map.characters().iter().filter(|c| c.visible) {
            let sprite = SpriteRef::Character {
                type_name: character.type_name,
                is_player: character.is_player,
            };
            surface.draw_sprite(sprite, ScreenRect::from_world(camera, character.rect()));
        }
        for light in self.map.light_sources() {
            let (x, y) = camera.to_screen(light.x, light.y);
            surface.draw_circle(x, y, light.radius, Glow::default());
        }
    }
}
