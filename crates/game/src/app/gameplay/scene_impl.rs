impl Scene for MenuScene {
    fn load(&mut self) {
        info!("menu_opened");
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.was_pressed(InputAction::Confirm) {
            return SceneCommand::SwitchTo(SceneKey::World);
        }
        if input.was_pressed(InputAction::Back) {
            return SceneCommand::HardResetTo(SceneKey::World);
        }
        SceneCommand::None
    }

    fn render(&mut self, surface: &mut dyn RenderSurface) {
        surface.clear_region(Layer::World);
        surface.clear_region(Layer::Lighting);
        let x = surface.viewport_width() as f32 / 2.0;
        let y = surface.viewport_height() as f32 / 2.0;
        surface.draw_circle(x, y, MENU_GLOW_RADIUS_PX, Glow::default());
    }

    fn unload(&mut self) {}

    fn debug_title(&self) -> Option<String> {
        Some("Tileworld | Enter: play | Backspace: new world | Esc: quit".to_string())
    }
}

impl Scene for WorldScene {
    fn load(&mut self) {
        match WorldSession::start(self.world_config.clone(), self.motion_config.clone()) {
            Ok(session) => {
                info!(
                    seed = session.rng.seed(),
                    characters = session.map.characters().len(),
                    items = session.map.items().len(),
                    "world_loaded"
                );
                self.session = Some(session);
            }
            Err(err) => {
                error!(error = %err, "world_load_failed");
                self.session = None;
            }
        }
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.was_pressed(InputAction::Back) {
            return SceneCommand::SwitchTo(SceneKey::Menu);
        }
        let Some(session) = self.session.as_mut() else {
            return SceneCommand::SwitchTo(SceneKey::Menu);
        };

        if let Err(err) = session.tick(fixed_dt_seconds, input) {
            warn!(error = %err, tick = session.tick, "world_tick_failed");
        }
        if input.was_pressed(InputAction::DumpState) {
            match session.state_dump_json() {
                Ok(json) => info!(state = %json, "state_dump"),
                Err(err) => warn!(error = %err, "state_dump_failed"),
            }
        }
        SceneCommand::None
    }

    fn render(&mut self, surface: &mut dyn RenderSurface) {
        surface.clear_region(Layer::World);
        surface.clear_region(Layer::Lighting);
        if let Some(session) = &self.session {
            session.draw(surface);
        }
    }

    fn unload(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                ticks = session.tick,
                materialized_tiles = session.map.grid().materialized_count(),
                "world_unloaded"
            );
        }
    }

    fn debug_title(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        let player = session.map.player()?;
        Some(format!(
            "Tileworld | ({:.0}, {:.0}) | speed {:.0} | tiles {}",
            player.x,
            player.y,
            player.max_speed,
            session.map.grid().materialized_count()
        ))
    }
}
