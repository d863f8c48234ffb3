use serde::{Deserialize, Serialize};

/// Screen-relative band inside which the focus can move without the view scrolling.
///
/// Fractions of the viewport size; the camera only pushes its offset once the focus
/// crosses `low` (moving toward the top/left) or `high` (moving toward the bottom/right).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadZone {
    pub low: f32,
    pub high: f32,
}

impl Default for DeadZone {
    fn default() -> Self {
        Self {
            low: 0.4,
            high: 0.6,
        }
    }
}

/// Follow camera.
///
/// `x`/`y` is the last focus position in world pixels. `offset_x`/`offset_y` is added to
/// every raw world coordinate to get its screen coordinate. Non-centered offsets are
/// always whole pixels so tile edges line up, which also means slow movement scrolls the
/// view in one-pixel jumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    #[serde(skip)]
    dead_zone: DeadZone,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_dead_zone(width, height, DeadZone::default())
    }

    pub fn with_dead_zone(width: f32, height: f32, dead_zone: DeadZone) -> Self {
        Self {
            width,
            height,
            x: 0.0,
            y: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            dead_zone,
        }
    }

    pub fn dead_zone(&self) -> DeadZone {
        self.dead_zone
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn set_focus(&mut self, target_x: f32, target_y: f32, centered: bool) {
        if centered {
            self.offset_x = (self.width / 2.0 - target_x).round();
            self.offset_y = (self.height / 2.0 - target_y).round();
        } else {
            self.offset_x = push_offset(
                self.offset_x,
                self.x,
                target_x,
                self.width,
                self.dead_zone,
            );
            self.offset_y = push_offset(
                self.offset_y,
                self.y,
                target_y,
                self.height,
                self.dead_zone,
            );
        }
        self.x = target_x;
        self.y = target_y;
    }

    /// Culling test against a region twice the viewport size around the focus.
    pub fn in_viewport(&self, x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
        x2 > self.x - self.width
            && x1 < self.x + self.width
            && y2 > self.y - self.height
            && y1 < self.y + self.height
    }

    pub fn to_screen(&self, world_x: f32, world_y: f32) -> (f32, f32) {
        (world_x + self.offset_x, world_y + self.offset_y)
    }
}

fn push_offset(offset: f32, previous: f32, target: f32, extent: f32, zone: DeadZone) -> f32 {
    let screen = target + offset;
    let low = extent * zone.low;
    let high = extent * zone.high;
    let pushed = if screen < low && target < previous {
        low - target
    } else if screen > high && target > previous {
        high - target
    } else {
        offset
    };
    pushed.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused_camera() -> Camera {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_focus(400.0, 300.0, true);
        camera
    }

    #[test]
    fn centered_focus_snaps_offsets() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.set_focus(1000.3, 2000.6, true);
        assert_eq!(camera.offset_x, -600.0);
        assert_eq!(camera.offset_y, -1701.0);
        assert_eq!((camera.x, camera.y), (1000.3, 2000.6));
        assert_eq!(camera.to_screen(1000.0, 2000.0), (400.0, 299.0));
    }

    #[test]
    fn movement_inside_dead_zone_keeps_offset() {
        let mut camera = focused_camera();
        camera.set_focus(450.0, 320.0, false);
        assert_eq!((camera.offset_x, camera.offset_y), (0.0, 0.0));
        assert_eq!((camera.x, camera.y), (450.0, 320.0));
    }

    #[test]
    fn crossing_the_high_edge_pins_focus_at_threshold() {
        let mut camera = focused_camera();
        camera.set_focus(500.4, 300.0, false);
        // 0.6 * 800 = 480
        assert_eq!(camera.offset_x, -20.0);
        let (screen_x, _) = camera.to_screen(500.4, 300.0);
        assert!((screen_x - 480.4).abs() < 0.001);
    }

    #[test]
    fn crossing_the_low_edge_pins_focus_at_threshold() {
        let mut camera = focused_camera();
        camera.set_focus(400.0, 200.0, false);
        // 0.4 * 600 = 240
        assert_eq!(camera.offset_y, 40.0);
    }

    #[test]
    fn moving_away_from_an_edge_does_not_push() {
        let mut camera = focused_camera();
        camera.offset_x = -200.0;
        camera.x = 300.0;
        // screen x = 350 - 200 = 150 is below the low edge, but the focus moved right
        camera.set_focus(350.0, 300.0, false);
        assert_eq!(camera.offset_x, -200.0);
    }

    #[test]
    fn viewport_upper_bound_is_strict() {
        let mut camera = Camera::new(100.0, 80.0);
        camera.set_focus(500.0, 500.0, true);
        // x1 exactly at x + width
        assert!(!camera.in_viewport(600.0, 500.0, 650.0, 550.0));
        // x2 one pixel past x - width
        assert!(camera.in_viewport(350.0, 500.0, 401.0, 550.0));
        // x2 exactly at x - width
        assert!(!camera.in_viewport(350.0, 500.0, 400.0, 550.0));
    }

    #[test]
    fn viewport_margin_is_twice_the_screen() {
        let mut camera = Camera::new(100.0, 80.0);
        camera.set_focus(500.0, 500.0, true);
        assert!(camera.in_viewport(590.0, 570.0, 640.0, 620.0));
        assert!(!camera.in_viewport(500.0, 580.0, 550.0, 630.0));
    }
}
