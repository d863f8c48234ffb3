use super::ScreenRect;

pub(crate) const AMBIENT_DARKNESS: f32 = 0.55;

pub(crate) fn fill(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

/// Fills the pixels covered by `rect`, clipped to the frame.
pub(crate) fn fill_rect(frame: &mut [u8], width: u32, height: u32, rect: ScreenRect, color: [u8; 4]) {
    let x_start = (rect.x.round() as i64).max(0);
    let y_start = (rect.y.round() as i64).max(0);
    let x_end = ((rect.x + rect.width).round() as i64).min(i64::from(width));
    let y_end = ((rect.y + rect.height).round() as i64).min(i64::from(height));
    for y in y_start..y_end {
        for x in x_start..x_end {
            write_pixel_rgba_clipped(frame, width as usize, x as i32, y as i32, color);
        }
    }
}

pub(crate) fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(width)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}

/// Per-pixel darkness in `[0, 1]`, multiplied into the frame on present.
#[derive(Debug, Clone)]
pub(crate) struct LightMask {
    width: u32,
    height: u32,
    darkness: Vec<f32>,
}

impl LightMask {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            darkness: vec![AMBIENT_DARKNESS; width as usize * height as usize],
        }
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub(crate) fn reset(&mut self) {
        self.darkness.fill(AMBIENT_DARKNESS);
    }

    #[cfg(test)]
    pub(crate) fn darkness_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.darkness
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub(crate) fn carve(&mut self, cx: f32, cy: f32, radius: f32, intensity: f32) {
        if radius <= 0.0 {
            return;
        }
        let x_start = ((cx - radius).floor() as i64).max(0);
        let y_start = ((cy - radius).floor() as i64).max(0);
        let x_end = ((cx + radius).ceil() as i64).min(i64::from(self.width));
        let y_end = ((cy + radius).ceil() as i64).min(i64::from(self.height));
        let intensity = intensity.clamp(0.0, 1.0);
        for y in y_start..y_end {
            for x in x_start..x_end {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance >= radius {
                    continue;
                }
                let light = intensity * (1.0 - distance / radius);
                let index = y as usize * self.width as usize + x as usize;
                if let Some(darkness) = self.darkness.get_mut(index) {
                    *darkness *= 1.0 - light;
                }
            }
        }
    }

    pub(crate) fn apply(&self, frame: &mut [u8]) {
        for (pixel, darkness) in frame.chunks_exact_mut(4).zip(&self.darkness) {
            let keep = 1.0 - darkness.clamp(0.0, 1.0);
            for channel in &mut pixel[..3] {
                *channel = (f32::from(*channel) * keep).round() as u8;
            }
        }
    }
}
