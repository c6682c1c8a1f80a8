use glam::Vec2;

use crate::core::geometry::Rect;

/// Viewport into the level. Recomputed from the target every tick and
/// clamped so it never shows anything outside the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Top-left of the viewport in world space.
    pub x: f32,
    pub y: f32,
    pub map_width: f32,
    pub map_height: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Camera {
    pub fn new(map_width: f32, map_height: f32, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            map_width,
            map_height,
            viewport_width,
            viewport_height,
        }
    }

    /// Center on `target`, then clamp each axis to `[0, map - viewport]`.
    /// A map smaller than the viewport pins that axis to 0.
    pub fn follow(&mut self, target: &Rect) {
        let center = target.center();
        self.x = clamp_axis(
            center.x - self.viewport_width / 2.0,
            self.map_width - self.viewport_width,
        );
        self.y = clamp_axis(
            center.y - self.viewport_height / 2.0,
            self.map_height - self.viewport_height,
        );
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// World rect to viewport-relative rect.
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translated(-self.offset())
    }

    /// The visible region in world space.
    pub fn visible(&self) -> Rect {
        Rect::new(self.x, self.y, self.viewport_width, self.viewport_height)
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}
