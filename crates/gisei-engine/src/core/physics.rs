use glam::Vec2;

use crate::core::geometry::{resolve, Axis, Rect};

/// Gravity in units per tick², applied once per tick before the vertical pass.
pub const DEFAULT_GRAVITY: f32 = 0.8;

/// Kinematic state shared by every movable entity.
///
/// `rect` is the collision box. Callers that draw a looser visual rect keep it
/// in sync themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub velocity: Vec2,
    pub grounded: bool,
}

/// What happened during one [`Body::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepContacts {
    /// The horizontal pass clamped the body against an obstacle.
    pub hit_wall: bool,
    /// The vertical pass clamped the body against a ceiling or floor.
    pub hit_vertical: bool,
}

impl Body {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            velocity: Vec2::ZERO,
            grounded: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Gravity, vertical integration and vertical resolution.
    ///
    /// `grounded` is recomputed from scratch: it is true only when this pass
    /// stopped the body on top of an obstacle.
    pub fn step_vertical(&mut self, obstacles: &[Rect], gravity: f32) -> bool {
        self.velocity.y += gravity;
        self.rect.y += self.velocity.y;

        let res = resolve(self.rect, obstacles, Axis::Vertical, self.velocity.y);
        self.rect = res.rect;
        self.velocity.y = res.velocity;
        self.grounded = res.landed;
        res.touched
    }

    /// Horizontal integration and resolution using the current `velocity.x`.
    pub fn step_horizontal(&mut self, obstacles: &[Rect]) -> bool {
        self.rect.x += self.velocity.x;

        let res = resolve(self.rect, obstacles, Axis::Horizontal, self.velocity.x);
        self.rect = res.rect;
        res.touched
    }

    /// Full tick: vertical first so grounding is current before any
    /// horizontal-only logic runs.
    pub fn step(&mut self, obstacles: &[Rect], gravity: f32) -> StepContacts {
        let hit_vertical = self.step_vertical(obstacles, gravity);
        let hit_wall = self.step_horizontal(obstacles);
        StepContacts { hit_wall, hit_vertical }
    }

    /// Stop all motion and place the body's top-left at `pos`.
    pub fn reset_at(&mut self, pos: Vec2) {
        self.rect.set_top_left(pos);
        self.velocity = Vec2::ZERO;
        self.grounded = false;
    }
}
