use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world pixel coordinates (Y-down, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Move so the right edge sits at `right`.
    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    /// Move so the bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    pub fn set_top_left(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Copy of this rect shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Whether both extents are positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Strict overlap test. Rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }

    /// Keep this rect inside `bounds`, pushing it back from each edge.
    /// Top/left win when the rect is larger than the bounds.
    pub fn clamp_inside(&mut self, bounds: &Rect) {
        if self.right() > bounds.right() {
            self.set_right(bounds.right());
        }
        if self.bottom() > bounds.bottom() {
            self.set_bottom(bounds.bottom());
        }
        if self.left() < bounds.left() {
            self.x = bounds.left();
        }
        if self.top() < bounds.top() {
            self.y = bounds.top();
        }
    }
}

/// Standard AABB overlap with strict inequality on both axes.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Axis along which a collision pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Outcome of a single-axis collision pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// The moving rect after clamping.
    pub rect: Rect,
    /// Velocity on the resolved axis after the pass.
    pub velocity: f32,
    /// At least one obstacle was overlapped and the rect was clamped.
    pub touched: bool,
    /// A vertical pass stopped a falling rect on top of an obstacle.
    pub landed: bool,
}

/// Push `moving` out of every obstacle it overlaps along `axis`.
///
/// Obstacles are tested in order against the progressively corrected rect, so
/// when several overlap the last one wins. Vertical contacts zero the velocity;
/// horizontal contacts leave it alone. A rect with zero velocity on the axis is
/// never moved.
pub fn resolve(moving: Rect, obstacles: &[Rect], axis: Axis, velocity: f32) -> Resolution {
    let mut out = Resolution {
        rect: moving,
        velocity,
        touched: false,
        landed: false,
    };

    for obstacle in obstacles {
        if !out.rect.intersects(obstacle) {
            continue;
        }
        match axis {
            Axis::Horizontal => {
                if velocity > 0.0 {
                    out.rect.set_right(obstacle.left());
                    out.touched = true;
                } else if velocity < 0.0 {
                    out.rect.x = obstacle.right();
                    out.touched = true;
                }
            }
            Axis::Vertical => {
                if velocity > 0.0 {
                    out.rect.set_bottom(obstacle.top());
                    out.velocity = 0.0;
                    out.touched = true;
                    out.landed = true;
                } else if velocity < 0.0 {
                    out.rect.y = obstacle.bottom();
                    out.velocity = 0.0;
                    out.touched = true;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!intersects(&a, &right));
        assert!(!intersects(&a, &below));
    }

    #[test]
    fn moving_right_clamps_to_obstacle_left() {
        let wall = Rect::new(100.0, 0.0, 20.0, 100.0);
        let moving = Rect::new(75.0, 10.0, 32.0, 32.0);
        let res = resolve(moving, &[wall], Axis::Horizontal, 4.0);
        assert!(res.touched);
        assert!((res.rect.right() - 100.0).abs() < 1e-6);
        assert!((res.velocity - 4.0).abs() < 1e-6, "horizontal velocity is kept");
    }

    #[test]
    fn moving_left_clamps_to_obstacle_right() {
        let wall = Rect::new(0.0, 0.0, 20.0, 100.0);
        let moving = Rect::new(18.0, 10.0, 32.0, 32.0);
        let res = resolve(moving, &[wall], Axis::Horizontal, -4.0);
        assert!(res.touched);
        assert!((res.rect.left() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn falling_lands_on_floor() {
        let floor = Rect::new(0.0, 100.0, 200.0, 32.0);
        let moving = Rect::new(10.0, 40.0, 32.0, 64.0);
        let res = resolve(moving, &[floor], Axis::Vertical, 4.8);
        assert!(res.landed);
        assert_eq!(res.velocity, 0.0);
        assert!((res.rect.bottom() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn rising_hits_ceiling_without_landing() {
        let ceiling = Rect::new(0.0, 0.0, 200.0, 32.0);
        let moving = Rect::new(10.0, 30.0, 32.0, 64.0);
        let res = resolve(moving, &[ceiling], Axis::Vertical, -10.0);
        assert!(res.touched);
        assert!(!res.landed);
        assert_eq!(res.velocity, 0.0);
        assert!((res.rect.top() - 32.0).abs() < 1e-6);
    }

    #[test]
    fn no_overlap_leaves_rect_untouched() {
        let floor = Rect::new(0.0, 100.0, 200.0, 32.0);
        let moving = Rect::new(10.0, 0.0, 32.0, 64.0);
        let res = resolve(moving, &[floor], Axis::Vertical, 0.8);
        assert!(!res.touched);
        assert_eq!(res.rect, moving);
        assert!((res.velocity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_velocity_never_moves_rect() {
        let block = Rect::new(0.0, 0.0, 50.0, 50.0);
        let moving = Rect::new(10.0, 10.0, 10.0, 10.0);
        let res = resolve(moving, &[block], Axis::Horizontal, 0.0);
        assert!(!res.touched);
        assert_eq!(res.rect, moving);
    }

    #[test]
    fn clamp_inside_pushes_back_from_edges() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut r = Rect::new(-5.0, 90.0, 20.0, 20.0);
        r.clamp_inside(&bounds);
        assert_eq!(r.left(), 0.0);
        assert_eq!(r.bottom(), 100.0);
    }
}
