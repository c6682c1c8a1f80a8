pub mod consumable;
pub mod enemy;
pub mod player;

use crate::core::geometry::Rect;

pub use consumable::Consumable;
pub use enemy::Enemy;
pub use player::{AttackWindow, Player};

/// Read-only level geometry handed to every controller for one tick.
#[derive(Debug, Clone, Copy)]
pub struct LevelGeometry<'a> {
    /// Static colliders of the current map.
    pub collisions: &'a [Rect],
    /// The whole map in world space.
    pub bounds: Rect,
    pub gravity: f32,
}
