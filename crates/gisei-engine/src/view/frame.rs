use glam::Vec2;

use crate::api::types::{Facing, SessionEvent};
use crate::components::animation::AnimState;
use crate::core::geometry::Rect;
use crate::entities::{Consumable, Enemy, Player};
use crate::view::camera::Camera;

/// What the screen should show for the player right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Alive,
    /// Death animation playing over the level.
    Dying,
    /// Animation done; the death screen is up until the automatic respawn.
    DeathScreen,
}

impl PlayerPhase {
    pub fn code(self) -> u32 {
        match self {
            PlayerPhase::Alive => 0,
            PlayerPhase::Dying => 1,
            PlayerPhase::DeathScreen => 2,
        }
    }
}

/// Copy of the player state Presentation draws from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub rect: Rect,
    pub state: AnimState,
    pub frame: usize,
    pub facing: Facing,
    pub health: i32,
    pub max_health: i32,
    pub phase: PlayerPhase,
    /// Debug overlay of the current swing.
    pub attack_hitbox: Option<Rect>,
}

impl PlayerView {
    pub fn of(player: &Player) -> Self {
        let phase = if !player.dead {
            PlayerPhase::Alive
        } else if player.death_animation_done {
            PlayerPhase::DeathScreen
        } else {
            PlayerPhase::Dying
        };
        Self {
            rect: player.rect(),
            state: player.animator.state,
            frame: player.animator.frame_index,
            facing: player.facing,
            health: player.health,
            max_health: player.max_health(),
            phase,
            attack_hitbox: player.attack_hitbox(),
        }
    }

    /// Health as a fraction of the maximum, for the health bar.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// Read-only snapshot of one simulated tick. Borrowed from the session, so
/// it lives only as long as the `present` call.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub tick: u64,
    pub map_id: &'a str,
    pub level_index: usize,
    pub map_size: Vec2,
    pub camera: Camera,
    pub player: PlayerView,
    pub enemies: &'a [Enemy],
    pub consumables: &'a [Consumable],
    pub events: &'a [SessionEvent],
}

impl FrameView<'_> {
    /// Whether the level itself (map, enemies) should be drawn.
    pub fn shows_level(&self) -> bool {
        self.player.phase != PlayerPhase::DeathScreen
    }

    /// Whether pickups and the HUD should be drawn. Hidden while dying.
    pub fn shows_hud(&self) -> bool {
        self.player.phase == PlayerPhase::Alive
    }

    pub fn to_screen(&self, rect: &Rect) -> Rect {
        self.camera.apply(rect)
    }
}
