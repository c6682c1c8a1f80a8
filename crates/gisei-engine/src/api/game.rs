use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::components::animation::AnimationSet;
use crate::input::state::KeyBindings;
use crate::view::frame::FrameView;

/// Player movement, combat and timing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed in units per tick.
    pub speed: f32,
    /// Vertical velocity applied on jump (negative is up).
    pub jump_speed: f32,
    pub max_health: i32,
    /// Reach of the attack hit-box beyond the leading edge.
    pub attack_range: f32,
    pub attack_damage: i32,
    pub attack_duration_secs: f32,
    pub invulnerability_secs: f32,
    /// Minimum time on the death animation before it counts as done.
    pub death_delay_secs: f32,
    /// Base animation pace.
    pub ticks_per_frame: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 64.0,
            speed: 4.0,
            jump_speed: -15.0,
            max_health: 100,
            attack_range: 30.0,
            attack_damage: 20,
            attack_duration_secs: 0.5,
            invulnerability_secs: 1.0,
            death_delay_secs: 5.0,
            ticks_per_frame: 5,
        }
    }
}

impl PlayerTuning {
    pub fn attack_duration(&self) -> Duration {
        secs(self.attack_duration_secs)
    }

    pub fn invulnerability(&self) -> Duration {
        secs(self.invulnerability_secs)
    }

    pub fn death_delay(&self) -> Duration {
        secs(self.death_delay_secs)
    }
}

/// Enemy body and AI constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub width: f32,
    pub height: f32,
    /// Hitbox inset from the visual rect on every side.
    pub hitbox_inset: f32,
    pub contact_damage: i32,
    /// Gap between the hitbox bottom and the ledge sensors.
    pub ledge_probe_offset: f32,
    /// Height of each ledge sensor.
    pub ledge_probe_depth: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 64.0,
            hitbox_inset: 5.0,
            contact_damage: 10,
            ledge_probe_offset: 5.0,
            ledge_probe_depth: 5.0,
        }
    }
}

/// Configuration for the simulation core. Every field has a default, so a
/// partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Gravity in units per tick².
    pub gravity: f32,
    /// Map identifiers in play order.
    pub levels: Vec<String>,
    pub drain_interval_secs: f32,
    pub drain_amount: i32,
    /// Time the death screen stays up before the automatic respawn.
    pub death_screen_secs: f32,
    pub consumable_size: f32,
    /// Entity records reserved in the wire buffer.
    pub max_entities_per_frame: usize,
    /// Event records reserved in the wire buffer.
    pub max_events: usize,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub animations: AnimationSet,
    pub keys: KeyBindings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            viewport_width: 640.0,
            viewport_height: 480.0,
            gravity: crate::core::physics::DEFAULT_GRAVITY,
            levels: vec!["level1_1".to_string(), "level2_1".to_string()],
            drain_interval_secs: 1.0,
            drain_amount: 1,
            death_screen_secs: 2.0,
            consumable_size: 32.0,
            max_entities_per_frame: 256,
            max_events: 32,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            animations: AnimationSet::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn drain_interval(&self) -> Duration {
        secs(self.drain_interval_secs)
    }

    pub fn death_screen(&self) -> Duration {
        secs(self.death_screen_secs)
    }
}

/// Negative or non-finite config values collapse to zero.
fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f32(value)
    } else {
        Duration::ZERO
    }
}

/// The drawing side of the game. Owns every pixel; the core only hands it
/// read-only frame snapshots.
pub trait Presentation {
    /// Called once per rendered frame with the state after the last tick.
    fn present(&mut self, frame: &FrameView<'_>);

    /// Called when a new level has been loaded, before its first frame.
    fn level_loaded(&mut self, _map_id: &str) {}
}
