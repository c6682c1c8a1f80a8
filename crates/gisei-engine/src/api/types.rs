use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a spawned enemy or consumable.
/// IDs are never reused within a session, across level transitions included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Horizontal facing of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Enemy archetype. Only picks the base color; stats come from the spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Wolf,
    Slime,
    Boss,
}

impl EnemyKind {
    /// RGB tint Presentation uses in place of a sprite.
    pub fn base_color(self) -> [u8; 3] {
        match self {
            EnemyKind::Wolf => [120, 120, 120],
            EnemyKind::Slime => [0, 200, 50],
            EnemyKind::Boss => [200, 0, 0],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Wolf => "wolf",
            EnemyKind::Slime => "slime",
            EnemyKind::Boss => "boss",
        }
    }

    /// Stable numeric code for the wire buffer.
    pub fn code(self) -> u32 {
        match self {
            EnemyKind::Wolf => 0,
            EnemyKind::Slime => 1,
            EnemyKind::Boss => 2,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnemyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wolf" => Ok(EnemyKind::Wolf),
            "slime" => Ok(EnemyKind::Slime),
            "boss" => Ok(EnemyKind::Boss),
            other => Err(other.to_string()),
        }
    }
}

/// Which channel a player health loss came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    /// Touching an enemy. Gated by the invulnerability window.
    Contact,
    /// Periodic environmental drain. Not gated.
    Drain,
}

/// Something Presentation may want to react to (sounds, HUD flashes).
/// Collected during a tick and cleared at the start of the next one.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    EnemyHit { id: EntityId, damage: i32 },
    EnemyKilled { id: EntityId, kind: EnemyKind },
    PlayerDamaged { amount: i32, source: DamageSource },
    ConsumablePicked {
        id: EntityId,
        kind: String,
        heal: i32,
        sound: Option<String>,
    },
    PlayerDied,
    PlayerRespawned,
    LevelChanged { from: String, to: String, index: usize },
    GameCompleted,
}

impl SessionEvent {
    pub const KIND_ENEMY_HIT: u32 = 1;
    pub const KIND_ENEMY_KILLED: u32 = 2;
    pub const KIND_PLAYER_DAMAGED: u32 = 3;
    pub const KIND_CONSUMABLE_PICKED: u32 = 4;
    pub const KIND_PLAYER_DIED: u32 = 5;
    pub const KIND_PLAYER_RESPAWNED: u32 = 6;
    pub const KIND_LEVEL_CHANGED: u32 = 7;
    pub const KIND_GAME_COMPLETED: u32 = 8;

    /// Flatten into the fixed four-float wire record. Strings are dropped;
    /// hosts that need them read the [`SessionEvent`] directly.
    pub fn to_wire(&self) -> WireEvent {
        let (kind, a, b, c) = match self {
            SessionEvent::EnemyHit { id, damage } => {
                (Self::KIND_ENEMY_HIT, id.0 as f32, *damage as f32, 0.0)
            }
            SessionEvent::EnemyKilled { id, kind } => {
                (Self::KIND_ENEMY_KILLED, id.0 as f32, kind.code() as f32, 0.0)
            }
            SessionEvent::PlayerDamaged { amount, source } => {
                let channel = match source {
                    DamageSource::Contact => 0.0,
                    DamageSource::Drain => 1.0,
                };
                (Self::KIND_PLAYER_DAMAGED, *amount as f32, channel, 0.0)
            }
            SessionEvent::ConsumablePicked { id, heal, .. } => {
                (Self::KIND_CONSUMABLE_PICKED, id.0 as f32, *heal as f32, 0.0)
            }
            SessionEvent::PlayerDied => (Self::KIND_PLAYER_DIED, 0.0, 0.0, 0.0),
            SessionEvent::PlayerRespawned => (Self::KIND_PLAYER_RESPAWNED, 0.0, 0.0, 0.0),
            SessionEvent::LevelChanged { index, .. } => {
                (Self::KIND_LEVEL_CHANGED, *index as f32, 0.0, 0.0)
            }
            SessionEvent::GameCompleted => (Self::KIND_GAME_COMPLETED, 0.0, 0.0, 0.0),
        };
        WireEvent {
            kind: kind as f32,
            a,
            b,
            c,
        }
    }
}

/// A session event as written to the shared frame buffer.
/// `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WireEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WireEvent {
    pub const FLOATS: usize = 4;
}
