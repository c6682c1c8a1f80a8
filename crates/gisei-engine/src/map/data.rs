use glam::Vec2;

use crate::api::types::EnemyKind;
use crate::core::geometry::Rect;

pub const DEFAULT_ENEMY_SPEED: f32 = 2.0;
pub const DEFAULT_ENEMY_HEALTH: i32 = 100;
pub const DEFAULT_CONSUMABLE_KIND: &str = "fish";
pub const DEFAULT_HEAL_AMOUNT: i32 = 50;

/// Where an enemy starts and what it starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    /// Top-left of the enemy's visual rect.
    pub position: Vec2,
    pub kind: EnemyKind,
    pub speed: f32,
    pub health: i32,
}

impl EnemySpawn {
    pub fn new(position: Vec2, kind: EnemyKind) -> Self {
        Self {
            position,
            kind,
            speed: DEFAULT_ENEMY_SPEED,
            health: DEFAULT_ENEMY_HEALTH,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }
}

/// A pickup placed in the level.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumableSpawn {
    pub position: Vec2,
    pub kind: String,
    pub heal: i32,
    /// Sound name Presentation plays on pickup, if any.
    pub sound: Option<String>,
}

impl ConsumableSpawn {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            kind: DEFAULT_CONSUMABLE_KIND.to_string(),
            heal: DEFAULT_HEAL_AMOUNT,
            sound: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_heal(mut self, heal: i32) -> Self {
        self.heal = heal;
        self
    }
}

/// Everything the simulation needs from one level. Immutable once built;
/// the session shares it behind an `Arc` and swaps it wholesale on
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    pub id: String,
    /// Grid size in tiles.
    pub tiles_wide: u32,
    pub tiles_high: u32,
    /// Tile size in pixels.
    pub tile_width: u32,
    pub tile_height: u32,
    pub spawn: Vec2,
    pub collisions: Vec<Rect>,
    pub enemies: Vec<EnemySpawn>,
    pub consumables: Vec<ConsumableSpawn>,
    pub level_end: Option<Rect>,
}

impl MapData {
    /// An empty level of `tiles_wide` x `tiles_high` tiles with the spawn at
    /// the origin.
    pub fn new(
        id: impl Into<String>,
        tiles_wide: u32,
        tiles_high: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            tiles_wide,
            tiles_high,
            tile_width,
            tile_height,
            spawn: Vec2::ZERO,
            collisions: Vec::new(),
            enemies: Vec::new(),
            consumables: Vec::new(),
            level_end: None,
        }
    }

    pub fn with_spawn(mut self, spawn: Vec2) -> Self {
        self.spawn = spawn;
        self
    }

    pub fn with_collision(mut self, rect: Rect) -> Self {
        self.collisions.push(rect);
        self
    }

    pub fn with_enemy(mut self, spawn: EnemySpawn) -> Self {
        self.enemies.push(spawn);
        self
    }

    pub fn with_consumable(mut self, spawn: ConsumableSpawn) -> Self {
        self.consumables.push(spawn);
        self
    }

    pub fn with_level_end(mut self, rect: Rect) -> Self {
        self.level_end = Some(rect);
        self
    }

    pub fn pixel_width(&self) -> f32 {
        self.tiles_wide as f32 * self.tile_width as f32
    }

    pub fn pixel_height(&self) -> f32 {
        self.tiles_high as f32 * self.tile_height as f32
    }

    /// The whole map in world space.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.pixel_width(), self.pixel_height())
    }
}
