pub mod sequence;
pub mod session;

use std::sync::Arc;

use glam::Vec2;

use crate::api::game::SimConfig;
use crate::api::types::EntityId;
use crate::core::scene::ActiveSet;
use crate::entities::{Consumable, Enemy};
use crate::map::MapData;
use crate::view::camera::Camera;

pub use sequence::LevelSequence;
pub use session::LevelSession;

/// Hands out entity IDs that are never reused for the life of a session.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Everything that belongs to one loaded map. Built complete, then swapped
/// into the session in a single assignment.
#[derive(Debug, Clone)]
pub struct Level {
    pub map: Arc<MapData>,
    pub enemies: ActiveSet<Enemy>,
    pub consumables: ActiveSet<Consumable>,
    pub camera: Camera,
}

impl Level {
    pub fn build(map: Arc<MapData>, config: &SimConfig, ids: &mut IdAllocator) -> Self {
        let mut enemies = ActiveSet::with_capacity(map.enemies.len());
        for spawn in &map.enemies {
            if spawn.health <= 0 {
                log::warn!(
                    "map `{}`: skipping {} at {:?} with no health",
                    map.id,
                    spawn.kind,
                    spawn.position
                );
                continue;
            }
            enemies.spawn(Enemy::from_spawn(ids.next(), spawn, &config.enemy));
        }

        let consumables = map
            .consumables
            .iter()
            .map(|spawn| Consumable::from_spawn(ids.next(), spawn, config.consumable_size))
            .collect();

        let camera = Camera::new(
            map.pixel_width(),
            map.pixel_height(),
            config.viewport_width,
            config.viewport_height,
        );

        Self {
            map,
            enemies,
            consumables,
            camera,
        }
    }

    pub fn id(&self) -> &str {
        &self.map.id
    }

    pub fn spawn(&self) -> Vec2 {
        self.map.spawn
    }
}
