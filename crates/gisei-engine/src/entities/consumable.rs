use crate::api::types::EntityId;
use crate::core::geometry::Rect;
use crate::core::scene::Identified;
use crate::map::ConsumableSpawn;

/// A static pickup. Consumed exactly once: the session removes it from the
/// active set on the tick the player touches it.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumable {
    pub id: EntityId,
    pub kind: String,
    pub heal: i32,
    pub sound: Option<String>,
    pub rect: Rect,
}

impl Consumable {
    pub fn from_spawn(id: EntityId, spawn: &ConsumableSpawn, size: f32) -> Self {
        Self {
            id,
            kind: spawn.kind.clone(),
            heal: spawn.heal,
            sound: spawn.sound.clone(),
            rect: Rect::new(spawn.position.x, spawn.position.y, size, size),
        }
    }
}

impl Identified for Consumable {
    fn id(&self) -> EntityId {
        self.id
    }
}
