use glam::Vec2;

use crate::api::game::EnemyTuning;
use crate::api::types::{EnemyKind, EntityId, Facing};
use crate::core::geometry::Rect;
use crate::core::physics::Body;
use crate::core::scene::Identified;
use crate::entities::LevelGeometry;
use crate::map::EnemySpawn;

/// A patrolling enemy. Walks at constant speed, turns around at walls and
/// ledges, and is removed from play once its health reaches zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub health: i32,
    /// Walking speed in units per tick.
    pub speed: f32,
    pub direction: Facing,
    /// Damage dealt to the player on contact.
    pub damage: i32,
    /// Visual bounds, also used for contact and attack overlap.
    pub rect: Rect,
    /// Collision body; `body.rect` is the hitbox.
    pub body: Body,
    rect_offset: Vec2,
    probe_offset: f32,
    probe_depth: f32,
}

impl Enemy {
    /// Build an enemy from its spawn descriptor. The visual rect's top-left
    /// sits on the spawn point; the hitbox is inset on every side.
    pub fn from_spawn(id: EntityId, spawn: &EnemySpawn, tuning: &EnemyTuning) -> Self {
        let rect = Rect::new(spawn.position.x, spawn.position.y, tuning.width, tuning.height);
        let inset = tuning
            .hitbox_inset
            .clamp(0.0, (tuning.width.min(tuning.height) - 1.0).max(0.0) / 2.0);
        let hitbox = Rect::new(
            rect.x + inset,
            rect.y + inset,
            rect.width - 2.0 * inset,
            rect.height - 2.0 * inset,
        );
        Self {
            id,
            kind: spawn.kind,
            health: spawn.health.max(0),
            speed: spawn.speed,
            direction: Facing::Right,
            damage: tuning.contact_damage,
            rect,
            body: Body::new(hitbox),
            rect_offset: Vec2::new(inset, inset),
            probe_offset: tuning.ledge_probe_offset,
            probe_depth: tuning.ledge_probe_depth,
        }
    }

    pub fn hitbox(&self) -> Rect {
        self.body.rect
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Subtract `amount` from health. Returns true if this killed the enemy.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = !self.is_dead();
        self.health -= amount;
        was_alive && self.is_dead()
    }

    /// One patrol tick: walk, fall, then turn around at walls and ledges.
    pub fn update(&mut self, level: &LevelGeometry<'_>) {
        self.body.velocity.x = self.speed * self.direction.sign();
        let contacts = self.body.step(level.collisions, level.gravity);
        if contacts.hit_wall {
            self.turn_around();
        }

        if self.body.grounded && !self.ground_ahead(level.collisions) {
            self.turn_around();
        }

        self.rect.set_top_left(self.body.rect.top_left() - self.rect_offset);
    }

    /// The 1-unit sensors just outside each bottom corner of the hitbox.
    pub fn ledge_sensors(&self) -> (Rect, Rect) {
        let hitbox = self.body.rect;
        let y = hitbox.bottom() + self.probe_offset;
        let left = Rect::new(hitbox.left() - 1.0, y, 1.0, self.probe_depth);
        let right = Rect::new(hitbox.right(), y, 1.0, self.probe_depth);
        (left, right)
    }

    /// Whether the sensor on the side we are walking toward rests on ground.
    fn ground_ahead(&self, collisions: &[Rect]) -> bool {
        let (left, right) = self.ledge_sensors();
        let sensor = match self.direction {
            Facing::Left => left,
            Facing::Right => right,
        };
        collisions.iter().any(|r| sensor.intersects(r))
    }

    fn turn_around(&mut self) {
        self.direction = match self.direction {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        };
    }
}

impl Identified for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }
}
