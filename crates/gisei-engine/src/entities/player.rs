use std::time::Duration;

use glam::Vec2;

use crate::api::game::PlayerTuning;
use crate::api::types::{DamageSource, Facing, SessionEvent};
use crate::components::animation::{AnimState, AnimationDef, AnimationSet, Animator};
use crate::core::geometry::Rect;
use crate::core::physics::Body;
use crate::entities::{Enemy, LevelGeometry};
use crate::input::state::InputSnapshot;

/// An in-progress swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackWindow {
    pub started_at: Duration,
    /// Set on the first tick the hit-box exists, hit or miss.
    pub has_hit: bool,
    /// Rebuilt every tick on the side the player currently faces.
    pub hitbox: Option<Rect>,
}

/// The player character: movement, jumping, the attack window, health with
/// an invulnerability window, death and respawn.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: i32,
    pub facing: Facing,
    pub animator: Animator,
    pub attack: Option<AttackWindow>,
    pub last_damage_at: Option<Duration>,
    pub dead: bool,
    pub death_animation_done: bool,
    pub death_started_at: Option<Duration>,
    spawn: Vec2,
    tuning: PlayerTuning,
    animations: AnimationSet,
}

impl Player {
    pub fn new(spawn: Vec2, tuning: PlayerTuning, animations: AnimationSet) -> Self {
        let rect = Rect::new(spawn.x, spawn.y, tuning.width, tuning.height);
        Self {
            body: Body::new(rect),
            health: tuning.max_health,
            facing: Facing::Right,
            animator: Animator::default(),
            attack: None,
            last_damage_at: None,
            dead: false,
            death_animation_done: false,
            death_started_at: None,
            spawn,
            tuning,
            animations,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    pub fn max_health(&self) -> i32 {
        self.tuning.max_health
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Where `respawn` puts the player from now on.
    pub fn set_spawn(&mut self, spawn: Vec2) {
        self.spawn = spawn;
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    /// The active attack hit-box, if the swing has reached its striking frames.
    pub fn attack_hitbox(&self) -> Option<Rect> {
        self.attack.and_then(|w| w.hitbox)
    }

    pub fn is_invulnerable(&self, now: Duration) -> bool {
        match self.last_damage_at {
            Some(last) => now.saturating_sub(last) < self.tuning.invulnerability(),
            None => false,
        }
    }

    /// Move the top-left to `pos`, keeping velocity and health.
    pub fn place_at(&mut self, pos: Vec2) {
        self.body.rect.set_top_left(pos);
    }

    fn anim_def(&self, state: AnimState) -> AnimationDef {
        self.animations.def(state, self.tuning.ticks_per_frame)
    }

    /// Start a swing. No-op while already swinging or dead.
    pub fn attack(&mut self, now: Duration) {
        if self.dead || self.attack.is_some() {
            return;
        }
        self.attack = Some(AttackWindow {
            started_at: now,
            has_hit: false,
            hitbox: None,
        });
        self.animator.play(AnimState::Attacking);
    }

    /// Combat damage. Rejected while invulnerable or dead. Returns true if
    /// health was taken.
    pub fn take_damage(&mut self, amount: i32, now: Duration) -> bool {
        if self.dead || self.is_invulnerable(now) {
            return false;
        }
        self.health = (self.health - amount).max(0);
        self.last_damage_at = Some(now);
        if self.health == 0 {
            self.die(now);
        }
        true
    }

    /// Environmental drain. Ignores and does not restart the invulnerability
    /// window. Returns true if health was taken.
    pub fn drain(&mut self, amount: i32, now: Duration) -> bool {
        if self.dead || amount <= 0 {
            return false;
        }
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.die(now);
        }
        true
    }

    /// Restore up to `amount` health, capped at the maximum. Returns the
    /// amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.dead {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.tuning.max_health);
        self.health - before
    }

    /// Enter the dying state. Calling it again changes nothing.
    pub fn die(&mut self, now: Duration) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.death_animation_done = false;
        self.death_started_at = Some(now);
        self.attack = None;
        self.body.velocity = Vec2::ZERO;
        self.animator.play(AnimState::Dying);
        log::debug!("player died at {:?}", now);
    }

    /// Back to the spawn point with full health.
    pub fn respawn(&mut self) {
        self.body.reset_at(self.spawn);
        self.health = self.tuning.max_health;
        self.dead = false;
        self.death_animation_done = false;
        self.death_started_at = None;
        self.attack = None;
        self.animator.play(AnimState::Idle);
        log::debug!("player respawned at {:?}", self.spawn);
    }

    /// One simulation tick. Damage dealt to enemies and taken from them is
    /// reported through `events`.
    pub fn update(
        &mut self,
        input: InputSnapshot,
        level: &LevelGeometry<'_>,
        enemies: &mut [Enemy],
        now: Duration,
        events: &mut Vec<SessionEvent>,
    ) {
        if self.dead {
            self.update_dying(now);
            return;
        }

        if input.attack {
            self.attack(now);
        }

        self.body.velocity.x = if input.move_left {
            self.facing = Facing::Left;
            -self.tuning.speed
        } else if input.move_right {
            self.facing = Facing::Right;
            self.tuning.speed
        } else {
            0.0
        };

        if input.jump && self.body.grounded {
            self.body.velocity.y = self.tuning.jump_speed;
            self.body.grounded = false;
        }

        self.body.step_vertical(level.collisions, level.gravity);

        for enemy in enemies.iter() {
            if !enemy.rect.intersects(&self.body.rect) {
                continue;
            }
            if self.take_damage(enemy.damage, now) {
                events.push(SessionEvent::PlayerDamaged {
                    amount: enemy.damage,
                    source: DamageSource::Contact,
                });
            }
        }

        self.body.step_horizontal(level.collisions);
        if level.bounds.is_valid() {
            self.body.rect.clamp_inside(&level.bounds);
        }

        if self.dead {
            events.push(SessionEvent::PlayerDied);
            return;
        }

        let state = if self.attack.is_some() {
            AnimState::Attacking
        } else if !self.body.grounded {
            AnimState::Jumping
        } else if self.body.velocity.x != 0.0 {
            AnimState::Moving
        } else {
            AnimState::Idle
        };
        self.animator.play_if_different(state);
        let def = self.anim_def(state);
        self.animator.tick(&def);

        self.update_attack(enemies, now, events);
    }

    fn update_attack(&mut self, enemies: &mut [Enemy], now: Duration, events: &mut Vec<SessionEvent>) {
        let Some(mut window) = self.attack else {
            return;
        };

        let def = self.anim_def(AnimState::Attacking);
        if self.animator.is_finished(&def)
            && now.saturating_sub(window.started_at) >= self.tuning.attack_duration()
        {
            self.attack = None;
            self.animator.play(AnimState::Idle);
            return;
        }

        if self.animator.frame_index >= 1 {
            let rect = self.body.rect;
            let range = self.tuning.attack_range;
            let hitbox = match self.facing {
                Facing::Left => Rect::new(rect.left() - range, rect.top(), range, rect.height),
                Facing::Right => Rect::new(rect.right(), rect.top(), range, rect.height),
            };
            window.hitbox = Some(hitbox);

            if !window.has_hit {
                for enemy in enemies.iter_mut() {
                    if hitbox.intersects(&enemy.rect) {
                        enemy.take_damage(self.tuning.attack_damage);
                        events.push(SessionEvent::EnemyHit {
                            id: enemy.id,
                            damage: self.tuning.attack_damage,
                        });
                    }
                }
                window.has_hit = true;
            }
        }

        self.attack = Some(window);
    }

    fn update_dying(&mut self, now: Duration) {
        let def = self.anim_def(AnimState::Dying);
        self.animator.tick(&def);
        if self.death_animation_done || !self.animator.is_finished(&def) {
            return;
        }
        let started = self.death_started_at.unwrap_or(now);
        if now.saturating_sub(started) >= self.tuning.death_delay() {
            self.death_animation_done = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::EnemyTuning;
    use crate::api::types::{EnemyKind, EntityId};
    use crate::map::EnemySpawn;

    const TICK: Duration = Duration::from_nanos(16_666_667);

    fn floor() -> Rect {
        Rect::new(0.0, 164.0, 2000.0, 40.0)
    }

    fn spawn_player() -> Player {
        Player::new(
            Vec2::new(100.0, 100.0),
            PlayerTuning::default(),
            AnimationSet::default(),
        )
    }

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    /// Drive `ticks` updates starting at `start`, one fixed step apart.
    fn run(
        player: &mut Player,
        input: InputSnapshot,
        collisions: &[Rect],
        enemies: &mut [Enemy],
        start: Duration,
        ticks: u32,
    ) -> (Duration, Vec<SessionEvent>) {
        let level = LevelGeometry {
            collisions,
            bounds: Rect::new(0.0, 0.0, 2000.0, 600.0),
            gravity: 0.8,
        };
        let mut now = start;
        let mut events = Vec::new();
        for _ in 0..ticks {
            player.update(input, &level, enemies, now, &mut events);
            now += TICK;
        }
        (now, events)
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        let spawn = EnemySpawn::new(Vec2::new(x, y), EnemyKind::Wolf).with_speed(0.0);
        Enemy::from_spawn(EntityId(1), &spawn, &EnemyTuning::default())
    }

    #[test]
    fn invulnerability_window_blocks_second_hit() {
        let mut player = spawn_player();
        assert!(player.take_damage(10, Duration::ZERO));
        assert!(!player.take_damage(10, secs(0.5)));
        assert_eq!(player.health, 90, "second hit inside the window must be ignored");
        assert!(player.take_damage(10, secs(1.0)));
        assert_eq!(player.health, 80);
    }

    #[test]
    fn drain_ignores_invulnerability() {
        let mut player = spawn_player();
        player.take_damage(10, Duration::ZERO);
        assert!(player.drain(1, secs(0.2)));
        assert_eq!(player.health, 89);
        assert_eq!(player.last_damage_at, Some(Duration::ZERO), "drain must not restart the window");
    }

    #[test]
    fn damage_floors_at_zero_and_kills() {
        let mut player = spawn_player();
        player.take_damage(250, secs(3.0));
        assert_eq!(player.health, 0);
        assert!(player.dead);
        assert_eq!(player.animator.state, AnimState::Dying);
        assert!(!player.take_damage(5, secs(10.0)), "dead players take no damage");
    }

    #[test]
    fn die_is_idempotent() {
        let mut player = spawn_player();
        player.die(secs(2.0));
        let started = player.death_started_at;
        player.die(secs(3.0));
        assert_eq!(player.death_started_at, started);
        assert_eq!(started, Some(secs(2.0)));
    }

    #[test]
    fn attack_while_attacking_is_ignored() {
        let mut player = spawn_player();
        player.attack(secs(1.0));
        player.attack(secs(1.2));
        assert_eq!(player.attack.map(|w| w.started_at), Some(secs(1.0)));
    }

    #[test]
    fn walks_and_faces_input_direction() {
        let mut player = spawn_player();
        let collisions = [floor()];
        run(&mut player, InputSnapshot::left(), &collisions, &mut [], Duration::ZERO, 10);
        assert_eq!(player.facing, Facing::Left);
        assert!((player.rect().x - 60.0).abs() < 1e-3);
        assert!(player.body.grounded);
        assert_eq!(player.animator.state, AnimState::Moving);
    }

    #[test]
    fn left_wins_over_right() {
        let mut player = spawn_player();
        let input = InputSnapshot {
            move_left: true,
            move_right: true,
            ..InputSnapshot::NONE
        };
        run(&mut player, input, &[floor()], &mut [], Duration::ZERO, 1);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn jump_only_from_the_ground() {
        let mut player = spawn_player();
        let collisions = [floor()];
        run(&mut player, InputSnapshot::NONE, &collisions, &mut [], Duration::ZERO, 2);
        assert!(player.body.grounded);

        run(&mut player, InputSnapshot::jump(), &collisions, &mut [], Duration::ZERO, 1);
        let after_jump = player.body.velocity.y;
        assert!((after_jump - (-15.0 + 0.8)).abs() < 1e-4, "vy = {}", after_jump);
        assert!(!player.body.grounded);
        assert_eq!(player.animator.state, AnimState::Jumping);

        run(&mut player, InputSnapshot::jump(), &collisions, &mut [], Duration::ZERO, 1);
        assert!(
            (player.body.velocity.y - (after_jump + 0.8)).abs() < 1e-4,
            "no double jump"
        );
    }

    #[test]
    fn attack_hits_each_enemy_once_per_swing() {
        let mut player = spawn_player();
        let collisions = [floor()];
        // Player spans x 100..132; the hit-box spans 132..162.
        let mut enemies = vec![enemy_at(140.0, 100.0)];
        let (now, _) = run(&mut player, InputSnapshot::NONE, &collisions, &mut enemies, Duration::ZERO, 2);

        let (now, first) = run(&mut player, InputSnapshot::attack(), &collisions, &mut enemies, now, 1);
        assert!(player.is_attacking());
        let (_, rest) = run(&mut player, InputSnapshot::NONE, &collisions, &mut enemies, now, 60);

        let hits = first
            .iter()
            .chain(rest.iter())
            .filter(|e| matches!(e, SessionEvent::EnemyHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(enemies[0].health, 80);
        assert!(!player.is_attacking(), "swing should be over after 0.5s");
        assert!(player.attack_hitbox().is_none());
    }

    #[test]
    fn attack_hits_every_enemy_in_reach_once() {
        let mut player = spawn_player();
        let collisions = [floor()];
        let mut enemies = vec![enemy_at(136.0, 100.0), enemy_at(150.0, 100.0)];
        enemies[1].id = EntityId(2);
        let (now, _) = run(&mut player, InputSnapshot::NONE, &collisions, &mut enemies, Duration::ZERO, 2);

        let (now, first) = run(&mut player, InputSnapshot::attack(), &collisions, &mut enemies, now, 1);
        let (_, rest) = run(&mut player, InputSnapshot::NONE, &collisions, &mut enemies, now, 60);

        let mut hit_ids: Vec<u32> = first
            .iter()
            .chain(rest.iter())
            .filter_map(|e| match e {
                SessionEvent::EnemyHit { id, damage: 20 } => Some(id.0),
                _ => None,
            })
            .collect();
        hit_ids.sort_unstable();
        assert_eq!(hit_ids, vec![1, 2]);
        assert!(enemies.iter().all(|e| e.health == 80), "each enemy takes 20 exactly once");
    }

    #[test]
    fn turning_as_the_swing_starts_strikes_the_new_side() {
        let mut player = spawn_player();
        let collisions = [floor()];
        // Player spans x 100..132 facing right; the wolf spans 60..92 behind it.
        let mut enemies = vec![enemy_at(60.0, 100.0)];
        let (now, _) = run(&mut player, InputSnapshot::NONE, &collisions, &mut enemies, Duration::ZERO, 2);
        assert_eq!(player.facing, Facing::Right);

        let input = InputSnapshot {
            move_left: true,
            attack: true,
            ..InputSnapshot::NONE
        };
        let (now, _) = run(&mut player, input, &collisions, &mut enemies, now, 1);
        run(&mut player, InputSnapshot::NONE, &collisions, &mut enemies, now, 6);

        assert_eq!(player.facing, Facing::Left);
        let hitbox = player.attack_hitbox().expect("swing should have a hit-box by now");
        assert_eq!(hitbox.right(), player.rect().left());
        assert_eq!(enemies[0].health, 80);
    }

    #[test]
    fn hitbox_appears_from_second_frame_on_the_leading_edge() {
        let mut player = spawn_player();
        let collisions = [floor()];
        run(&mut player, InputSnapshot::NONE, &collisions, &mut [], Duration::ZERO, 2);
        player.facing = Facing::Left;

        let (now, _) = run(&mut player, InputSnapshot::attack(), &collisions, &mut [], Duration::ZERO, 1);
        assert!(player.attack_hitbox().is_none(), "frame 0 has no hit-box");

        run(&mut player, InputSnapshot::NONE, &collisions, &mut [], now, 4);
        let hitbox = player.attack_hitbox().expect("hit-box on frame 1");
        let rect = player.rect();
        assert_eq!(hitbox.right(), rect.left());
        assert_eq!(hitbox.width, 30.0);
        assert_eq!(hitbox.height, rect.height);
    }

    #[test]
    fn swing_holds_last_frame_until_duration_elapses() {
        let mut player = spawn_player();
        let collisions = [floor()];
        run(&mut player, InputSnapshot::NONE, &collisions, &mut [], Duration::ZERO, 2);
        player.attack(Duration::ZERO);

        // Four frames at five ticks each reach the last frame after 15 ticks,
        // well before 0.5s of clock time if the clock barely moves.
        let level = LevelGeometry {
            collisions: &collisions,
            bounds: Rect::new(0.0, 0.0, 2000.0, 600.0),
            gravity: 0.8,
        };
        let mut events = Vec::new();
        for _ in 0..40 {
            player.update(InputSnapshot::NONE, &level, &mut [], secs(0.1), &mut events);
        }
        assert!(player.is_attacking());
        assert_eq!(player.animator.frame_index, 3);

        player.update(InputSnapshot::NONE, &level, &mut [], secs(0.5), &mut events);
        assert!(!player.is_attacking());
        assert_eq!(player.animator.state, AnimState::Idle);
    }

    #[test]
    fn contact_damage_respects_invulnerability() {
        let mut player = spawn_player();
        let collisions = [floor()];
        let mut enemies = vec![enemy_at(110.0, 100.0)];
        let (_, events) = run(&mut player, InputSnapshot::NONE, &collisions, &mut enemies, Duration::ZERO, 30);
        let contact = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::PlayerDamaged { source: DamageSource::Contact, .. }))
            .count();
        assert_eq!(contact, 1, "30 ticks is half a second: one hit only");
        assert_eq!(player.health, 90);
    }

    #[test]
    fn dead_player_ignores_input() {
        let mut player = spawn_player();
        let collisions = [floor()];
        run(&mut player, InputSnapshot::NONE, &collisions, &mut [], Duration::ZERO, 2);
        let before = player.rect();
        player.die(Duration::ZERO);
        run(&mut player, InputSnapshot::right(), &collisions, &mut [], Duration::ZERO, 10);
        run(&mut player, InputSnapshot::attack(), &collisions, &mut [], Duration::ZERO, 1);
        assert_eq!(player.rect(), before);
        assert!(!player.is_attacking());
    }

    #[test]
    fn death_animation_needs_last_frame_and_five_seconds() {
        let mut player = spawn_player();
        player.die(Duration::ZERO);

        // Six frames at ten ticks each: the last frame is reached after 50 ticks.
        run(&mut player, InputSnapshot::NONE, &[], &mut [], secs(6.0), 40);
        assert!(!player.death_animation_done, "last frame not reached yet");

        let mut early = spawn_player();
        early.die(Duration::ZERO);
        run(&mut early, InputSnapshot::NONE, &[], &mut [], Duration::ZERO, 100);
        assert!(!early.death_animation_done, "five seconds have not passed");
        run(&mut early, InputSnapshot::NONE, &[], &mut [], secs(5.0), 1);
        assert!(early.death_animation_done);
    }

    #[test]
    fn respawn_restores_spawn_and_health() {
        let mut player = spawn_player();
        let collisions = [floor()];
        run(&mut player, InputSnapshot::right(), &collisions, &mut [], Duration::ZERO, 20);
        player.take_damage(100, secs(1.0));
        assert!(player.dead);
        run(&mut player, InputSnapshot::NONE, &collisions, &mut [], secs(7.0), 100);
        assert!(player.death_animation_done);

        player.respawn();
        assert_eq!(player.health, 100);
        assert_eq!(player.rect().top_left(), Vec2::new(100.0, 100.0));
        assert_eq!(player.body.velocity, Vec2::ZERO);
        assert!(!player.dead);
        assert!(!player.death_animation_done);
        assert!(player.death_started_at.is_none());
        assert_eq!(player.animator.state, AnimState::Idle);
    }

    #[test]
    fn heal_is_capped_at_max() {
        let mut player = spawn_player();
        player.take_damage(30, Duration::ZERO);
        assert_eq!(player.heal(50), 30);
        assert_eq!(player.health, 100);
    }

    #[test]
    fn stays_inside_map_bounds() {
        let mut player = spawn_player();
        player.place_at(Vec2::new(5.0, 100.0));
        run(&mut player, InputSnapshot::left(), &[floor()], &mut [], Duration::ZERO, 10);
        assert_eq!(player.rect().x, 0.0);
    }
}
