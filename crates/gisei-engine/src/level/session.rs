use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;

use crate::api::game::SimConfig;
use crate::api::types::{DamageSource, SessionEvent};
use crate::core::geometry::Rect;
use crate::entities::{Consumable, Enemy, LevelGeometry, Player};
use crate::input::state::InputSnapshot;
use crate::level::{IdAllocator, Level, LevelSequence};
use crate::map::{MapData, MapError, MapSource};
use crate::view::camera::Camera;
use crate::view::frame::{FrameView, PlayerView};

/// One play-through: the current level, the player, and the per-tick
/// orchestration between them.
///
/// The session never reads a clock or an input device. Callers pass the
/// input snapshot and the current time into [`LevelSession::tick`], along
/// with the map source used for level transitions.
pub struct LevelSession {
    config: SimConfig,
    sequence: LevelSequence,
    level: Level,
    player: Player,
    ids: IdAllocator,
    events: Vec<SessionEvent>,
    tick: u64,
    last_drain_at: Option<Duration>,
    death_screen_since: Option<Duration>,
    /// Transition target that failed to load. Not retried until the player
    /// leaves the level-end region.
    stalled_target: Option<String>,
    completed: bool,
}

impl LevelSession {
    /// Load the first configured level and place the player on its spawn.
    pub fn start(config: SimConfig, source: &dyn MapSource) -> Result<Self, MapError> {
        let sequence = LevelSequence::new(config.levels.clone());
        let first = sequence.current_id().ok_or(MapError::NoLevels)?;
        let map = source.load_map(first)?;
        log::info!("starting at level `{}`", map.id);

        let mut ids = IdAllocator::default();
        let level = Level::build(map, &config, &mut ids);
        let player = Player::new(level.spawn(), config.player.clone(), config.animations.clone());

        let mut session = Self {
            config,
            sequence,
            level,
            player,
            ids,
            events: Vec::new(),
            tick: 0,
            last_drain_at: None,
            death_screen_since: None,
            stalled_target: None,
            completed: false,
        };
        session.level.camera.follow(&session.player.rect());
        Ok(session)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn map(&self) -> &Arc<MapData> {
        &self.level.map
    }

    pub fn map_id(&self) -> &str {
        self.level.id()
    }

    pub fn level_index(&self) -> usize {
        self.sequence.index()
    }

    pub fn collisions(&self) -> &[Rect] {
        &self.level.map.collisions
    }

    pub fn enemies(&self) -> &[Enemy] {
        self.level.enemies.as_slice()
    }

    pub fn consumables(&self) -> &[Consumable] {
        self.level.consumables.as_slice()
    }

    pub fn camera(&self) -> &Camera {
        &self.level.camera
    }

    /// Events raised by the last tick.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Whether the level end of the last level has been reached.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self, input: InputSnapshot, source: &dyn MapSource, now: Duration) {
        self.events.clear();
        self.tick += 1;

        let map = Arc::clone(&self.level.map);
        let geometry = LevelGeometry {
            collisions: &map.collisions,
            bounds: map.bounds(),
            gravity: self.config.gravity,
        };

        self.player.update(
            input,
            &geometry,
            self.level.enemies.as_mut_slice(),
            now,
            &mut self.events,
        );

        for enemy in self.level.enemies.remove_where(Enemy::is_dead) {
            log::debug!("enemy {:?} ({}) killed", enemy.id, enemy.kind);
            self.events.push(SessionEvent::EnemyKilled {
                id: enemy.id,
                kind: enemy.kind,
            });
        }

        self.level.camera.follow(&self.player.rect());

        for enemy in self.level.enemies.iter_mut() {
            enemy.update(&geometry);
        }

        self.apply_drain(now);

        if !self.player.dead {
            self.collect_consumables();
            self.check_level_end(map.level_end, source);
        }

        self.update_death_screen(now);
    }

    /// Put the player back on the current level's spawn with full health.
    pub fn respawn_player(&mut self) {
        self.player.respawn();
        self.death_screen_since = None;
        self.level.camera.follow(&self.player.rect());
        self.events.push(SessionEvent::PlayerRespawned);
    }

    /// Snapshot for Presentation.
    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            tick: self.tick,
            map_id: self.level.id(),
            level_index: self.sequence.index(),
            map_size: Vec2::new(self.level.map.pixel_width(), self.level.map.pixel_height()),
            camera: self.level.camera,
            player: PlayerView::of(&self.player),
            enemies: self.level.enemies.as_slice(),
            consumables: self.level.consumables.as_slice(),
            events: &self.events,
        }
    }

    fn apply_drain(&mut self, now: Duration) {
        let Some(last) = self.last_drain_at else {
            self.last_drain_at = Some(now);
            return;
        };
        if now.saturating_sub(last) < self.config.drain_interval() {
            return;
        }
        self.last_drain_at = Some(now);

        let amount = self.config.drain_amount;
        if self.player.drain(amount, now) {
            self.events.push(SessionEvent::PlayerDamaged {
                amount,
                source: DamageSource::Drain,
            });
            if self.player.dead {
                self.events.push(SessionEvent::PlayerDied);
            }
        }
    }

    fn collect_consumables(&mut self) {
        let player_rect = self.player.rect();
        let picked = self
            .level
            .consumables
            .remove_where(|item| item.rect.intersects(&player_rect));

        for item in picked {
            let healed = self.player.heal(item.heal);
            log::debug!("picked up {} ({:?}), +{} health", item.kind, item.id, healed);
            self.events.push(SessionEvent::ConsumablePicked {
                id: item.id,
                kind: item.kind,
                heal: healed,
                sound: item.sound,
            });
        }
    }

    fn check_level_end(&mut self, level_end: Option<Rect>, source: &dyn MapSource) {
        let Some(end) = level_end else {
            return;
        };
        if !end.intersects(&self.player.rect()) {
            self.stalled_target = None;
            return;
        }
        self.advance_level(source);
    }

    fn advance_level(&mut self, source: &dyn MapSource) {
        let Some(next) = self.sequence.next_id().map(str::to_string) else {
            if !self.completed {
                self.completed = true;
                log::info!("reached the end of the last level `{}`", self.level.id());
                self.events.push(SessionEvent::GameCompleted);
            }
            return;
        };

        if self.stalled_target.as_deref() == Some(next.as_str()) {
            return;
        }

        let map = match source.load_map(&next) {
            Ok(map) => map,
            Err(err) => {
                log::error!("cannot enter level `{}`: {}", next, err);
                self.stalled_target = Some(next);
                return;
            }
        };

        let level = Level::build(map, &self.config, &mut self.ids);
        let from = self.level.id().to_string();
        self.level = level;
        self.sequence.advance();
        self.stalled_target = None;

        let spawn = self.level.spawn();
        self.player.set_spawn(spawn);
        self.player.place_at(spawn);
        self.level.camera.follow(&self.player.rect());

        log::info!("level `{}` -> `{}`", from, next);
        self.events.push(SessionEvent::LevelChanged {
            from,
            to: next,
            index: self.sequence.index(),
        });
    }

    fn update_death_screen(&mut self, now: Duration) {
        if !(self.player.dead && self.player.death_animation_done) {
            self.death_screen_since = None;
            return;
        }
        match self.death_screen_since {
            None => self.death_screen_since = Some(now),
            Some(since) if now.saturating_sub(since) >= self.config.death_screen() => {
                self.respawn_player();
            }
            Some(_) => {}
        }
    }
}
