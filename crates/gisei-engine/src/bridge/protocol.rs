//! Flat frame buffer shared with a JavaScript host.
//!
//! Layout (all values f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Instances: max_instances × 8 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Instance rects are viewport-relative. Capacities are written into the
//! header on every frame so the host can compute offsets itself.

use bytemuck::{Pod, Zeroable};

use crate::api::game::SimConfig;
use crate::api::types::WireEvent;
use crate::view::frame::{FrameView, PlayerPhase};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_EVENTS: usize = 4;
pub const HEADER_EVENT_COUNT: usize = 5;
pub const HEADER_CAMERA_X: usize = 6;
pub const HEADER_CAMERA_Y: usize = 7;
pub const HEADER_VIEWPORT_WIDTH: usize = 8;
pub const HEADER_VIEWPORT_HEIGHT: usize = 9;
pub const HEADER_MAP_WIDTH: usize = 10;
pub const HEADER_MAP_HEIGHT: usize = 11;
pub const HEADER_PLAYER_HEALTH: usize = 12;
pub const HEADER_PLAYER_MAX_HEALTH: usize = 13;
pub const HEADER_PLAYER_PHASE: usize = 14;
pub const HEADER_LEVEL_INDEX: usize = 15;

pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per rect instance (wire format, never changes).
pub const INSTANCE_FLOATS: usize = 8;

/// Floats per event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = WireEvent::FLOATS;

/// Values of [`RectInstance::layer`].
pub const LAYER_PLAYER: f32 = 0.0;
pub const LAYER_ENEMY: f32 = 1.0;
pub const LAYER_CONSUMABLE: f32 = 2.0;
pub const LAYER_ATTACK_HITBOX: f32 = 3.0;

/// One drawable rectangle. 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    /// Viewport-relative top-left.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// What is being drawn (`LAYER_*`).
    pub layer: f32,
    /// Animation state code for the player, enemy kind code for enemies.
    pub variant: f32,
    /// Animation frame index.
    pub frame: f32,
    /// -1 facing left, +1 facing right.
    pub facing: f32,
}

impl RectInstance {
    pub const FLOATS: usize = INSTANCE_FLOATS;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_events: usize,
    pub instance_data_offset: usize,
    pub event_data_offset: usize,
    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_instances: usize, max_events: usize) -> Self {
        let instance_data_offset = HEADER_FLOATS;
        let event_data_offset = instance_data_offset + max_instances * INSTANCE_FLOATS;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;
        Self {
            max_instances,
            max_events,
            instance_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.max_entities_per_frame, config.max_events)
    }

    /// A zeroed buffer of the right size.
    pub fn allocate(&self) -> Vec<f32> {
        vec![0.0; self.buffer_total_floats]
    }

    /// Write `frame` into `buffer`. Instances and events beyond capacity are
    /// dropped with a warning. Returns the instance count written.
    pub fn write_frame(&self, frame: &FrameView<'_>, frame_counter: u64, buffer: &mut [f32]) -> usize {
        if buffer.len() < self.buffer_total_floats {
            log::error!(
                "frame buffer too small: {} floats, need {}",
                buffer.len(),
                self.buffer_total_floats
            );
            return 0;
        }

        let instances = frame_instances(frame);
        let instance_count = instances.len().min(self.max_instances);
        if instance_count < instances.len() {
            log::warn!(
                "dropping {} rect instances over capacity {}",
                instances.len() - instance_count,
                self.max_instances
            );
        }
        let instance_end = self.instance_data_offset + instance_count * INSTANCE_FLOATS;
        buffer[self.instance_data_offset..instance_end]
            .copy_from_slice(bytemuck::cast_slice(&instances[..instance_count]));

        let events: Vec<WireEvent> = frame.events.iter().map(|e| e.to_wire()).collect();
        let event_count = events.len().min(self.max_events);
        if event_count < events.len() {
            log::warn!(
                "dropping {} events over capacity {}",
                events.len() - event_count,
                self.max_events
            );
        }
        let event_end = self.event_data_offset + event_count * EVENT_FLOATS;
        buffer[self.event_data_offset..event_end]
            .copy_from_slice(bytemuck::cast_slice(&events[..event_count]));

        let header = &mut buffer[..HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = frame_counter as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_INSTANCE_COUNT] = instance_count as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = event_count as f32;
        header[HEADER_CAMERA_X] = frame.camera.x;
        header[HEADER_CAMERA_Y] = frame.camera.y;
        header[HEADER_VIEWPORT_WIDTH] = frame.camera.viewport_width;
        header[HEADER_VIEWPORT_HEIGHT] = frame.camera.viewport_height;
        header[HEADER_MAP_WIDTH] = frame.map_size.x;
        header[HEADER_MAP_HEIGHT] = frame.map_size.y;
        header[HEADER_PLAYER_HEALTH] = frame.player.health as f32;
        header[HEADER_PLAYER_MAX_HEALTH] = frame.player.max_health as f32;
        header[HEADER_PLAYER_PHASE] = frame.player.phase.code() as f32;
        header[HEADER_LEVEL_INDEX] = frame.level_index as f32;

        instance_count
    }
}

/// Drawables in paint order: player, enemies, consumables, attack hit-box.
/// While dying only the player and enemies are shown; the death screen
/// shows nothing.
pub fn frame_instances(frame: &FrameView<'_>) -> Vec<RectInstance> {
    let mut out = Vec::with_capacity(2 + frame.enemies.len() + frame.consumables.len());
    if frame.player.phase == PlayerPhase::DeathScreen {
        return out;
    }

    let player = &frame.player;
    let rect = frame.to_screen(&player.rect);
    out.push(RectInstance {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        layer: LAYER_PLAYER,
        variant: player.state.code() as f32,
        frame: player.frame as f32,
        facing: player.facing.sign(),
    });

    for enemy in frame.enemies {
        let rect = frame.to_screen(&enemy.rect);
        out.push(RectInstance {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            layer: LAYER_ENEMY,
            variant: enemy.kind.code() as f32,
            frame: 0.0,
            facing: enemy.direction.sign(),
        });
    }

    if !frame.shows_hud() {
        return out;
    }

    for item in frame.consumables {
        let rect = frame.to_screen(&item.rect);
        out.push(RectInstance {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            layer: LAYER_CONSUMABLE,
            facing: 1.0,
            ..Default::default()
        });
    }

    if let Some(hitbox) = player.attack_hitbox {
        let rect = frame.to_screen(&hitbox);
        out.push(RectInstance {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            layer: LAYER_ATTACK_HITBOX,
            facing: player.facing.sign(),
            ..Default::default()
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EntityId, Facing, SessionEvent};
    use crate::components::animation::AnimState;
    use crate::core::geometry::Rect;
    use crate::entities::Consumable;
    use crate::map::ConsumableSpawn;
    use crate::view::camera::Camera;
    use crate::view::frame::PlayerView;
    use glam::Vec2;

    fn player_view(phase: PlayerPhase) -> PlayerView {
        PlayerView {
            rect: Rect::new(150.0, 100.0, 32.0, 64.0),
            state: AnimState::Moving,
            frame: 2,
            facing: Facing::Left,
            health: 75,
            max_health: 100,
            phase,
            attack_hitbox: None,
        }
    }

    fn camera() -> Camera {
        let mut cam = Camera::new(2000.0, 480.0, 640.0, 480.0);
        cam.x = 100.0;
        cam
    }

    #[test]
    fn default_config_layout() {
        let layout = ProtocolLayout::from_config(&SimConfig::default());
        assert_eq!(layout.max_instances, 256);
        assert_eq!(layout.max_events, 32);
        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(layout.event_data_offset, HEADER_FLOATS + 256 * 8);
        assert_eq!(layout.buffer_total_floats, HEADER_FLOATS + 256 * 8 + 32 * 4);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn instance_stride_matches_wire_format() {
        assert_eq!(std::mem::size_of::<RectInstance>(), RectInstance::STRIDE_BYTES);
    }

    #[test]
    fn writes_header_instances_and_events() {
        let consumables = vec![Consumable::from_spawn(
            EntityId(3),
            &ConsumableSpawn::new(Vec2::new(200.0, 132.0)),
            32.0,
        )];
        let events = vec![SessionEvent::PlayerDied];
        let frame = FrameView {
            tick: 9,
            map_id: "level1_1",
            level_index: 0,
            map_size: Vec2::new(2000.0, 480.0),
            camera: camera(),
            player: player_view(PlayerPhase::Alive),
            enemies: &[],
            consumables: &consumables,
            events: &events,
        };

        let layout = ProtocolLayout::new(8, 4);
        let mut buf = layout.allocate();
        let written = layout.write_frame(&frame, 42, &mut buf);

        assert_eq!(written, 2);
        assert_eq!(buf[HEADER_FRAME_COUNTER], 42.0);
        assert_eq!(buf[HEADER_INSTANCE_COUNT], 2.0);
        assert_eq!(buf[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(buf[HEADER_CAMERA_X], 100.0);
        assert_eq!(buf[HEADER_PLAYER_HEALTH], 75.0);

        let player = &buf[layout.instance_data_offset..layout.instance_data_offset + 8];
        assert_eq!(player, &[50.0, 100.0, 32.0, 64.0, LAYER_PLAYER, 1.0, 2.0, -1.0]);

        let event = &buf[layout.event_data_offset..layout.event_data_offset + 4];
        assert_eq!(event[0], SessionEvent::KIND_PLAYER_DIED as f32);
    }

    #[test]
    fn death_screen_draws_nothing() {
        let frame = FrameView {
            tick: 0,
            map_id: "x",
            level_index: 0,
            map_size: Vec2::new(640.0, 480.0),
            camera: camera(),
            player: player_view(PlayerPhase::DeathScreen),
            enemies: &[],
            consumables: &[],
            events: &[],
        };
        assert!(frame_instances(&frame).is_empty());
    }

    #[test]
    fn over_capacity_is_truncated() {
        let consumables: Vec<Consumable> = (0..5)
            .map(|i| {
                Consumable::from_spawn(EntityId(i), &ConsumableSpawn::new(Vec2::ZERO), 32.0)
            })
            .collect();
        let frame = FrameView {
            tick: 0,
            map_id: "x",
            level_index: 0,
            map_size: Vec2::new(640.0, 480.0),
            camera: camera(),
            player: player_view(PlayerPhase::Alive),
            enemies: &[],
            consumables: &consumables,
            events: &[],
        };
        let layout = ProtocolLayout::new(3, 1);
        let mut buf = layout.allocate();
        assert_eq!(layout.write_frame(&frame, 0, &mut buf), 3);
        assert_eq!(buf[HEADER_INSTANCE_COUNT], 3.0);
    }
}
