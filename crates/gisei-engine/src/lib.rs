pub mod api;
pub mod core;
pub mod components;
pub mod entities;
pub mod map;
pub mod level;
pub mod view;
pub mod bridge;
pub mod input;

pub use glam::Vec2;

// Re-export key types at crate root for convenience
pub use api::game::{EnemyTuning, Presentation, PlayerTuning, SimConfig};
pub use api::types::{DamageSource, EnemyKind, EntityId, Facing, SessionEvent, WireEvent};
pub use components::animation::{AnimState, AnimationDef, AnimationSet, Animator};
pub use crate::core::geometry::{intersects, resolve, Axis, Rect, Resolution};
pub use crate::core::physics::{Body, StepContacts, DEFAULT_GRAVITY};
pub use crate::core::scene::{ActiveSet, Identified};
pub use crate::core::time::{Clock, FixedTimestep, ManualClock, SystemClock};
pub use entities::{AttackWindow, Consumable, Enemy, LevelGeometry, Player};
pub use map::{ConsumableSpawn, EnemySpawn, MapData, MapError, MapRegistry, MapSource};
pub use map::tiled::TiledMap;
pub use level::{Level, LevelSequence, LevelSession};
pub use view::camera::Camera;
pub use view::frame::{FrameView, PlayerPhase, PlayerView};
pub use bridge::protocol::{ProtocolLayout, RectInstance};
pub use input::state::{InputEvent, InputSnapshot, KeyBindings, KeyState};
