//! Tick-paced animation state.
//!
//! Frames advance on simulation ticks, not wall-clock time, so replays are
//! deterministic. Presentation maps `(state, facing, frame_index)` to images.

use serde::{Deserialize, Serialize};

/// Player animation state. Facing is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimState {
    #[default]
    Idle,
    Moving,
    Jumping,
    Attacking,
    Dying,
}

impl AnimState {
    /// Stable numeric code for the wire buffer.
    pub fn code(self) -> u32 {
        match self {
            AnimState::Idle => 0,
            AnimState::Moving => 1,
            AnimState::Jumping => 2,
            AnimState::Attacking => 3,
            AnimState::Dying => 4,
        }
    }
}

/// How one animation sequence plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDef {
    pub frame_count: usize,
    /// Ticks spent on each frame.
    pub ticks_per_frame: u32,
    pub looping: bool,
}

impl AnimationDef {
    pub fn looping(frame_count: usize, ticks_per_frame: u32) -> Self {
        Self {
            frame_count: frame_count.max(1),
            ticks_per_frame: ticks_per_frame.max(1),
            looping: true,
        }
    }

    pub fn once(frame_count: usize, ticks_per_frame: u32) -> Self {
        Self {
            looping: false,
            ..Self::looping(frame_count, ticks_per_frame)
        }
    }

    pub fn last_frame(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }
}

/// Frame counts per animation state, as authored in the sprite sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSet {
    pub idle: usize,
    pub moving: usize,
    pub jumping: usize,
    pub attack: usize,
    pub dying: usize,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self {
            idle: 4,
            moving: 6,
            jumping: 2,
            attack: 4,
            dying: 6,
        }
    }
}

impl AnimationSet {
    /// Definition for `state` at the given base pace. Attacks and deaths play
    /// once; death runs at half speed.
    pub fn def(&self, state: AnimState, ticks_per_frame: u32) -> AnimationDef {
        match state {
            AnimState::Idle => AnimationDef::looping(self.idle, ticks_per_frame),
            AnimState::Moving => AnimationDef::looping(self.moving, ticks_per_frame),
            AnimState::Jumping => AnimationDef::looping(self.jumping, ticks_per_frame),
            AnimState::Attacking => AnimationDef::once(self.attack, ticks_per_frame),
            AnimState::Dying => AnimationDef::once(self.dying, ticks_per_frame.saturating_mul(2)),
        }
    }
}

/// Playback cursor for a single animated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Animator {
    pub state: AnimState,
    pub frame_index: usize,
    /// Ticks spent on the current frame.
    pub frame_timer: u32,
}

impl Animator {
    /// Switch to `state` from frame 0.
    pub fn play(&mut self, state: AnimState) {
        self.state = state;
        self.frame_index = 0;
        self.frame_timer = 0;
    }

    /// Switch only if `state` differs from the current one.
    pub fn play_if_different(&mut self, state: AnimState) {
        if self.state != state {
            self.play(state);
        }
    }

    /// Whether a one-shot animation sits on its last frame.
    pub fn is_finished(&self, def: &AnimationDef) -> bool {
        !def.looping && self.frame_index >= def.last_frame()
    }

    /// Advance one tick. Returns true if the frame changed.
    ///
    /// One-shot animations stop on their last frame and stop counting.
    pub fn tick(&mut self, def: &AnimationDef) -> bool {
        if self.is_finished(def) {
            self.frame_index = def.last_frame();
            return false;
        }

        self.frame_timer += 1;
        if self.frame_timer < def.ticks_per_frame {
            return false;
        }

        self.frame_timer = 0;
        self.frame_index += 1;
        if self.frame_index >= def.frame_count {
            self.frame_index = if def.looping { 0 } else { def.last_frame() };
        }
        true
    }
}
