use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Discrete key events delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// Focus was lost; every held key counts as released.
    ReleaseAll,
}

/// Per-tick player intents. Held keys are continuous while true; the attack
/// intent is edge-gated by the player itself (re-triggering mid-swing is a no-op).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub attack: bool,
}

impl InputSnapshot {
    pub const NONE: Self = Self {
        move_left: false,
        move_right: false,
        jump: false,
        attack: false,
    };

    pub fn left() -> Self {
        Self { move_left: true, ..Self::NONE }
    }

    pub fn right() -> Self {
        Self { move_right: true, ..Self::NONE }
    }

    pub fn jump() -> Self {
        Self { jump: true, ..Self::NONE }
    }

    pub fn attack() -> Self {
        Self { attack: true, ..Self::NONE }
    }
}

/// Key codes (DOM `keyCode` values) mapped to each intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<u32>,
    pub right: Vec<u32>,
    pub jump: Vec<u32>,
    pub attack: Vec<u32>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            // A / ArrowLeft
            left: vec![65, 37],
            // D / ArrowRight
            right: vec![68, 39],
            // Space
            jump: vec![32],
            // E
            attack: vec![69],
        }
    }
}

/// Held keys, plus host events waiting to be folded in before the next
/// simulated step.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<u32>,
    pending: Vec<InputEvent>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event. It takes effect on the next [`KeyState::fold_pending`].
    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued events in arrival order.
    pub fn fold_pending(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            self.apply(event);
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code } => {
                self.held.insert(key_code);
            }
            InputEvent::KeyUp { key_code } => {
                self.held.remove(&key_code);
            }
            InputEvent::ReleaseAll => self.held.clear(),
        }
    }

    pub fn is_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    fn any_held(&self, codes: &[u32]) -> bool {
        codes.iter().any(|code| self.held.contains(code))
    }

    /// Current intents under `bindings`.
    pub fn snapshot(&self, bindings: &KeyBindings) -> InputSnapshot {
        InputSnapshot {
            move_left: self.any_held(&bindings.left),
            move_right: self.any_held(&bindings.right),
            jump: self.any_held(&bindings.jump),
            attack: self.any_held(&bindings.attack),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_map_to_intents() {
        let bindings = KeyBindings::default();
        let mut keys = KeyState::new();
        keys.apply(InputEvent::KeyDown { key_code: 37 });
        keys.apply(InputEvent::KeyDown { key_code: 32 });
        let snap = keys.snapshot(&bindings);
        assert!(snap.move_left);
        assert!(snap.jump);
        assert!(!snap.move_right);
        assert!(!snap.attack);
    }

    #[test]
    fn key_up_releases_intent() {
        let bindings = KeyBindings::default();
        let mut keys = KeyState::new();
        keys.apply(InputEvent::KeyDown { key_code: 69 });
        assert!(keys.snapshot(&bindings).attack);
        keys.apply(InputEvent::KeyUp { key_code: 69 });
        assert_eq!(keys.snapshot(&bindings), InputSnapshot::NONE);
    }

    #[test]
    fn pushed_events_wait_for_fold() {
        let bindings = KeyBindings::default();
        let mut keys = KeyState::new();
        keys.push(InputEvent::KeyDown { key_code: 68 });
        keys.push(InputEvent::KeyDown { key_code: 32 });
        keys.push(InputEvent::KeyUp { key_code: 32 });
        assert_eq!(keys.pending(), 3);
        assert_eq!(keys.snapshot(&bindings), InputSnapshot::NONE);

        keys.fold_pending();
        assert_eq!(keys.pending(), 0);
        assert_eq!(keys.snapshot(&bindings), InputSnapshot::right());
    }

    #[test]
    fn release_all_clears_everything() {
        let mut keys = KeyState::new();
        keys.apply(InputEvent::KeyDown { key_code: 65 });
        keys.apply(InputEvent::KeyDown { key_code: 68 });
        keys.apply(InputEvent::ReleaseAll);
        assert!(!keys.is_held(65));
        assert!(!keys.is_held(68));
    }
}
