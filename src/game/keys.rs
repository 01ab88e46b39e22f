//! Keyboard and mouse input handling for the game.
//!
//! This module defines the [`GameKey`] enum for abstracting game actions from physical keys,
//! and provides [`KeyState`] for tracking pressed keys between frames. Once per frame the
//! key state is folded into an [`InputSnapshot`], which is the only input the game logic sees.
//! It also includes utilities for mapping from winit key events to game actions.

use std::collections::HashSet;
use winit::keyboard;

/// Enum representing all possible in-game actions that can be triggered by keyboard or mouse input.
///
/// This abstraction allows the game logic to be decoupled from specific physical keys or buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Left mouse button, swings the axe.
    Chop,
    /// Move player forward (W or Up Arrow).
    MoveForward,
    /// Move player backward (S or Down Arrow).
    MoveBackward,
    /// Move player left (A or Left Arrow).
    MoveLeft,
    /// Move player right (D or Right Arrow).
    MoveRight,
    /// Sprint (Shift or Ctrl).
    Sprint,
    /// Leave the title screen (Enter).
    Start,
    /// Accept the quest (Y).
    AcceptQuest,
    /// Quit the game (Escape).
    Quit,
}

/// Everything the game logic needs to know about input for one frame.
///
/// `start_game` and `accept_quest` are edges: they are true only on the first
/// snapshot after the key went down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Forward held.
    pub forward: bool,
    /// Backward held.
    pub backward: bool,
    /// Strafe left held.
    pub left: bool,
    /// Strafe right held.
    pub right: bool,
    /// Sprint modifier held.
    pub sprint: bool,
    /// Chop input held.
    pub chop_held: bool,
    /// Accept key went down since the previous snapshot.
    pub accept_quest: bool,
    /// Start key went down since the previous snapshot.
    pub start_game: bool,
    /// Raw mouse travel accumulated since the previous snapshot.
    pub orbit_delta: (f64, f64),
}

impl InputSnapshot {
    /// Whether any movement key is held.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Tracks the set of currently pressed game keys.
///
/// Use [`press_key`](KeyState::press_key) and [`release_key`](KeyState::release_key) to
/// update the state, and [`is_pressed`](KeyState::is_pressed) to query.
/// [`snapshot`](KeyState::snapshot) produces the per-frame [`InputSnapshot`] and consumes
/// the pending edges and mouse travel.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
    /// Keys that went down since the last snapshot.
    just_pressed: HashSet<GameKey>,
    /// Mouse travel since the last snapshot.
    mouse_delta: (f64, f64),
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as pressed.
    ///
    /// OS key repeat does not produce a second edge while the key stays down.
    pub fn press_key(&mut self, key: GameKey) {
        if self.pressed_keys.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Adds raw mouse motion to the pending orbit delta.
    pub fn add_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        self.mouse_delta.0 += delta_x;
        self.mouse_delta.1 += delta_y;
    }

    /// Folds the current key state into an [`InputSnapshot`].
    ///
    /// Pending edges and mouse travel are consumed, so each press and each pixel
    /// of motion is seen by exactly one frame.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            forward: self.is_pressed(GameKey::MoveForward),
            backward: self.is_pressed(GameKey::MoveBackward),
            left: self.is_pressed(GameKey::MoveLeft),
            right: self.is_pressed(GameKey::MoveRight),
            sprint: self.is_pressed(GameKey::Sprint),
            chop_held: self.is_pressed(GameKey::Chop),
            accept_quest: self.just_pressed.contains(&GameKey::AcceptQuest),
            start_game: self.just_pressed.contains(&GameKey::Start),
            orbit_delta: self.mouse_delta,
        };
        self.just_pressed.clear();
        self.mouse_delta = (0.0, 0.0);
        snapshot
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it matches a mapped action.
///
/// Supports both named keys (arrows, shift, control, enter, escape) and character keys (WASD, Y).
///
/// # Arguments
/// * `key` - The winit key event to convert.
///
/// # Returns
/// * `Some(GameKey)` if the key maps to a game action.
/// * `None` otherwise.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::MoveLeft,
            ArrowRight => GameKey::MoveRight,
            Shift => GameKey::Sprint,
            Control => GameKey::Sprint,
            Enter => GameKey::Start,
            Escape => GameKey::Quit,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
            "y" => GameKey::AcceptQuest,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key, NamedKey, SmolStr};

    /// An edge is reported once, then disappears even though the key is still held.
    #[test]
    fn test_start_edge_is_consumed() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::Start);
        assert!(keys.snapshot().start_game);
        assert!(!keys.snapshot().start_game);
        assert!(keys.is_pressed(GameKey::Start));
    }

    /// Key repeat while held does not create a new edge.
    #[test]
    fn test_repeat_press_no_edge() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::AcceptQuest);
        keys.snapshot();
        keys.press_key(GameKey::AcceptQuest);
        assert!(!keys.snapshot().accept_quest);

        keys.release_key(GameKey::AcceptQuest);
        keys.press_key(GameKey::AcceptQuest);
        assert!(keys.snapshot().accept_quest);
    }

    /// A tap shorter than a frame still counts as an edge.
    #[test]
    fn test_tap_between_frames() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::Start);
        keys.release_key(GameKey::Start);
        let input = keys.snapshot();
        assert!(input.start_game);
    }

    #[test]
    fn test_mouse_delta_accumulates_and_resets() {
        let mut keys = KeyState::new();
        keys.add_mouse_motion(3.0, -1.0);
        keys.add_mouse_motion(2.0, 4.0);
        assert_eq!(keys.snapshot().orbit_delta, (5.0, 3.0));
        assert_eq!(keys.snapshot().orbit_delta, (0.0, 0.0));
    }

    #[test]
    fn test_held_keys_reported() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::MoveForward);
        keys.press_key(GameKey::Sprint);
        keys.press_key(GameKey::Chop);
        let input = keys.snapshot();
        assert!(input.forward && input.sprint && input.chop_held);
        assert!(input.is_moving());
        assert!(!input.backward && !input.left && !input.right);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            winit_key_to_game_key(&Key::Character(SmolStr::new("W"))),
            Some(GameKey::MoveForward)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Character(SmolStr::new("y"))),
            Some(GameKey::AcceptQuest)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::Control)),
            Some(GameKey::Sprint)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::Enter)),
            Some(GameKey::Start)
        );
        assert_eq!(winit_key_to_game_key(&Key::Character(SmolStr::new("q"))), None);
    }
}
