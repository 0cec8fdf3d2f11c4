//! Input routing
//!
//! Browser events are folded into an [`InputState`] between frames; each
//! frame takes a [`TickInput`] snapshot. Keyboard, pointer and touch all feed
//! the same fire request, so every trigger goes through one cooldown gate.

use glam::Vec2;

use crate::sim::TickInput;

/// A game action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

impl Control {
    /// Map a `KeyboardEvent` (`key`, `code`) to a control
    pub fn from_key(key: &str, code: &str) -> Option<Self> {
        if code == "Space" || key == " " {
            return Some(Control::Fire);
        }
        match key {
            "ArrowLeft" | "a" | "A" => Some(Control::Left),
            "ArrowRight" | "d" | "D" => Some(Control::Right),
            "ArrowUp" | "w" | "W" => Some(Control::Up),
            "ArrowDown" | "s" | "S" => Some(Control::Down),
            _ => None,
        }
    }

    fn slot(self) -> Option<usize> {
        match self {
            Control::Left => Some(0),
            Control::Right => Some(1),
            Control::Up => Some(2),
            Control::Down => Some(3),
            Control::Fire => None,
        }
    }
}

/// Accumulated input between two frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Left, right, up, down
    held: [bool; 4],
    pointer_active: bool,
    last_pointer: Vec2,
    drag: Vec2,
    fire_queued: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the browser default must be suppressed (space scrolls)
    pub fn key_down(&mut self, key: &str, code: &str, running: bool) -> bool {
        match Control::from_key(key, code) {
            Some(Control::Fire) => {
                if running {
                    self.fire_queued = true;
                }
                true
            }
            Some(control) => {
                if let Some(slot) = control.slot() {
                    self.held[slot] = true;
                }
                false
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str, code: &str) {
        if let Some(slot) = Control::from_key(key, code).and_then(Control::slot) {
            self.held[slot] = false;
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2, running: bool) {
        self.pointer_active = true;
        self.last_pointer = pos;
        if running {
            self.fire_queued = true;
        }
    }

    /// Drag the ship by the pointer's movement while held
    pub fn pointer_move(&mut self, pos: Vec2) {
        if !self.pointer_active {
            return;
        }
        self.drag += pos - self.last_pointer;
        self.last_pointer = pos;
    }

    pub fn pointer_up(&mut self) {
        self.pointer_active = false;
    }

    /// Touches only engage while a session is running
    pub fn touch_start(&mut self, pos: Option<Vec2>, running: bool) {
        if !running {
            return;
        }
        if let Some(pos) = pos {
            self.pointer_active = true;
            self.last_pointer = pos;
        }
        self.fire_queued = true;
    }

    pub fn touch_move(&mut self, pos: Option<Vec2>) {
        if let Some(pos) = pos {
            self.pointer_move(pos);
        }
    }

    pub fn touch_end(&mut self) {
        self.pointer_active = false;
    }

    /// Focus lost: keyup events will never arrive for held keys
    pub fn blur(&mut self) {
        self.held = [false; 4];
        self.pointer_active = false;
    }

    /// Drop queued one-shot input (new session)
    pub fn clear_pending(&mut self) {
        self.drag = Vec2::ZERO;
        self.fire_queued = false;
    }

    /// Snapshot for the next frame, consuming drag and fire requests
    pub fn take(&mut self) -> TickInput {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        let input = TickInput {
            movement: Vec2::new(
                axis(self.held[0], self.held[1]),
                axis(self.held[2], self.held[3]),
            ),
            keys_held: self.held.iter().any(|&held| held),
            pointer_delta: self.drag,
            pointer_active: self.pointer_active,
            fire: self.fire_queued,
        };
        self.clear_pending();
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Control::from_key("ArrowLeft", "ArrowLeft"), Some(Control::Left));
        assert_eq!(Control::from_key("d", "KeyD"), Some(Control::Right));
        assert_eq!(Control::from_key(" ", "Space"), Some(Control::Fire));
        assert_eq!(Control::from_key("x", "KeyX"), None);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut input = InputState::new();
        input.key_down("ArrowLeft", "ArrowLeft", true);
        input.key_down("ArrowRight", "ArrowRight", true);
        input.key_down("w", "KeyW", true);
        let tick = input.take();
        assert_eq!(tick.movement, Vec2::new(0.0, -1.0));
        assert!(tick.moving());

        // Left and right cancel, but both keys are still held
        input.key_up("w", "KeyW");
        let tick = input.take();
        assert_eq!(tick.movement, Vec2::ZERO);
        assert!(tick.keys_held);
        assert!(tick.moving());

        input.key_up("ArrowLeft", "ArrowLeft");
        input.key_up("ArrowRight", "ArrowRight");
        assert!(!input.take().moving());
    }

    #[test]
    fn test_space_fires_once_and_prevents_default() {
        let mut input = InputState::new();
        assert!(input.key_down(" ", "Space", true));
        assert!(input.take().fire);
        assert!(!input.take().fire);

        // Not running: still swallowed, but no shot queued
        assert!(input.key_down(" ", "Space", false));
        assert!(!input.take().fire);
    }

    #[test]
    fn test_pointer_drag_accumulates() {
        let mut input = InputState::new();
        input.pointer_move(Vec2::new(50.0, 50.0));
        assert_eq!(input.take().pointer_delta, Vec2::ZERO);

        input.pointer_down(Vec2::new(100.0, 100.0), true);
        input.pointer_move(Vec2::new(110.0, 95.0));
        input.pointer_move(Vec2::new(120.0, 90.0));
        let tick = input.take();
        assert!(tick.fire);
        assert!(tick.pointer_active);
        assert_eq!(tick.pointer_delta, Vec2::new(20.0, -10.0));

        input.pointer_up();
        let tick = input.take();
        assert!(!tick.pointer_active);
        assert_eq!(tick.pointer_delta, Vec2::ZERO);
    }

    #[test]
    fn test_touch_ignored_when_not_running() {
        let mut input = InputState::new();
        input.touch_start(Some(Vec2::new(10.0, 10.0)), false);
        let tick = input.take();
        assert!(!tick.pointer_active);
        assert!(!tick.fire);

        input.touch_start(Some(Vec2::new(10.0, 10.0)), true);
        input.touch_move(Some(Vec2::new(15.0, 30.0)));
        input.touch_end();
        let tick = input.take();
        assert!(tick.fire);
        assert_eq!(tick.pointer_delta, Vec2::new(5.0, 20.0));
        assert!(!tick.pointer_active);
    }

    #[test]
    fn test_blur_releases_keys() {
        let mut input = InputState::new();
        input.key_down("s", "KeyS", true);
        input.pointer_down(Vec2::ZERO, false);
        input.blur();
        let tick = input.take();
        assert!(!tick.moving());
        assert!(!tick.pointer_active);
    }
}
