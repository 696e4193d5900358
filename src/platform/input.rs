//! Keyboard/joystick state folded into per-tick commands

use crate::sim::{Direction, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Other,
}

impl Key {
    /// Map a host key name (DOM-style or a single character)
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" | "w" | "W" => Key::Up,
            "ArrowDown" | "Down" | "s" | "S" => Key::Down,
            "ArrowLeft" | "Left" | "a" | "A" => Key::Left,
            "ArrowRight" | "Right" | "d" | "D" => Key::Right,
            " " | "Space" => Key::Space,
            _ => Key::Other,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Space | Key::Other => None,
        }
    }
}

/// Current input: held direction, force-hold flag and a pending start edge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    direction: Option<Direction>,
    hold: bool,
    start_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any key press also requests a start
    pub fn key_down(&mut self, key: Key) {
        if let Some(dir) = key.direction() {
            self.direction = Some(dir);
        }
        if key == Key::Space {
            self.hold = true;
        }
        self.start_requested = true;
    }

    /// Releasing a direction only clears it if it is the one currently held
    pub fn key_up(&mut self, key: Key) {
        if key.direction().is_some() && key.direction() == self.direction {
            self.direction = None;
        }
        if key == Key::Space {
            self.hold = false;
        }
    }

    /// Joystick-style direction (None when centered)
    pub fn set_direction(&mut self, direction: Option<Direction>) {
        self.direction = direction;
    }

    pub fn set_hold(&mut self, hold: bool) {
        self.hold = hold;
    }

    pub fn request_start(&mut self) {
        self.start_requested = true;
    }

    /// Consume the start edge
    pub fn take_start(&mut self) -> bool {
        std::mem::take(&mut self.start_requested)
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            direction: self.direction.unwrap_or(Direction::Hold),
            hold: self.hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_name("ArrowUp"), Key::Up);
        assert_eq!(Key::from_name("d"), Key::Right);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("q"), Key::Other);
    }

    #[test]
    fn test_hold_overrides_direction() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        assert_eq!(input.tick_input().command(), Direction::Left);
        input.key_down(Key::Space);
        assert_eq!(input.tick_input().command(), Direction::Hold);
        input.key_up(Key::Space);
        input.key_up(Key::Left);
        assert_eq!(input.tick_input().command(), Direction::Hold);
    }

    #[test]
    fn test_releasing_stale_key_keeps_newer_direction() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Up);
        input.key_up(Key::Left);
        assert_eq!(input.tick_input().command(), Direction::Up);
        input.key_up(Key::Up);
        assert_eq!(input.tick_input().command(), Direction::Hold);
    }

    #[test]
    fn test_joystick_hold_flag() {
        let mut input = InputState::new();
        input.set_direction(Some(Direction::Down));
        input.set_hold(true);
        assert_eq!(input.tick_input().command(), Direction::Hold);
        input.set_hold(false);
        assert_eq!(input.tick_input().command(), Direction::Down);
    }

    #[test]
    fn test_start_is_edge_triggered() {
        let mut input = InputState::new();
        assert!(!input.take_start());
        input.key_down(Key::Other);
        assert!(input.take_start());
        assert!(!input.take_start());
    }
}
