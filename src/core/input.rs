use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// A discrete key transition delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Pressed(Direction),
    Released(Direction),
}

/// Latched directional input, consumed once per frame.
///
/// A direction stays held from its press until the matching release,
/// independent of frame timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(direction) => self.press(direction),
            InputEvent::Released(direction) => self.release(direction),
        }
    }

    pub fn press(&mut self, direction: Direction) {
        *self.slot(direction) = true;
    }

    pub fn release(&mut self, direction: Direction) {
        *self.slot(direction) = false;
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.left && !self.right
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_holds_until_release() {
        let mut input = InputState::default();
        assert!(input.is_idle());

        input.apply(InputEvent::Pressed(Direction::Right));
        assert!(input.is_held(Direction::Right));
        assert!(!input.is_held(Direction::Left));

        // repeats are idempotent
        input.apply(InputEvent::Pressed(Direction::Right));
        assert!(input.right);

        input.apply(InputEvent::Released(Direction::Right));
        assert!(input.is_idle());
    }

    #[test]
    fn test_both_directions_independent() {
        let mut input = InputState::default();
        input.press(Direction::Left);
        input.press(Direction::Right);
        input.release(Direction::Left);

        assert_eq!(input, InputState { left: false, right: true });

        input.clear();
        assert!(input.is_idle());
    }
}
