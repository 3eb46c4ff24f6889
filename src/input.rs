//! Keyboard input collaborator
//!
//! The platform layer reports which keys are held each frame; this module keeps
//! the previous frame's set for pressed/released edge detection and maps the
//! result onto a [`TickInput`].

use bitflags::bitflags;

use crate::sim::TickInput;

bitflags! {
    /// Keys the game listens to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Keys: u16 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        /// Thrust
        const UP = 1 << 2;
        /// Reverse
        const DOWN = 1 << 3;
        /// Fire, and start/continue on menu screens
        const SPACE = 1 << 4;
        /// Shield
        const S = 1 << 5;
        /// Hyperspace
        const H = 1 << 6;
        /// Quit from GameOver
        const Q = 1 << 7;
    }
}

/// Current and previous frame key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: Keys,
    previous: Keys,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame: the current set becomes the previous one
    pub fn begin_frame(&mut self) {
        self.previous = self.held;
    }

    /// Record a key as held or released for this frame
    pub fn set(&mut self, key: Keys, down: bool) {
        self.held.set(key, down);
    }

    /// Replace the whole held set for this frame
    pub fn set_held(&mut self, keys: Keys) {
        self.held = keys;
    }

    pub fn held(&self) -> Keys {
        self.held
    }

    pub fn is_held(&self, key: Keys) -> bool {
        self.held.contains(key)
    }

    pub fn just_pressed(&self, key: Keys) -> bool {
        self.held.contains(key) && !self.previous.contains(key)
    }

    pub fn just_released(&self, key: Keys) -> bool {
        !self.held.contains(key) && self.previous.contains(key)
    }

    /// Gameplay commands for one tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            rotate_left: self.is_held(Keys::LEFT),
            rotate_right: self.is_held(Keys::RIGHT),
            thrust: self.is_held(Keys::UP),
            thrust_released: self.just_released(Keys::UP),
            reverse: self.is_held(Keys::DOWN),
            fire: self.is_held(Keys::SPACE),
            shield: self.just_pressed(Keys::S),
            hyperspace: self.just_pressed(Keys::H),
        }
    }
}
