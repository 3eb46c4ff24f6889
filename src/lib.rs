//! Meteor Storm - simulation core of a top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, scoring)
//! - `scene`: Title / Playing / LevelTransition / GameOver state machine
//! - `input`, `audio`, `render`: narrow interfaces to platform collaborators
//! - `highscores`: Persisted best score
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod input;
pub mod render;
pub mod scene;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use highscores::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
pub use scene::{Flow, Game, Scene, SceneKind};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Projectiles and aliens are dropped once this far outside the screen
    pub const OFF_SCREEN_MARGIN: f32 = 200.0;

    /// Hard bounds on the player's reserves
    pub const MAX_LIVES: u8 = 6;
    pub const MAX_SHIELDS: u8 = 3;
}

/// Center of the playfield
#[inline]
pub fn screen_center() -> Vec2 {
    Vec2::new(consts::SCREEN_WIDTH / 2.0, consts::SCREEN_HEIGHT / 2.0)
}

/// Unit vector a sprite points along for a given rotation.
///
/// Rotation 0 points up the screen (negative y); positive rotation turns clockwise.
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::new(rotation.sin(), -rotation.cos())
}

/// Rotation that points along `direction` (inverse of [`heading`])
#[inline]
pub fn rotation_toward(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x) + std::f32::consts::FRAC_PI_2
}

/// Toroidal screen wrap: leaving one edge re-enters at the opposite edge with
/// the perpendicular coordinate unchanged.
#[inline]
pub fn wrap_position(mut pos: Vec2) -> Vec2 {
    use consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

    if pos.x >= SCREEN_WIDTH {
        pos.x = 0.0;
    } else if pos.x < 0.0 {
        pos.x = SCREEN_WIDTH;
    }

    if pos.y >= SCREEN_HEIGHT {
        pos.y = 0.0;
    } else if pos.y < 0.0 {
        pos.y = SCREEN_HEIGHT;
    }

    pos
}

/// True when `pos` lies inside the screen rectangle
#[inline]
pub fn is_on_screen(pos: Vec2) -> bool {
    pos.x >= 0.0 && pos.x < consts::SCREEN_WIDTH && pos.y >= 0.0 && pos.y < consts::SCREEN_HEIGHT
}

/// True when `pos` is further than [`consts::OFF_SCREEN_MARGIN`] outside the screen
#[inline]
pub fn is_far_off_screen(pos: Vec2) -> bool {
    let m = consts::OFF_SCREEN_MARGIN;
    pos.x < -m
        || pos.x > consts::SCREEN_WIDTH + m
        || pos.y < -m
        || pos.y > consts::SCREEN_HEIGHT + m
}

/// Fixed-timestep accumulator.
///
/// Feed it wall-clock frame deltas; it reports how many simulation ticks to run.
#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return the number of `SIM_DT` ticks due.
    ///
    /// Frames longer than 100ms are clamped, and at most `MAX_SUBSTEPS` ticks are
    /// returned; any excess is dropped rather than carried forward.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= consts::SIM_DT && substeps < consts::MAX_SUBSTEPS {
            self.accumulator -= consts::SIM_DT;
            substeps += 1;
        }
        if substeps == consts::MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(consts::SIM_DT);
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::consts::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_each_edge() {
        assert_eq!(wrap_position(Vec2::new(SCREEN_WIDTH, 100.0)), Vec2::new(0.0, 100.0));
        assert_eq!(wrap_position(Vec2::new(-0.5, 100.0)), Vec2::new(SCREEN_WIDTH, 100.0));
        assert_eq!(wrap_position(Vec2::new(40.0, SCREEN_HEIGHT + 3.0)), Vec2::new(40.0, 0.0));
        assert_eq!(wrap_position(Vec2::new(40.0, -1.0)), Vec2::new(40.0, SCREEN_HEIGHT));
    }

    #[test]
    fn test_heading_round_trip() {
        let up = heading(0.0);
        assert!(up.x.abs() < 1e-6 && (up.y + 1.0).abs() < 1e-6);

        let right = heading(std::f32::consts::FRAC_PI_2);
        assert!((right.x - 1.0).abs() < 1e-6);

        let dir = Vec2::new(-3.0, 4.0).normalize();
        let back = heading(rotation_toward(dir));
        assert!((back - dir).length() < 1e-5);
    }

    #[test]
    fn test_far_off_screen() {
        assert!(!is_far_off_screen(Vec2::new(-150.0, 10.0)));
        assert!(is_far_off_screen(Vec2::new(-250.0, 10.0)));
        assert!(is_far_off_screen(Vec2::new(10.0, SCREEN_HEIGHT + 201.0)));
    }

    #[test]
    fn test_fixed_timestep_caps_substeps() {
        let mut step = FixedTimestep::new();
        assert_eq!(step.advance(SIM_DT * 2.5), 2);
        // A huge hitch is clamped, never more than MAX_SUBSTEPS
        assert!(step.advance(5.0) <= MAX_SUBSTEPS);
    }

    proptest! {
        #[test]
        fn prop_wrap_keeps_perpendicular(y in 0.0f32..SCREEN_HEIGHT, over in 0.0f32..50.0) {
            let wrapped = wrap_position(Vec2::new(SCREEN_WIDTH + over, y));
            prop_assert_eq!(wrapped.x, 0.0);
            prop_assert_eq!(wrapped.y, y);
        }

        #[test]
        fn prop_wrap_lands_on_screen_or_edge(x in -50.0f32..1330.0, y in -50.0f32..770.0) {
            let p = wrap_position(Vec2::new(x, y));
            prop_assert!(p.x >= 0.0 && p.x <= SCREEN_WIDTH);
            prop_assert!(p.y >= 0.0 && p.y <= SCREEN_HEIGHT);
        }
    }
}
