//! Background decoration
//!
//! Stars twinkle in place; menu screens add a handful of slow meteors.
//! Nothing here collides or scores.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::Meteor;
use super::spawn;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Star {
    pub position: Vec2,
    /// Sprite scale
    pub size: f32,
    /// Base alpha in 0..=1
    pub brightness: f32,
    phase: f32,
    /// Twinkle rate (radians per second)
    speed: f32,
}

impl Star {
    fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            position: Vec2::new(
                rng.random_range(0.0..SCREEN_WIDTH),
                rng.random_range(0.0..SCREEN_HEIGHT),
            ),
            size: rng.random_range(0.3..1.0),
            brightness: rng.random_range(0.4..1.0),
            phase: rng.random_range(0.0..TAU),
            speed: rng.random_range(1.0..4.0),
        }
    }

    /// Current alpha including twinkle
    pub fn alpha(&self) -> f32 {
        (self.brightness * (0.75 + 0.25 * self.phase.sin())).clamp(0.0, 1.0)
    }

    fn update(&mut self, dt: f32) {
        self.phase = (self.phase + self.speed * dt) % TAU;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn new<R: Rng>(rng: &mut R, count: usize) -> Self {
        Self {
            stars: (0..count).map(|_| Star::random(rng)).collect(),
        }
    }

    pub fn update(&mut self, dt: f32) {
        for star in &mut self.stars {
            star.update(dt);
        }
    }
}

/// Title and GameOver background: stars plus a few slow meteors
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub starfield: Starfield,
    pub meteors: Vec<Meteor>,
    rng: Pcg32,
}

impl Backdrop {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::new(&mut rng, tuning.star_count);
        Self::with_starfield(rng, starfield)
    }

    /// Reuse an existing starfield (GameOver keeps the game's stars)
    pub fn from_starfield(seed: u64, starfield: Starfield) -> Self {
        Self::with_starfield(Pcg32::seed_from_u64(seed), starfield)
    }

    fn with_starfield(rng: Pcg32, starfield: Starfield) -> Self {
        Self {
            starfield,
            meteors: Vec::new(),
            rng,
        }
    }

    /// Top up to the meteor limit, one per tick, then move everything
    pub fn update(&mut self, tuning: &Tuning, dt: f32) {
        if self.meteors.len() < tuning.backdrop_meteor_count {
            let meteor =
                spawn::large_meteor(&mut self.rng, tuning, tuning.backdrop_meteor_velocity);
            self.meteors.push(meteor);
        }
        for meteor in &mut self.meteors {
            meteor.update();
        }
        self.starfield.update(dt);
    }
}
