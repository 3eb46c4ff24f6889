//! Spawn and attack scheduling
//!
//! Timers deciding *when* meteors and aliens appear, plus the geometry deciding
//! *where*. All randomness comes from the caller's seeded RNG.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::{Alien, Meteor, MeteorSize};
use super::timer::Timer;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::tuning::Tuning;
use crate::{rotation_toward, screen_center};

/// Sprite variants available per entity kind
pub const METEOR_VARIANTS: u8 = 4;
pub const ALIEN_VARIANTS: u8 = 3;

/// Large-meteor pacing for the current level
#[derive(Debug, Clone)]
pub struct MeteorSchedule {
    pub spawn_timer: Timer,
    pub speed_up_timer: Timer,
    /// Current base speed for new meteors (pixels per tick)
    pub base_velocity: f32,
    /// Large meteors this level will spawn
    pub meteors_per_level: u32,
    /// Never decremented within a level
    pub spawned_this_level: u32,
}

impl MeteorSchedule {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_timer: Timer::new(tuning.meteor_spawn_interval),
            speed_up_timer: Timer::new(tuning.meteor_speedup_interval),
            base_velocity: tuning.base_meteor_velocity,
            meteors_per_level: tuning.meteors_per_level_start,
            spawned_this_level: 0,
        }
    }

    /// Advance the timers. Returns true when one large meteor should spawn.
    pub fn update(&mut self, tuning: &Tuning, dt: f32) -> bool {
        self.speed_up_timer.update(dt);
        if self.speed_up_timer.is_ready() {
            self.speed_up_timer.reset();
            self.base_velocity += tuning.meteor_speedup_amount;
        }

        self.spawn_timer.update(dt);
        if !self.spawn_timer.is_ready() {
            return false;
        }
        self.spawn_timer.reset();

        if self.spawned_this_level < self.meteors_per_level {
            self.spawned_this_level += 1;
            true
        } else {
            false
        }
    }

    pub fn cap_reached(&self) -> bool {
        self.spawned_this_level >= self.meteors_per_level
    }

    /// Raise the cap for the next level and start counting again
    pub fn advance_level(&mut self, tuning: &Tuning) {
        self.meteors_per_level += tuning.meteors_per_level_step;
        self.spawned_this_level = 0;
    }

    /// Restart the current level's pacing (after a death)
    pub fn restart_level(&mut self, tuning: &Tuning) {
        self.spawned_this_level = 0;
        self.base_velocity = tuning.base_meteor_velocity;
        self.spawn_timer.reset();
        self.speed_up_timer.reset();
    }
}

/// Alien arrival and volley pacing
#[derive(Debug, Clone)]
pub struct AlienSchedule {
    pub spawn_timer: Timer,
    pub attack_timer: Timer,
}

impl AlienSchedule {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn_timer: Timer::new(tuning.alien_spawn_interval),
            attack_timer: Timer::new(tuning.alien_attack_interval),
        }
    }

    /// True when a new alien should appear. Only runs while none is alive.
    pub fn should_spawn<R: Rng>(
        &mut self,
        alien_alive: bool,
        tuning: &Tuning,
        rng: &mut R,
        dt: f32,
    ) -> bool {
        if alien_alive {
            return false;
        }
        self.spawn_timer.update(dt);
        if !self.spawn_timer.is_ready() {
            return false;
        }
        self.spawn_timer.reset();
        rng.random::<f32>() > tuning.alien_spawn_suppression
    }

    /// True when every live alien should fire a volley
    pub fn should_attack(&mut self, alien_alive: bool, dt: f32) -> bool {
        if !alien_alive {
            self.attack_timer.reset();
            return false;
        }
        self.attack_timer.update(dt);
        if self.attack_timer.is_ready() {
            self.attack_timer.reset();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.spawn_timer.reset();
        self.attack_timer.reset();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatNote {
    Low,
    High,
}

/// Ambient two-note beat that speeds up as it plays
#[derive(Debug, Clone)]
pub struct Beat {
    pub timer: Timer,
    pub next: BeatNote,
}

impl Beat {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            timer: Timer::new(tuning.beat_interval_start),
            next: BeatNote::Low,
        }
    }

    /// Advance; returns the note to play when the beat fires
    pub fn update(&mut self, tuning: &Tuning, dt: f32) -> Option<BeatNote> {
        self.timer.update(dt);
        if !self.timer.is_ready() {
            return None;
        }

        let note = self.next;
        self.next = match note {
            BeatNote::Low => BeatNote::High,
            BeatNote::High => BeatNote::Low,
        };
        let interval =
            (self.timer.duration - tuning.beat_interval_step).max(tuning.beat_interval_floor);
        self.timer.restart(interval);
        Some(note)
    }
}

fn random_rotation_speed<R: Rng>(rng: &mut R, tuning: &Tuning) -> f32 {
    let max = tuning.meteor_rotation_speed_max;
    rng.random_range(-max..=max)
}

fn unit(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Large meteor on the spawn circle beyond the screen corners, aimed at center
pub fn large_meteor<R: Rng>(rng: &mut R, tuning: &Tuning, base_velocity: f32) -> Meteor {
    let center = screen_center();
    let angle = rng.random_range(0.0..TAU);
    let position = center + unit(angle) * tuning.meteor_spawn_radius;
    let speed = base_velocity + rng.random::<f32>() * tuning.meteor_velocity_jitter;

    Meteor {
        position,
        movement: (center - position).normalize_or_zero() * speed,
        rotation: 0.0,
        rotation_speed: random_rotation_speed(rng, tuning),
        size: MeteorSize::Large,
        variant: rng.random_range(0..METEOR_VARIANTS),
        entered: false,
    }
}

/// Fragments of a destroyed large meteor: `0..=max_small_meteors` of them
pub fn small_meteors<R: Rng>(
    rng: &mut R,
    tuning: &Tuning,
    origin: Vec2,
    base_velocity: f32,
) -> Vec<Meteor> {
    let count = rng.random_range(0..=tuning.max_small_meteors);
    let scatter = tuning.small_meteor_scatter;

    (0..count)
        .map(|_| {
            let offset = Vec2::new(
                rng.random_range(-scatter..=scatter),
                rng.random_range(-scatter..=scatter),
            );
            let direction = unit(rng.random_range(0.0..TAU));
            let speed = base_velocity + rng.random::<f32>() * tuning.meteor_velocity_jitter;
            Meteor {
                position: origin + offset,
                movement: direction * speed,
                rotation: 0.0,
                rotation_speed: random_rotation_speed(rng, tuning),
                size: MeteorSize::Small,
                variant: rng.random_range(0..METEOR_VARIANTS),
                entered: true,
            }
        })
        .collect()
}

/// A new alien: enters from the right, from the left, or homes on `target`
pub fn alien<R: Rng>(rng: &mut R, tuning: &Tuning, target: Vec2) -> Alien {
    let variant = rng.random_range(0..ALIEN_VARIANTS);
    let lane_y = || 100.0..SCREEN_HEIGHT;

    match rng.random_range(0..3u8) {
        0 => {
            let speed =
                tuning.base_alien_velocity + rng.random::<f32>() * tuning.alien_velocity_jitter;
            Alien {
                position: Vec2::new(SCREEN_WIDTH + 100.0, rng.random_range(lane_y())),
                movement: Vec2::new(-speed, 0.0),
                intelligent: false,
                variant,
            }
        }
        1 => {
            let speed =
                tuning.base_alien_velocity + rng.random::<f32>() * tuning.alien_velocity_jitter;
            Alien {
                position: Vec2::new(-100.0, rng.random_range(lane_y())),
                movement: Vec2::new(speed, 0.0),
                intelligent: false,
                variant,
            }
        }
        _ => {
            let angle = rng.random_range(0.0..TAU);
            let position = screen_center() + unit(angle) * (SCREEN_HEIGHT / 2.0);
            let speed = tuning.base_alien_velocity
                + rng.random::<f32>() * tuning.homing_alien_velocity_jitter;
            Alien {
                position,
                movement: (target - position).normalize_or_zero() * speed,
                intelligent: true,
                variant,
            }
        }
    }
}

/// Rotation for an alien shot: aimed at `target` when intelligent, otherwise random
pub fn alien_shot_rotation<R: Rng>(rng: &mut R, alien: &Alien, target: Vec2) -> f32 {
    if alien.intelligent {
        rotation_toward(target - alien.position)
    } else {
        rng.random_range(0.0..TAU)
    }
}
