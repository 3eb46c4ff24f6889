//! Non-player entities: meteors, aliens, lasers, shield, exhaust
//!
//! Plain state plus per-tick movement. Ids live in the owning [`Pool`](super::pool::Pool)
//! slot; colliders are registered in the spatial index by the game state.

use glam::Vec2;

use super::collision::Shape;
use crate::tuning::Tuning;
use crate::{heading, is_far_off_screen, is_on_screen, screen_center, wrap_position};

/// Meteor size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeteorSize {
    Large,
    Small,
}

impl MeteorSize {
    pub fn radius(self, tuning: &Tuning) -> f32 {
        match self {
            MeteorSize::Large => tuning.large_meteor_radius,
            MeteorSize::Small => tuning.small_meteor_radius,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Meteor {
    pub position: Vec2,
    /// Displacement per tick
    pub movement: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub size: MeteorSize,
    /// Sprite variant picked at spawn
    pub variant: u8,
    /// Screen wrap only applies once the meteor has been on screen
    pub entered: bool,
}

impl Meteor {
    pub fn update(&mut self) {
        self.position += self.movement;
        self.rotation += self.rotation_speed;

        // Heading away from center before ever entering: wrap from now on
        if !self.entered
            && (is_on_screen(self.position)
                || self.movement.dot(self.position - screen_center()) > 0.0)
        {
            self.entered = true;
        }
        if self.entered {
            self.position = wrap_position(self.position);
        }
    }

    pub fn shape(&self, tuning: &Tuning) -> Shape {
        Shape::circle(self.position, self.size.radius(tuning))
    }
}

#[derive(Debug, Clone)]
pub struct Alien {
    pub position: Vec2,
    pub movement: Vec2,
    /// Homes on the player and aims its shots
    pub intelligent: bool,
    pub variant: u8,
}

impl Alien {
    /// Advance one tick. An intelligent alien re-aims at `target` keeping its speed.
    pub fn update(&mut self, target: Vec2) {
        if self.intelligent {
            let speed = self.movement.length();
            let direction = (target - self.position).normalize_or_zero();
            if direction != Vec2::ZERO {
                self.movement = direction * speed;
            }
        }
        self.position += self.movement;
    }

    pub fn is_gone(&self) -> bool {
        is_far_off_screen(self.position)
    }

    pub fn shape(&self, tuning: &Tuning) -> Shape {
        Shape::circle(self.position, tuning.alien_radius)
    }
}

/// Who fired a laser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserOwner {
    Player,
    Alien,
}

/// Straight-line constant-speed projectile
#[derive(Debug, Clone)]
pub struct Laser {
    pub position: Vec2,
    pub rotation: f32,
    pub owner: LaserOwner,
}

impl Laser {
    pub fn new(position: Vec2, rotation: f32, owner: LaserOwner) -> Self {
        Self {
            position,
            rotation,
            owner,
        }
    }

    pub fn update(&mut self, tuning: &Tuning) {
        let speed = match self.owner {
            LaserOwner::Player => tuning.laser_speed_per_tick(),
            LaserOwner::Alien => tuning.alien_laser_speed_per_tick(),
        };
        self.position += heading(self.rotation) * speed;
    }

    pub fn is_gone(&self) -> bool {
        is_far_off_screen(self.position)
    }

    pub fn shape(&self, tuning: &Tuning) -> Shape {
        Shape::rotated_rect(
            self.position,
            Vec2::new(tuning.laser_width, tuning.laser_height),
            self.rotation,
        )
    }
}

/// Active shield bubble, pinned to the player every tick
#[derive(Debug, Clone)]
pub struct Shield {
    pub position: Vec2,
    pub rotation: f32,
}

impl Shield {
    pub fn follow(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }

    pub fn shape(&self, tuning: &Tuning) -> Shape {
        Shape::circle(self.position, tuning.shield_radius)
    }
}

/// Thruster flame behind the ship (visual only)
#[derive(Debug, Clone)]
pub struct Exhaust {
    pub position: Vec2,
    /// Points away from the ship's nose
    pub rotation: f32,
}

impl Exhaust {
    /// Exhaust for a ship at `ship_pos` facing `ship_rotation`
    pub fn behind(ship_pos: Vec2, ship_rotation: f32, offset: f32) -> Self {
        Self {
            position: ship_pos - heading(ship_rotation) * offset,
            rotation: ship_rotation + std::f32::consts::PI,
        }
    }

    pub fn update(&mut self, tuning: &Tuning) {
        let speed = tuning.max_acceleration / crate::consts::TICKS_PER_SECOND as f32;
        self.position += heading(self.rotation) * speed;
    }
}
