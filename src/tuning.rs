//! Data-driven game balance
//!
//! Every gameplay number lives here. Loaded from a JSON file where any missing
//! key falls back to its default, so a tuning file only needs the values it
//! changes. Times are in seconds; per-tick speeds are in pixels per tick.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player movement ===
    /// Turn rate (radians per second)
    pub rotation_per_second: f32,
    /// Thrust speed ceiling (pixels per tick)
    pub max_acceleration: f32,
    /// Thrust ramp added on each thrusting tick
    pub acceleration_step: f32,
    /// Constant backward nudge while reversing (pixels per tick)
    pub reverse_speed: f32,
    /// How long post-thrust drift lasts
    pub drift_duration: f32,
    /// Drift speed multiplier applied to the released velocity
    pub drift_speed_scale: f32,

    // === Player weapons & defences ===
    pub shoot_cooldown: f32,
    pub burst_cooldown: f32,
    pub max_shots_per_burst: u8,
    /// Distance ahead of the ship where lasers appear
    pub laser_spawn_offset: f32,
    /// Distance behind the ship where exhaust appears
    pub exhaust_offset: f32,
    pub starting_lives: u8,
    pub starting_shields: u8,
    pub shield_duration: f32,
    pub hyperspace_cooldown: f32,
    /// Candidate positions tried before hyperspace gives up looking for clear space
    pub hyperspace_attempts: u32,

    // === Death animation ===
    pub dying_frame_interval: f32,
    pub dying_frames: u32,

    // === Projectiles (pixels per second) ===
    pub laser_speed: f32,
    pub alien_laser_speed: f32,

    // === Meteors ===
    pub meteor_spawn_interval: f32,
    pub meteor_speedup_interval: f32,
    pub meteor_speedup_amount: f32,
    pub base_meteor_velocity: f32,
    /// Random extra speed added on top of the base velocity
    pub meteor_velocity_jitter: f32,
    /// Spawn circle radius around screen center (beyond the corners)
    pub meteor_spawn_radius: f32,
    pub meteor_rotation_speed_max: f32,
    /// Small meteors spawn up to this far from the destroyed large one
    pub small_meteor_scatter: f32,
    /// A large meteor splits into 0..=max_small_meteors fragments
    pub max_small_meteors: u32,
    pub meteors_per_level_start: u32,
    pub meteors_per_level_step: u32,
    pub extra_life_every: u32,

    // === Aliens ===
    pub alien_spawn_interval: f32,
    pub alien_attack_interval: f32,
    pub base_alien_velocity: f32,
    pub alien_velocity_jitter: f32,
    pub homing_alien_velocity_jitter: f32,
    /// Fraction of ready spawn-timer firings that are skipped
    pub alien_spawn_suppression: f32,

    // === Housekeeping ===
    /// Explosion grace period before destroyed entities are swept
    pub cleanup_interval: f32,
    pub beat_interval_start: f32,
    pub beat_interval_step: f32,
    pub beat_interval_floor: f32,
    pub level_transition_duration: f32,

    // === Scoring ===
    pub meteor_score: u64,
    pub alien_score: u64,

    // === Collider sizes (pixels) ===
    pub player_radius: f32,
    pub shield_radius: f32,
    pub large_meteor_radius: f32,
    pub small_meteor_radius: f32,
    pub alien_radius: f32,
    pub laser_width: f32,
    pub laser_height: f32,

    // === Backgrounds ===
    pub star_count: usize,
    pub backdrop_meteor_count: usize,
    pub backdrop_meteor_velocity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rotation_per_second: std::f32::consts::PI,
            max_acceleration: 8.0,
            acceleration_step: 4.0,
            reverse_speed: 3.0,
            drift_duration: 3.0,
            drift_speed_scale: 4.0,

            shoot_cooldown: 0.15,
            burst_cooldown: 0.5,
            max_shots_per_burst: 3,
            laser_spawn_offset: 50.0,
            exhaust_offset: 50.0,
            starting_lives: 3,
            starting_shields: 3,
            shield_duration: 6.0,
            hyperspace_cooldown: 10.0,
            hyperspace_attempts: 32,

            dying_frame_interval: 0.05,
            dying_frames: 12,

            laser_speed: 1000.0,
            alien_laser_speed: 1000.0,

            meteor_spawn_interval: 2.0,
            meteor_speedup_interval: 10.0,
            meteor_speedup_amount: 0.1,
            base_meteor_velocity: 0.25,
            meteor_velocity_jitter: 1.5,
            meteor_spawn_radius: 800.0,
            meteor_rotation_speed_max: 0.02,
            small_meteor_scatter: 30.0,
            max_small_meteors: 3,
            meteors_per_level_start: 2,
            meteors_per_level_step: 2,
            extra_life_every: 5,

            alien_spawn_interval: 8.0,
            alien_attack_interval: 1.5,
            base_alien_velocity: 1.0,
            alien_velocity_jitter: 2.5,
            homing_alien_velocity_jitter: 1.5,
            alien_spawn_suppression: 0.5,

            cleanup_interval: 0.2,
            beat_interval_start: 1.6,
            beat_interval_step: 0.1,
            beat_interval_floor: 0.4,
            level_transition_duration: 2.0,

            meteor_score: 1,
            alien_score: 50,

            player_radius: 32.0,
            shield_radius: 60.0,
            large_meteor_radius: 48.0,
            small_meteor_radius: 14.0,
            alien_radius: 40.0,
            laser_width: 9.0,
            laser_height: 37.0,

            star_count: 100,
            backdrop_meteor_count: 10,
            backdrop_meteor_velocity: 0.25,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning, falling back to defaults when the file is missing or malformed
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No tuning file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Per-tick laser displacement
    pub fn laser_speed_per_tick(&self) -> f32 {
        self.laser_speed / crate::consts::TICKS_PER_SECOND as f32
    }

    pub fn alien_laser_speed_per_tick(&self) -> f32 {
        self.alien_laser_speed / crate::consts::TICKS_PER_SECOND as f32
    }

    /// Per-tick rotation while a turn key is held
    pub fn rotation_per_tick(&self) -> f32 {
        self.rotation_per_second / crate::consts::TICKS_PER_SECOND as f32
    }
}
