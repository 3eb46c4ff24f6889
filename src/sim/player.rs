//! The player's ship
//!
//! Thrust ramps a per-ship acceleration toward a cap; releasing thrust leaves a
//! drift that decays to zero along the heading held at release. Firing is gated
//! by a short per-shot cooldown and a longer cooldown after each burst.
//!
//! Life cycle: `Alive -> Dying -> Dead`. Dying plays a fixed number of
//! explosion frames, one per `dying_frame_interval`.

use glam::Vec2;

use super::collision::Shape;
use super::tick::TickInput;
use super::timer::Timer;
use crate::consts::{MAX_LIVES, MAX_SHIELDS};
use crate::tuning::Tuning;
use crate::{heading, screen_center, wrap_position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dying,
    Dead,
}

/// Residual motion after thrust is released
#[derive(Debug, Clone)]
pub struct Drift {
    /// Heading held when thrust was released
    pub angle: f32,
    /// Released speed (decays linearly to zero over the timer)
    pub speed: f32,
    pub timer: Timer,
}

/// A laser the ship wants spawned this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaserShot {
    pub position: Vec2,
    pub rotation: f32,
    /// 1-based index within the current burst
    pub shot: u8,
}

/// Side effects of one player update, applied by the game state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerActions {
    pub laser: Option<LaserShot>,
    pub shield_raised: bool,
    pub shield_expired: bool,
    pub hyperspace: bool,
    pub thrusting: bool,
    pub reversing: bool,
    /// A dying animation frame advanced this tick
    pub dying_frame: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    /// Radians; 0 points up the screen
    pub rotation: f32,
    /// Scalar speed carried into drift
    pub velocity: f32,
    /// Current thrust ramp value
    pub acceleration: f32,
    /// Shots fired in the current burst
    pub shots_fired: u8,
    pub shoot_cooldown: Timer,
    pub burst_cooldown: Timer,
    pub shield_timer: Option<Timer>,
    pub hyperspace_timer: Option<Timer>,
    pub drift: Option<Drift>,
    pub life: LifeState,
    pub dying_timer: Timer,
    pub dying_counter: u32,
    pub lives_remaining: u8,
    pub shields_remaining: u8,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self::with_reserves(tuning, tuning.starting_lives, tuning.starting_shields)
    }

    /// Fresh ship at screen center carrying over lives and shields
    pub fn with_reserves(tuning: &Tuning, lives: u8, shields: u8) -> Self {
        Self {
            position: screen_center(),
            rotation: 0.0,
            velocity: 0.0,
            acceleration: 0.0,
            shots_fired: 0,
            shoot_cooldown: Timer::primed(tuning.shoot_cooldown),
            burst_cooldown: Timer::primed(tuning.burst_cooldown),
            shield_timer: None,
            hyperspace_timer: None,
            drift: None,
            life: LifeState::Alive,
            dying_timer: Timer::new(tuning.dying_frame_interval),
            dying_counter: 0,
            lives_remaining: lives.min(MAX_LIVES),
            shields_remaining: shields.min(MAX_SHIELDS),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn is_dying(&self) -> bool {
        self.life == LifeState::Dying
    }

    pub fn is_dead(&self) -> bool {
        self.life == LifeState::Dead
    }

    pub fn is_shielded(&self) -> bool {
        self.shield_timer.is_some()
    }

    /// Hyperspace may be used now
    pub fn hyperspace_ready(&self) -> bool {
        self.hyperspace_timer.as_ref().is_none_or(Timer::is_ready)
    }

    pub fn shape(&self, tuning: &Tuning) -> Shape {
        Shape::circle(self.position, tuning.player_radius)
    }

    /// Start the explosion. Returns true only on the Alive -> Dying edge.
    pub fn begin_dying(&mut self) -> bool {
        if self.life != LifeState::Alive {
            return false;
        }
        self.life = LifeState::Dying;
        self.dying_counter = 0;
        self.dying_timer.reset();
        self.drift = None;
        self.acceleration = 0.0;
        self.velocity = 0.0;
        true
    }

    /// Spend one life, saturating at zero. Returns lives left.
    pub fn lose_life(&mut self) -> u8 {
        self.lives_remaining = self.lives_remaining.saturating_sub(1);
        self.lives_remaining
    }

    /// Grant a life up to the cap. Returns true if one was added.
    pub fn grant_life(&mut self) -> bool {
        if self.lives_remaining < MAX_LIVES {
            self.lives_remaining += 1;
            true
        } else {
            false
        }
    }

    /// Advance the ship by one tick of input
    pub fn update(&mut self, input: &TickInput, tuning: &Tuning, dt: f32) -> PlayerActions {
        let mut actions = PlayerActions::default();

        match self.life {
            LifeState::Dead => return actions,
            LifeState::Dying => {
                self.dying_timer.update(dt);
                if self.dying_timer.is_ready() {
                    self.dying_timer.reset();
                    self.dying_counter += 1;
                    actions.dying_frame = true;
                    if self.dying_counter >= tuning.dying_frames {
                        self.life = LifeState::Dead;
                    }
                }
                return actions;
            }
            LifeState::Alive => {}
        }

        let turn = tuning.rotation_per_tick();
        if input.rotate_left {
            self.rotation -= turn;
        }
        if input.rotate_right {
            self.rotation += turn;
        }

        if input.thrust {
            self.accelerate(tuning);
            actions.thrusting = true;
        }

        self.update_shield(input, tuning, dt, &mut actions);

        if input.thrust_released {
            self.release_thrust(tuning);
        }

        self.update_drift(tuning, dt);

        if input.reverse {
            self.drift = None;
            let nudge = heading(self.rotation) * tuning.reverse_speed;
            self.position = wrap_position(self.position - nudge);
            actions.reversing = true;
        }

        self.burst_cooldown.update(dt);
        self.shoot_cooldown.update(dt);
        actions.laser = self.fire(input, tuning);

        if input.hyperspace && self.hyperspace_ready() {
            match self.hyperspace_timer.as_mut() {
                Some(timer) => timer.reset(),
                None => self.hyperspace_timer = Some(Timer::new(tuning.hyperspace_cooldown)),
            }
            actions.hyperspace = true;
        }
        if let Some(timer) = self.hyperspace_timer.as_mut() {
            timer.update(dt);
        }

        actions
    }

    fn accelerate(&mut self, tuning: &Tuning) {
        self.drift = None;

        if self.acceleration < tuning.max_acceleration {
            self.acceleration = self.velocity + tuning.acceleration_step;
        }
        self.acceleration = self.acceleration.min(tuning.max_acceleration);
        self.velocity = self.acceleration;

        self.position = wrap_position(self.position + heading(self.rotation) * self.acceleration);
    }

    fn release_thrust(&mut self, tuning: &Tuning) {
        if self.velocity < self.acceleration * 10.0 {
            self.velocity = self.acceleration * 10.0 - 5.0;
        }
        self.velocity = self.velocity.max(0.0);
        self.acceleration = 0.0;

        self.drift = Some(Drift {
            angle: self.rotation,
            speed: self.velocity,
            timer: Timer::new(tuning.drift_duration),
        });
    }

    fn update_drift(&mut self, tuning: &Tuning, dt: f32) {
        let Some(drift) = self.drift.as_mut() else {
            return;
        };

        drift.timer.update(dt);
        if drift.timer.is_ready() {
            self.drift = None;
            self.velocity = 0.0;
            return;
        }

        let per_tick =
            drift.speed / crate::consts::TICKS_PER_SECOND as f32 * tuning.drift_speed_scale;
        let decayed = per_tick * (1.0 - drift.timer.progress());
        self.position = wrap_position(self.position + heading(drift.angle) * decayed);
    }

    fn update_shield(
        &mut self,
        input: &TickInput,
        tuning: &Tuning,
        dt: f32,
        actions: &mut PlayerActions,
    ) {
        if input.shield && !self.is_shielded() && self.shields_remaining > 0 {
            self.shield_timer = Some(Timer::new(tuning.shield_duration));
            self.shields_remaining -= 1;
            actions.shield_raised = true;
        }

        if let Some(timer) = self.shield_timer.as_mut() {
            timer.update(dt);
            if timer.is_ready() {
                self.shield_timer = None;
                actions.shield_expired = true;
            }
        }
    }

    fn fire(&mut self, input: &TickInput, tuning: &Tuning) -> Option<LaserShot> {
        if !input.fire || !self.burst_cooldown.is_ready() || !self.shoot_cooldown.is_ready() {
            return None;
        }

        self.shoot_cooldown.reset();
        self.shots_fired += 1;
        let shot = LaserShot {
            position: self.position + heading(self.rotation) * tuning.laser_spawn_offset,
            rotation: self.rotation,
            shot: self.shots_fired,
        };

        if self.shots_fired >= tuning.max_shots_per_burst {
            self.burst_cooldown.reset();
            self.shots_fired = 0;
        }

        Some(shot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_thrust_ramps_to_cap() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };

        player.update(&thrust, &tuning, SIM_DT);
        assert_eq!(player.acceleration, 4.0);
        player.update(&thrust, &tuning, SIM_DT);
        assert_eq!(player.acceleration, 8.0);
        player.update(&thrust, &tuning, SIM_DT);
        assert_eq!(player.acceleration, 8.0);
        // Three ticks pointing up: 4 + 8 + 8
        assert!((player.position.y - (screen_center().y - 20.0)).abs() < 1e-3);
    }

    #[test]
    fn test_drift_decays_and_stops() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let thrust = TickInput {
            thrust: true,
            ..Default::default()
        };
        player.update(&thrust, &tuning, SIM_DT);
        player.update(&thrust, &tuning, SIM_DT);

        let release = TickInput {
            thrust_released: true,
            ..Default::default()
        };
        player.update(&release, &tuning, SIM_DT);
        let drift = player.drift.as_ref().expect("drifting after release");
        assert_eq!(drift.speed, 75.0);
        assert_eq!(player.acceleration, 0.0);

        // Each later step moves less than the one before
        let idle = TickInput::default();
        let mut last = player.position;
        let mut last_step = f32::MAX;
        for _ in 0..30 {
            player.update(&idle, &tuning, SIM_DT);
            let step = (player.position - last).length();
            assert!(step <= last_step + 1e-4);
            last_step = step;
            last = player.position;
        }

        let ticks = (tuning.drift_duration / SIM_DT) as usize + 2;
        for _ in 0..ticks {
            player.update(&idle, &tuning, SIM_DT);
        }
        assert!(player.drift.is_none());
        assert_eq!(player.velocity, 0.0);
    }

    #[test]
    fn test_reverse_nudges_without_drift() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let start = player.position;
        let reverse = TickInput {
            reverse: true,
            ..Default::default()
        };
        player.update(&reverse, &tuning, SIM_DT);
        assert!((player.position - (start + Vec2::new(0.0, 3.0))).length() < 1e-4);
        assert!(player.drift.is_none());
    }

    #[test]
    fn test_burst_of_three_then_cooldown() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);

        let mut shots = Vec::new();
        // 0.5s of holding fire: three shots 0.15s apart, then the burst cooldown
        for _ in 0..30 {
            if let Some(shot) = player.update(&fire(), &tuning, SIM_DT).laser {
                shots.push(shot.shot);
            }
        }
        assert_eq!(shots, vec![1, 2, 3]);
        assert_eq!(player.shots_fired, 0);
        assert!(!player.burst_cooldown.is_ready());

        // After the burst cooldown elapses firing resumes
        let mut resumed = false;
        for _ in 0..40 {
            if player.update(&fire(), &tuning, SIM_DT).laser.is_some() {
                resumed = true;
                break;
            }
        }
        assert!(resumed);
    }

    #[test]
    fn test_releasing_fire_keeps_burst_count() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        assert!(player.update(&fire(), &tuning, SIM_DT).laser.is_some());
        for _ in 0..20 {
            player.update(&TickInput::default(), &tuning, SIM_DT);
        }
        assert_eq!(player.shots_fired, 1);
    }

    #[test]
    fn test_laser_spawns_ahead_of_ship() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let shot = player.update(&fire(), &tuning, SIM_DT).laser.unwrap();
        assert!((shot.position - (player.position + Vec2::new(0.0, -50.0))).length() < 1e-4);
    }

    #[test]
    fn test_shield_consumes_reserve_and_expires() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let shield = TickInput {
            shield: true,
            ..Default::default()
        };
        let actions = player.update(&shield, &tuning, SIM_DT);
        assert!(actions.shield_raised);
        assert!(player.is_shielded());
        assert_eq!(player.shields_remaining, 2);

        // Holding the key while shielded does not burn more shields
        player.update(&shield, &tuning, SIM_DT);
        assert_eq!(player.shields_remaining, 2);

        let mut expired = false;
        for _ in 0..(tuning.shield_duration / SIM_DT) as usize + 2 {
            expired |= player.update(&TickInput::default(), &tuning, SIM_DT).shield_expired;
        }
        assert!(expired);
        assert!(!player.is_shielded());
    }

    #[test]
    fn test_no_shield_when_reserve_empty() {
        let tuning = Tuning::default();
        let mut player = Player::with_reserves(&tuning, 3, 0);
        let shield = TickInput {
            shield: true,
            ..Default::default()
        };
        assert!(!player.update(&shield, &tuning, SIM_DT).shield_raised);
        assert!(!player.is_shielded());
    }

    #[test]
    fn test_hyperspace_cooldown() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let jump = TickInput {
            hyperspace: true,
            ..Default::default()
        };
        assert!(player.update(&jump, &tuning, SIM_DT).hyperspace);
        assert!(!player.update(&jump, &tuning, SIM_DT).hyperspace);
        assert!(!player.hyperspace_ready());
    }

    #[test]
    fn test_dying_runs_twelve_frames() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        assert!(player.begin_dying());
        assert!(!player.begin_dying());

        let idle = TickInput::default();
        for frame in 1..=tuning.dying_frames {
            assert!(player.is_dying());
            let actions = player.update(&idle, &tuning, tuning.dying_frame_interval);
            assert!(actions.dying_frame);
            assert_eq!(player.dying_counter, frame);
        }
        assert!(player.is_dead());
    }

    #[test]
    fn test_reserve_bounds() {
        let tuning = Tuning::default();
        let mut player = Player::with_reserves(&tuning, 9, 9);
        assert_eq!(player.lives_remaining, MAX_LIVES);
        assert_eq!(player.shields_remaining, MAX_SHIELDS);
        assert!(!player.grant_life());

        let mut player = Player::with_reserves(&tuning, 1, 0);
        assert_eq!(player.lose_life(), 0);
        assert_eq!(player.lose_life(), 0);
    }
}
