//! Game state and core simulation types
//!
//! Everything the Playing scene mutates lives in [`GameState`]: the player,
//! one pool per entity kind, the spatial index mirroring every live collider,
//! and the schedulers. Score, level and reserves survive a death reset; the
//! pools never do.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{ColliderKey, ColliderKind, Shape, SpatialIndex};
use super::entity::{Alien, Exhaust, Laser, LaserOwner, Meteor, MeteorSize, Shield};
use super::player::{LaserShot, Player};
use super::pool::{EntityId, Pool};
use super::spawn::{AlienSchedule, Beat, BeatNote, MeteorSchedule};
use super::starfield::Starfield;
use super::timer::Timer;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::tuning::Tuning;

/// Collider key of the singleton player
pub const PLAYER_KEY: ColliderKey = ColliderKey::new(ColliderKind::Player, 0);
/// Collider key of the singleton shield
pub const SHIELD_KEY: ColliderKey = ColliderKey::new(ColliderKind::Shield, 0);

/// Keep hyperspace exits this far from the screen edge
const HYPERSPACE_EDGE_MARGIN: f32 = 64.0;

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LaserFired { shot: u8 },
    AlienLaserFired,
    Thrust,
    ShieldUp,
    ShieldDown,
    ShieldBounce { meteor: EntityId },
    Hyperspace { to: Vec2 },
    MeteorDestroyed { id: EntityId, size: MeteorSize, fragments: usize },
    AlienSpawned { id: EntityId, intelligent: bool },
    AlienDestroyed { id: EntityId },
    /// An alien is alive this tick
    AlienPresent,
    PlayerHit,
    LifeLost { lives_remaining: u8 },
    Beat(BeatNote),
    LevelCleared { next_level: u32 },
    ExtraLife,
}

/// State of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u64,
    /// 1-based
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub meteors: Pool<Meteor>,
    pub aliens: Pool<Alien>,
    /// Player lasers
    pub lasers: Pool<Laser>,
    pub alien_lasers: Pool<Laser>,
    pub shield: Option<Shield>,
    pub exhaust: Option<Exhaust>,
    pub index: SpatialIndex,
    pub meteor_schedule: MeteorSchedule,
    pub alien_schedule: AlienSchedule,
    /// Sweeps destroyed entities once their explosion frame has shown
    pub cleanup_timer: Timer,
    pub beat: Beat,
    pub stars: Starfield,
    /// Events of the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = Starfield::new(&mut rng, tuning.star_count);

        let mut state = Self {
            seed,
            rng,
            score: 0,
            level: 1,
            time_ticks: 0,
            player: Player::new(&tuning),
            meteors: Pool::new(),
            aliens: Pool::new(),
            lasers: Pool::new(),
            alien_lasers: Pool::new(),
            shield: None,
            exhaust: None,
            index: SpatialIndex::new(),
            meteor_schedule: MeteorSchedule::new(&tuning),
            alien_schedule: AlienSchedule::new(&tuning),
            cleanup_timer: Timer::new(tuning.cleanup_interval),
            beat: Beat::new(&tuning),
            stars,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        state.sync_player_collider();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_meteor(&mut self, meteor: Meteor) -> EntityId {
        let id = self.next_entity_id();
        self.index
            .insert(ColliderKey::new(ColliderKind::Meteor, id), meteor.shape(&self.tuning));
        self.meteors.insert(id, meteor);
        id
    }

    pub fn add_alien(&mut self, alien: Alien) -> EntityId {
        let id = self.next_entity_id();
        self.index
            .insert(ColliderKey::new(ColliderKind::Alien, id), alien.shape(&self.tuning));
        self.events.push(GameEvent::AlienSpawned {
            id,
            intelligent: alien.intelligent,
        });
        log::debug!("Alien {} spawned at {:?} (homing: {})", id, alien.position, alien.intelligent);
        self.aliens.insert(id, alien);
        id
    }

    pub fn add_laser(&mut self, shot: LaserShot) -> EntityId {
        let id = self.next_entity_id();
        let laser = Laser::new(shot.position, shot.rotation, LaserOwner::Player);
        self.index
            .insert(ColliderKey::new(ColliderKind::Laser, id), laser.shape(&self.tuning));
        self.lasers.insert(id, laser);
        self.events.push(GameEvent::LaserFired { shot: shot.shot });
        id
    }

    pub fn add_alien_laser(&mut self, position: Vec2, rotation: f32) -> EntityId {
        let id = self.next_entity_id();
        let laser = Laser::new(position, rotation, LaserOwner::Alien);
        self.index
            .insert(ColliderKey::new(ColliderKind::AlienLaser, id), laser.shape(&self.tuning));
        self.alien_lasers.insert(id, laser);
        self.events.push(GameEvent::AlienLaserFired);
        id
    }

    /// Flag a meteor destroyed; it stops colliding and is swept later
    pub fn destroy_meteor(&mut self, id: EntityId) -> bool {
        self.index.remove(ColliderKey::new(ColliderKind::Meteor, id));
        self.meteors.mark_destroyed(id)
    }

    pub fn destroy_alien(&mut self, id: EntityId) -> bool {
        self.index.remove(ColliderKey::new(ColliderKind::Alien, id));
        self.aliens.mark_destroyed(id)
    }

    pub fn remove_laser(&mut self, id: EntityId) -> Option<Laser> {
        self.index.remove(ColliderKey::new(ColliderKind::Laser, id));
        self.lasers.remove(id)
    }

    pub fn remove_alien_laser(&mut self, id: EntityId) -> Option<Laser> {
        self.index.remove(ColliderKey::new(ColliderKind::AlienLaser, id));
        self.alien_lasers.remove(id)
    }

    pub fn alien_alive(&self) -> bool {
        self.aliens.alive_count() > 0
    }

    pub fn raise_shield(&mut self) {
        let shield = Shield {
            position: self.player.position,
            rotation: self.player.rotation,
        };
        self.index.insert(SHIELD_KEY, shield.shape(&self.tuning));
        self.shield = Some(shield);
        self.events.push(GameEvent::ShieldUp);
    }

    pub fn drop_shield(&mut self) {
        if self.shield.take().is_some() {
            self.index.remove(SHIELD_KEY);
            self.events.push(GameEvent::ShieldDown);
        }
    }

    /// Re-register the player and shield colliders at their current positions
    pub fn sync_player_collider(&mut self) {
        self.index.insert(PLAYER_KEY, self.player.shape(&self.tuning));
        if let Some(shield) = self.shield.as_mut() {
            shield.follow(self.player.position, self.player.rotation);
            self.index.insert(SHIELD_KEY, shield.shape(&self.tuning));
        }
    }

    /// Random on-screen spot clear of meteors and aliens.
    ///
    /// Gives up after `hyperspace_attempts` candidates and returns the last one.
    pub fn hyperspace_destination(&mut self) -> Vec2 {
        let radius = self.tuning.player_radius;
        let mut candidate = self.player.position;
        for _ in 0..self.tuning.hyperspace_attempts.max(1) {
            candidate = Vec2::new(
                self.rng
                    .random_range(HYPERSPACE_EDGE_MARGIN..SCREEN_WIDTH - HYPERSPACE_EDGE_MARGIN),
                self.rng
                    .random_range(HYPERSPACE_EDGE_MARGIN..SCREEN_HEIGHT - HYPERSPACE_EDGE_MARGIN),
            );
            let shape = Shape::circle(candidate, radius);
            if !self
                .index
                .any_overlap(&shape, &[ColliderKind::Meteor, ColliderKind::Alien])
            {
                break;
            }
        }
        candidate
    }

    /// Per-level spawn cap reached and every meteor swept away
    pub fn level_complete(&self) -> bool {
        self.meteor_schedule.cap_reached() && self.meteors.is_empty()
    }

    fn clear_entities(&mut self) {
        self.meteors.clear();
        self.aliens.clear();
        self.lasers.clear();
        self.alien_lasers.clear();
        self.shield = None;
        self.exhaust = None;
        self.index.clear();
    }

    /// Empty every pool and put a fresh ship at center, keeping score,
    /// level, reserves and stars.
    pub fn reset_after_death(&mut self) {
        let lives = self.player.lives_remaining;
        let shields = self.player.shields_remaining;

        self.clear_entities();
        self.player = Player::with_reserves(&self.tuning, lives, shields);
        self.meteor_schedule.restart_level(&self.tuning);
        self.alien_schedule.reset();
        self.cleanup_timer.reset();
        self.sync_player_collider();
    }

    /// Back to level 1 with starting reserves. Stars are kept.
    pub fn reset_full(&mut self) {
        self.clear_entities();
        self.score = 0;
        self.level = 1;
        self.player = Player::new(&self.tuning);
        self.meteor_schedule = MeteorSchedule::new(&self.tuning);
        self.alien_schedule = AlienSchedule::new(&self.tuning);
        self.cleanup_timer = Timer::new(self.tuning.cleanup_interval);
        self.beat = Beat::new(&self.tuning);
        self.sync_player_collider();
    }

    /// Level cleared: bump the level and grant a life on every Nth level
    pub fn complete_level(&mut self) {
        self.level += 1;
        self.events.push(GameEvent::LevelCleared { next_level: self.level });
        log::info!("Level cleared, advancing to level {}", self.level);

        let every = self.tuning.extra_life_every;
        if every > 0 && self.level % every == 0 && self.player.grant_life() {
            self.events.push(GameEvent::ExtraLife);
            log::info!("Extra life awarded ({} remaining)", self.player.lives_remaining);
        }
    }

    /// Leaving the level banner: raise the meteor cap and drop stray lasers
    pub fn start_level(&mut self) {
        self.meteor_schedule.advance_level(&self.tuning);
        for id in self.lasers.ids() {
            self.remove_laser(id);
        }
        for id in self.alien_lasers.ids() {
            self.remove_alien_laser(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn;

    fn state() -> GameState {
        GameState::new(42, Tuning::default())
    }

    #[test]
    fn test_ids_increase_across_pools() {
        let mut state = state();
        let tuning = state.tuning.clone();
        let a = spawn::large_meteor(&mut state.rng, &tuning, 0.25);
        let m = state.add_meteor(a);
        let l = state.add_alien_laser(Vec2::new(10.0, 10.0), 0.0);
        let b = spawn::large_meteor(&mut state.rng, &tuning, 0.25);
        let m2 = state.add_meteor(b);
        assert!(m < l && l < m2);
    }

    #[test]
    fn test_destroyed_meteor_leaves_index() {
        let mut state = state();
        let tuning = state.tuning.clone();
        let meteor = spawn::large_meteor(&mut state.rng, &tuning, 0.25);
        let id = state.add_meteor(meteor);
        assert!(state.index.contains(ColliderKey::new(ColliderKind::Meteor, id)));

        assert!(state.destroy_meteor(id));
        assert!(!state.index.contains(ColliderKey::new(ColliderKind::Meteor, id)));
        assert_eq!(state.meteors.len(), 1);
        assert_eq!(state.meteors.sweep(), vec![id]);
    }

    #[test]
    fn test_reset_after_death_keeps_progress() {
        let mut state = state();
        let tuning = state.tuning.clone();
        state.score = 17;
        state.level = 3;
        state.player.lives_remaining = 2;
        state.player.shields_remaining = 1;
        let meteor = spawn::large_meteor(&mut state.rng, &tuning, 0.25);
        state.add_meteor(meteor);
        state.add_alien_laser(Vec2::ZERO, 0.0);
        state.raise_shield();
        let stars_before = state.stars.stars.len();

        state.reset_after_death();

        assert!(state.meteors.is_empty() && state.aliens.is_empty());
        assert!(state.lasers.is_empty() && state.alien_lasers.is_empty());
        assert!(state.shield.is_none());
        assert_eq!(state.index.len(), 1);
        assert_eq!((state.score, state.level), (17, 3));
        assert_eq!(state.player.lives_remaining, 2);
        assert_eq!(state.player.shields_remaining, 1);
        assert!(state.player.is_alive());
        assert_eq!(state.stars.stars.len(), stars_before);
    }

    #[test]
    fn test_reset_full() {
        let mut state = state();
        state.score = 99;
        state.level = 7;
        state.meteor_schedule.meteors_per_level = 14;
        state.player.lives_remaining = 0;
        state.reset_full();
        assert_eq!((state.score, state.level), (0, 1));
        assert_eq!(state.player.lives_remaining, 3);
        assert_eq!(state.player.shields_remaining, 3);
        assert_eq!(state.meteor_schedule.meteors_per_level, 2);
        assert_eq!(state.stars.stars.len(), state.tuning.star_count);
    }

    #[test]
    fn test_extra_life_every_fifth_level() {
        let mut state = state();
        state.level = 4;
        state.complete_level();
        assert_eq!(state.level, 5);
        assert_eq!(state.player.lives_remaining, 4);
        assert!(state.events.contains(&GameEvent::ExtraLife));

        state.events.clear();
        state.complete_level();
        assert_eq!(state.player.lives_remaining, 4);
        assert!(!state.events.contains(&GameEvent::ExtraLife));
    }

    #[test]
    fn test_start_level_clears_lasers() {
        let mut state = state();
        state.add_laser(LaserShot {
            position: Vec2::new(100.0, 100.0),
            rotation: 0.0,
            shot: 1,
        });
        state.add_alien_laser(Vec2::new(200.0, 200.0), 1.0);
        state.start_level();
        assert!(state.lasers.is_empty() && state.alien_lasers.is_empty());
        assert_eq!(state.index.count_kind(ColliderKind::Laser), 0);
        assert_eq!(state.meteor_schedule.meteors_per_level, 4);
    }

    #[test]
    fn test_hyperspace_avoids_meteors() {
        let mut state = state();
        // Carpet the left half of the screen with meteors
        for x in (0..640).step_by(60) {
            for y in (0..720).step_by(60) {
                state.add_meteor(Meteor {
                    position: Vec2::new(x as f32, y as f32),
                    movement: Vec2::ZERO,
                    rotation: 0.0,
                    rotation_speed: 0.0,
                    size: MeteorSize::Large,
                    variant: 0,
                    entered: true,
                });
            }
        }
        for _ in 0..20 {
            let spot = state.hyperspace_destination();
            let shape = Shape::circle(spot, state.tuning.player_radius);
            assert!(!state.index.any_overlap(&shape, &[ColliderKind::Meteor]));
        }
    }
}
