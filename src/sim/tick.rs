//! Fixed timestep simulation tick
//!
//! One Playing-scene step: player, movement, collisions, spawning, cleanup,
//! then the terminal checks that ask the scene machine to move on.

use super::collision::{ColliderKey, ColliderKind};
use super::entity::Exhaust;
use super::player::PlayerActions;
use super::resolve::resolve_collisions;
use super::spawn;
use super::state::{GameEvent, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Thrust held
    pub thrust: bool,
    /// Thrust released this tick
    pub thrust_released: bool,
    /// Reverse held
    pub reverse: bool,
    /// Fire held
    pub fire: bool,
    /// Shield key pressed this tick
    pub shield: bool,
    /// Hyperspace key pressed this tick
    pub hyperspace: bool,
}

/// What the scene machine should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    LevelCleared,
    GameOver,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickOutcome {
    state.events.clear();
    state.time_ticks += 1;
    state.stars.update(dt);

    let actions = state.player.update(input, &state.tuning, dt);
    apply_player_actions(state, &actions);

    if state.player.is_dead() {
        return handle_death(state);
    }

    move_entities(state);
    state.sync_player_collider();

    resolve_collisions(state);

    run_schedulers(state, dt);

    state.cleanup_timer.update(dt);
    if state.cleanup_timer.is_ready() {
        state.cleanup_timer.reset();
        let meteors = state.meteors.sweep();
        let aliens = state.aliens.sweep();
        if !meteors.is_empty() || !aliens.is_empty() {
            log::debug!("Swept {} meteors, {} aliens", meteors.len(), aliens.len());
        }
    }

    if state.level_complete() {
        state.complete_level();
        return TickOutcome::LevelCleared;
    }

    TickOutcome::Continue
}

fn apply_player_actions(state: &mut GameState, actions: &PlayerActions) {
    if let Some(shot) = actions.laser {
        state.add_laser(shot);
    }
    if actions.shield_raised {
        state.raise_shield();
    }
    if actions.shield_expired {
        state.drop_shield();
    }
    if actions.hyperspace {
        let to = state.hyperspace_destination();
        state.player.position = to;
        state.player.drift = None;
        state.events.push(GameEvent::Hyperspace { to });
        log::debug!("Hyperspace to {:?}", to);
    }

    if actions.thrusting || actions.reversing {
        let player = &state.player;
        state.exhaust = Some(Exhaust::behind(
            player.position,
            player.rotation,
            state.tuning.exhaust_offset,
        ));
        if actions.thrusting {
            state.events.push(GameEvent::Thrust);
        }
    } else {
        state.exhaust = None;
    }
}

fn handle_death(state: &mut GameState) -> TickOutcome {
    let lives_remaining = state.player.lose_life();
    state.events.push(GameEvent::LifeLost { lives_remaining });
    log::info!("Player lost a life ({} remaining)", lives_remaining);

    if lives_remaining == 0 {
        return TickOutcome::GameOver;
    }
    state.reset_after_death();
    TickOutcome::Continue
}

fn move_entities(state: &mut GameState) {
    let target = state.player.position;
    let tuning = &state.tuning;

    for slot in state.meteors.slots_mut() {
        slot.entity.update();
        if slot.alive {
            state.index.insert(
                ColliderKey::new(ColliderKind::Meteor, slot.id),
                slot.entity.shape(tuning),
            );
        }
    }

    for slot in state.aliens.slots_mut() {
        slot.entity.update(target);
        if slot.alive {
            state.index.insert(
                ColliderKey::new(ColliderKind::Alien, slot.id),
                slot.entity.shape(tuning),
            );
        }
    }
    for id in state.aliens.remove_where(|a| a.is_gone()) {
        state.index.remove(ColliderKey::new(ColliderKind::Alien, id));
    }

    for slot in state.lasers.slots_mut() {
        slot.entity.update(tuning);
        state.index.insert(
            ColliderKey::new(ColliderKind::Laser, slot.id),
            slot.entity.shape(tuning),
        );
    }
    for id in state.lasers.remove_where(|l| l.is_gone()) {
        state.index.remove(ColliderKey::new(ColliderKind::Laser, id));
    }

    for slot in state.alien_lasers.slots_mut() {
        slot.entity.update(tuning);
        state.index.insert(
            ColliderKey::new(ColliderKind::AlienLaser, slot.id),
            slot.entity.shape(tuning),
        );
    }
    for id in state.alien_lasers.remove_where(|l| l.is_gone()) {
        state.index.remove(ColliderKey::new(ColliderKind::AlienLaser, id));
    }

    if let Some(exhaust) = state.exhaust.as_mut() {
        exhaust.update(tuning);
    }
}

fn run_schedulers(state: &mut GameState, dt: f32) {
    if state.meteor_schedule.update(&state.tuning, dt) {
        let base = state.meteor_schedule.base_velocity;
        let meteor = spawn::large_meteor(&mut state.rng, &state.tuning, base);
        let id = state.add_meteor(meteor);
        log::debug!(
            "Meteor {} spawned ({}/{})",
            id,
            state.meteor_schedule.spawned_this_level,
            state.meteor_schedule.meteors_per_level
        );
    }

    let alien_alive = state.alien_alive();
    if state
        .alien_schedule
        .should_spawn(alien_alive, &state.tuning, &mut state.rng, dt)
    {
        let alien = spawn::alien(&mut state.rng, &state.tuning, state.player.position);
        state.add_alien(alien);
    }

    let alien_alive = state.alien_alive();
    if state.alien_schedule.should_attack(alien_alive, dt) {
        let target = state.player.position;
        let shooters: Vec<_> = state.aliens.iter_alive().map(|(_, a)| a.clone()).collect();
        for alien in shooters {
            let rotation = spawn::alien_shot_rotation(&mut state.rng, &alien, target);
            state.add_alien_laser(alien.position, rotation);
        }
    }
    if alien_alive {
        state.events.push(GameEvent::AlienPresent);
    }

    if let Some(note) = state.beat.update(&state.tuning, dt) {
        state.events.push(GameEvent::Beat(note));
    }
}
