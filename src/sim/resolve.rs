//! Collision resolution
//!
//! Runs once per tick after movement, in a fixed order. Each rule queries the
//! spatial index independently; none stops the others from running.
//!
//! 1. Player x Meteor: death on first hit, or a shield bounce
//! 2. Player x Alien
//! 3. Player x AlienLaser
//! 4. Alien x Laser: alien destroyed, one laser consumed, +50
//! 5. Meteor x Laser: meteor destroyed, laser consumed, +1, large meteors split

use super::collision::{ColliderKey, ColliderKind, reflect_velocity};
use super::entity::MeteorSize;
use super::spawn;
use super::state::{GameEvent, GameState, PLAYER_KEY, SHIELD_KEY};

/// Run every collision rule for this tick
pub fn resolve_collisions(state: &mut GameState) {
    if state.player.is_alive() {
        player_vs_meteors(state);
        player_vs_aliens(state);
        player_vs_alien_lasers(state);
    }
    aliens_vs_lasers(state);
    meteors_vs_lasers(state);
}

fn kill_player(state: &mut GameState) {
    if state.player.begin_dying() {
        state.exhaust = None;
        state.events.push(GameEvent::PlayerHit);
        log::debug!("Player hit at {:?}", state.player.position);
    }
}

fn player_vs_meteors(state: &mut GameState) {
    if state.player.is_shielded() {
        let center = state.player.position;
        for id in state.index.overlapping(SHIELD_KEY, ColliderKind::Meteor) {
            let Some(meteor) = state.meteors.get_mut(id) else {
                continue;
            };
            // Only bounce meteors still heading inward
            let outward = (meteor.position - center).normalize_or_zero();
            if meteor.movement.dot(outward) < 0.0 {
                meteor.movement = reflect_velocity(meteor.movement, outward);
                meteor.entered = true;
                state.events.push(GameEvent::ShieldBounce { meteor: id });
            }
        }
        return;
    }

    if let Some(&first) = state.index.overlapping(PLAYER_KEY, ColliderKind::Meteor).first() {
        log::debug!("Meteor {} struck the player", first);
        kill_player(state);
    }
}

fn player_vs_aliens(state: &mut GameState) {
    if state.player.is_shielded() {
        return;
    }
    for _ in state.index.overlapping(PLAYER_KEY, ColliderKind::Alien) {
        kill_player(state);
    }
}

fn player_vs_alien_lasers(state: &mut GameState) {
    if state.player.is_shielded() {
        return;
    }
    if !state
        .index
        .overlapping(PLAYER_KEY, ColliderKind::AlienLaser)
        .is_empty()
    {
        kill_player(state);
    }
}

fn aliens_vs_lasers(state: &mut GameState) {
    let alive: Vec<_> = state.aliens.iter_alive().map(|(id, _)| id).collect();
    for alien_id in alive {
        let key = ColliderKey::new(ColliderKind::Alien, alien_id);
        let Some(&laser_id) = state.index.overlapping(key, ColliderKind::Laser).first() else {
            continue;
        };

        state.remove_laser(laser_id);
        state.destroy_alien(alien_id);
        state.score += state.tuning.alien_score;
        state.events.push(GameEvent::AlienDestroyed { id: alien_id });
        log::debug!("Alien {} destroyed by laser {}", alien_id, laser_id);
    }
}

fn meteors_vs_lasers(state: &mut GameState) {
    for laser_id in state.lasers.ids() {
        let key = ColliderKey::new(ColliderKind::Laser, laser_id);
        let Some(&meteor_id) = state.index.overlapping(key, ColliderKind::Meteor).first() else {
            continue;
        };
        let Some(meteor) = state.meteors.get(meteor_id) else {
            continue;
        };
        let (size, origin) = (meteor.size, meteor.position);

        state.remove_laser(laser_id);
        state.destroy_meteor(meteor_id);
        state.score += state.tuning.meteor_score;

        let fragments = match size {
            MeteorSize::Large => {
                let base = state.meteor_schedule.base_velocity;
                let tuning = &state.tuning;
                let smalls = spawn::small_meteors(&mut state.rng, tuning, origin, base);
                let count = smalls.len();
                for small in smalls {
                    state.add_meteor(small);
                }
                count
            }
            MeteorSize::Small => 0,
        };

        state.events.push(GameEvent::MeteorDestroyed {
            id: meteor_id,
            size,
            fragments,
        });
        log::debug!("Meteor {} ({:?}) destroyed, {} fragments", meteor_id, size, fragments);
    }
}
