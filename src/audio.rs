//! Audio triggering
//!
//! The game never mixes sound itself. It maps simulation events onto
//! [`SoundEffect`] cues and hands them to an [`AudioSink`] provided by the
//! platform. Cues are fire-and-forget; looping ambience (thrust, alien drone)
//! is only restarted once the previous play has finished.

use crate::sim::{BeatNote, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player laser
    Fire,
    /// Alien laser
    AlienFire,
    /// Engine rumble while thrusting
    Thrust,
    /// Meteor or alien blown up
    Explosion,
    /// Player ship destroyed
    PlayerExplosion,
    ShieldUp,
    Hyperspace,
    /// Ambient beat, first note
    BeatLow,
    /// Ambient beat, second note
    BeatHigh,
    /// Hum while an alien is on screen
    AlienDrone,
    ExtraLife,
    LevelClear,
}

impl SoundEffect {
    /// Looping cues are not restarted while still playing
    pub fn is_ambient(self) -> bool {
        matches!(self, SoundEffect::Thrust | SoundEffect::AlienDrone)
    }
}

/// Platform audio backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn is_playing(&self, effect: SoundEffect) -> bool;
    fn rewind(&mut self, effect: SoundEffect);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}

    fn is_playing(&self, _effect: SoundEffect) -> bool {
        false
    }

    fn rewind(&mut self, _effect: SoundEffect) {}
}

/// Cue for a simulation event, if it makes a sound
pub fn effect_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::LaserFired { .. } => Some(SoundEffect::Fire),
        GameEvent::AlienLaserFired => Some(SoundEffect::AlienFire),
        GameEvent::Thrust => Some(SoundEffect::Thrust),
        GameEvent::ShieldUp => Some(SoundEffect::ShieldUp),
        GameEvent::Hyperspace { .. } => Some(SoundEffect::Hyperspace),
        GameEvent::MeteorDestroyed { .. } | GameEvent::AlienDestroyed { .. } => {
            Some(SoundEffect::Explosion)
        }
        GameEvent::PlayerHit => Some(SoundEffect::PlayerExplosion),
        GameEvent::AlienPresent => Some(SoundEffect::AlienDrone),
        GameEvent::Beat(BeatNote::Low) => Some(SoundEffect::BeatLow),
        GameEvent::Beat(BeatNote::High) => Some(SoundEffect::BeatHigh),
        GameEvent::ExtraLife => Some(SoundEffect::ExtraLife),
        GameEvent::LevelCleared { .. } => Some(SoundEffect::LevelClear),
        GameEvent::ShieldDown
        | GameEvent::ShieldBounce { .. }
        | GameEvent::AlienSpawned { .. }
        | GameEvent::LifeLost { .. } => None,
    }
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager<S: AudioSink> {
    sink: S,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, muted: false }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Play a sound effect from the start
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        if effect.is_ambient() && self.sink.is_playing(effect) {
            return;
        }
        self.sink.rewind(effect);
        self.sink.play(effect);
    }

    /// Trigger the cues for a tick's events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(effect_for) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<SoundEffect>,
        playing: HashSet<SoundEffect>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.played.push(effect);
            self.playing.insert(effect);
        }

        fn is_playing(&self, effect: SoundEffect) -> bool {
            self.playing.contains(&effect)
        }

        fn rewind(&mut self, _effect: SoundEffect) {}
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&[
            GameEvent::LaserFired { shot: 1 },
            GameEvent::ShieldDown,
            GameEvent::Beat(BeatNote::High),
        ]);
        assert_eq!(audio.sink().played, vec![SoundEffect::Fire, SoundEffect::BeatHigh]);
    }

    #[test]
    fn test_drone_not_restarted_while_playing() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&[GameEvent::AlienPresent]);
        audio.handle_events(&[GameEvent::AlienPresent]);
        assert_eq!(audio.sink().played, vec![SoundEffect::AlienDrone]);

        // One-shot cues always restart
        audio.play(SoundEffect::Fire);
        audio.play(SoundEffect::Fire);
        assert_eq!(audio.sink().played.len(), 3);
    }

    #[test]
    fn test_muted() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        audio.play(SoundEffect::Explosion);
        assert!(audio.sink().played.is_empty());
    }
}
