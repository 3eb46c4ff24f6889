//! Meteor Storm headless runner
//!
//! Drives the game loop without a window: a simple autopilot supplies the
//! keyboard, audio and drawing go to null backends, and the high score is kept
//! in `highscore.json`. Useful for soak-testing balance changes in `tuning.json`.
//!
//! Usage: `meteor-storm [seed] [sessions]`

use std::f32::consts::{PI, TAU};

use meteor_storm::audio::NullAudio;
use meteor_storm::consts::{SIM_DT, TICKS_PER_SECOND};
use meteor_storm::input::{InputState, Keys};
use meteor_storm::render::NullRenderer;
use meteor_storm::sim::GameState;
use meteor_storm::{
    FileHighScoreStore, FixedTimestep, Flow, Game, SceneKind, Tuning, rotation_toward,
};

const TUNING_PATH: &str = "tuning.json";
const HIGH_SCORE_PATH: &str = "highscore.json";

/// Upper bound on simulated time, in minutes
const MAX_MINUTES: u32 = 30;

/// Distance at which the autopilot raises its shield
const DANGER_RADIUS: f32 = 110.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);
    let sessions: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3).max(1);

    let tuning = Tuning::load_or_default(TUNING_PATH);
    let store = FileHighScoreStore::new(HIGH_SCORE_PATH);
    let mut game = Game::new(tuning, store, NullAudio, seed);
    log::info!("Meteor Storm (headless) starting with seed {}", seed);

    let mut timestep = FixedTimestep::new();
    let mut input = InputState::new();
    let mut renderer = NullRenderer;
    let mut pilot = Autopilot::new(sessions);

    let max_frames = MAX_MINUTES * 60 * TICKS_PER_SECOND;
    let mut frames = 0;
    'run: while frames < max_frames {
        for _ in 0..timestep.advance(SIM_DT) {
            input.begin_frame();
            input.set_held(pilot.keys(&game));
            if game.update(&input, SIM_DT) == Flow::Quit {
                break 'run;
            }
        }
        game.render(&mut renderer);
        frames += 1;
    }

    let seconds = frames / TICKS_PER_SECOND;
    match game.game_state() {
        Some(state) => log::info!(
            "Stopped after {}s in {:?}: score {} on level {} (best {})",
            seconds,
            game.kind(),
            state.score,
            state.level,
            game.high_score()
        ),
        None => log::info!("Stopped after {}s (best {})", seconds, game.high_score()),
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Turns toward the nearest meteor, fires continuously and shields when
/// something gets close. Starts a new session from GameOver until
/// `sessions` have been played, then quits.
struct Autopilot {
    sessions: u32,
    played: u32,
    tap: bool,
}

impl Autopilot {
    fn new(sessions: u32) -> Self {
        Self {
            sessions,
            played: 0,
            tap: false,
        }
    }

    fn keys<S, A>(&mut self, game: &Game<S, A>) -> Keys
    where
        S: meteor_storm::HighScoreStore,
        A: meteor_storm::audio::AudioSink,
    {
        // Menu keys need a press edge, so alternate held and released
        self.tap = !self.tap;
        match game.kind() {
            SceneKind::Title => {
                if self.tap {
                    self.played += 1;
                    Keys::SPACE
                } else {
                    Keys::empty()
                }
            }
            SceneKind::LevelTransition => Keys::empty(),
            SceneKind::GameOver => {
                if !self.tap {
                    Keys::empty()
                } else if self.played >= self.sessions {
                    Keys::Q
                } else {
                    self.played += 1;
                    Keys::SPACE
                }
            }
            SceneKind::Playing => game.game_state().map_or(Keys::empty(), steer),
        }
    }
}

fn steer(state: &GameState) -> Keys {
    let player = &state.player;
    if !player.is_alive() {
        return Keys::empty();
    }

    let nearest = state
        .meteors
        .iter_alive()
        .map(|(_, m)| m.position)
        .chain(state.aliens.iter_alive().map(|(_, a)| a.position))
        .min_by(|a, b| {
            a.distance_squared(player.position)
                .total_cmp(&b.distance_squared(player.position))
        });

    let Some(target) = nearest else {
        return Keys::empty();
    };

    let mut keys = Keys::SPACE;
    let mut diff = (rotation_toward(target - player.position) - player.rotation).rem_euclid(TAU);
    if diff > PI {
        diff -= TAU;
    }
    if diff > 0.05 {
        keys |= Keys::RIGHT;
    } else if diff < -0.05 {
        keys |= Keys::LEFT;
    }

    if target.distance(player.position) < DANGER_RADIUS && !player.is_shielded() {
        if player.shields_remaining > 0 {
            keys |= Keys::S;
        } else if player.hyperspace_ready() {
            keys |= Keys::H;
        }
    }
    keys
}
