//! Scene state machine
//!
//! ```text
//! Title --SPACE--> Playing --level cleared--> LevelTransition --timer / SPACE released--> Playing
//!                  Playing --lives exhausted--> GameOver --SPACE--> Playing (full reset)
//!                                               GameOver --Q--> quit
//! ```
//!
//! Each scene owns what it animates, so stars and backdrop meteors keep moving
//! across transitions. The play session is boxed and handed from scene to scene.

use crate::audio::{AudioManager, AudioSink};
use crate::highscores::{HighScoreEntry, HighScoreStore};
use crate::input::{InputState, Keys};
use crate::render::{self, Renderer};
use crate::sim::{Backdrop, GameState, Starfield, TickOutcome, Timer, tick};
use crate::tuning::Tuning;

#[derive(Debug)]
pub enum Scene {
    Title {
        backdrop: Backdrop,
    },
    Playing {
        game: Box<GameState>,
    },
    LevelTransition {
        game: Box<GameState>,
        timer: Timer,
    },
    GameOver {
        game: Box<GameState>,
        backdrop: Backdrop,
        /// The final score beat the stored one
        new_high_score: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Title,
    Playing,
    LevelTransition,
    GameOver,
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Title { .. } => SceneKind::Title,
            Scene::Playing { .. } => SceneKind::Playing,
            Scene::LevelTransition { .. } => SceneKind::LevelTransition,
            Scene::GameOver { .. } => SceneKind::GameOver,
        }
    }

    /// The play session, if this scene has one
    pub fn game(&self) -> Option<&GameState> {
        match self {
            Scene::Title { .. } => None,
            Scene::Playing { game }
            | Scene::LevelTransition { game, .. }
            | Scene::GameOver { game, .. } => Some(&**game),
        }
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        match self {
            Scene::Title { .. } => None,
            Scene::Playing { game }
            | Scene::LevelTransition { game, .. }
            | Scene::GameOver { game, .. } => Some(&mut **game),
        }
    }
}

/// Whether the process should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Top-level driver: owns the active scene and the collaborators
pub struct Game<S: HighScoreStore, A: AudioSink> {
    scene: Scene,
    tuning: Tuning,
    high_score: u64,
    store: S,
    audio: AudioManager<A>,
    seed: u64,
    sessions: u64,
}

impl<S: HighScoreStore, A: AudioSink> Game<S, A> {
    pub fn new(tuning: Tuning, store: S, audio: A, seed: u64) -> Self {
        let high_score = store.read();
        let backdrop = Backdrop::new(seed, &tuning);
        Self {
            scene: Scene::Title { backdrop },
            tuning,
            high_score,
            store,
            audio: AudioManager::new(audio),
            seed,
            sessions: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn game_state(&self) -> Option<&GameState> {
        self.scene.game()
    }

    pub fn game_state_mut(&mut self) -> Option<&mut GameState> {
        self.scene.game_mut()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    /// Advance the active scene by one tick
    pub fn update(&mut self, input: &InputState, dt: f32) -> Flow {
        let placeholder = Scene::Title {
            backdrop: Backdrop::from_starfield(self.seed, Starfield::default()),
        };
        let scene = std::mem::replace(&mut self.scene, placeholder);
        let from = scene.kind();

        let (next, flow) = self.step(scene, input, dt);

        if next.kind() != from {
            log::info!("Scene {:?} -> {:?}", from, next.kind());
        }
        self.scene = next;
        flow
    }

    pub fn render(&self, r: &mut impl Renderer) {
        match &self.scene {
            Scene::Title { backdrop } => render::draw_title(r, backdrop, self.high_score),
            Scene::Playing { game } => render::draw_game(r, game),
            Scene::LevelTransition { game, .. } => {
                render::draw_level_banner(r, &game.stars, game.level)
            }
            Scene::GameOver {
                game,
                backdrop,
                new_high_score,
            } => render::draw_game_over(r, backdrop, game.score, *new_high_score),
        }
    }

    fn step(&mut self, scene: Scene, input: &InputState, dt: f32) -> (Scene, Flow) {
        let next = match scene {
            Scene::Title { mut backdrop } => {
                if input.just_pressed(Keys::SPACE) {
                    Scene::Playing {
                        game: Box::new(self.new_session()),
                    }
                } else {
                    backdrop.update(&self.tuning, dt);
                    Scene::Title { backdrop }
                }
            }

            Scene::Playing { mut game } => {
                let outcome = tick(&mut game, &input.tick_input(), dt);
                self.audio.handle_events(&game.events);
                match outcome {
                    TickOutcome::Continue => Scene::Playing { game },
                    TickOutcome::LevelCleared => Scene::LevelTransition {
                        game,
                        timer: Timer::new(self.tuning.level_transition_duration),
                    },
                    TickOutcome::GameOver => {
                        let new_high_score = self.record_score(&game);
                        let backdrop = Backdrop::from_starfield(game.seed, game.stars.clone());
                        Scene::GameOver {
                            game,
                            backdrop,
                            new_high_score,
                        }
                    }
                }
            }

            Scene::LevelTransition { mut game, mut timer } => {
                timer.update(dt);
                game.stars.update(dt);
                if timer.is_ready() || input.just_released(Keys::SPACE) {
                    game.start_level();
                    log::info!("Starting level {}", game.level);
                    Scene::Playing { game }
                } else {
                    Scene::LevelTransition { game, timer }
                }
            }

            Scene::GameOver {
                mut game,
                mut backdrop,
                new_high_score,
            } => {
                if input.just_pressed(Keys::Q) {
                    log::info!("Quit requested");
                    return (
                        Scene::GameOver {
                            game,
                            backdrop,
                            new_high_score,
                        },
                        Flow::Quit,
                    );
                }
                if input.just_pressed(Keys::SPACE) {
                    game.reset_full();
                    Scene::Playing { game }
                } else {
                    backdrop.update(&self.tuning, dt);
                    Scene::GameOver {
                        game,
                        backdrop,
                        new_high_score,
                    }
                }
            }
        };
        (next, Flow::Continue)
    }

    fn new_session(&mut self) -> GameState {
        self.sessions += 1;
        let seed = self.seed.wrapping_add(self.sessions);
        GameState::new(seed, self.tuning.clone())
    }

    /// Persist the session's score if it is a new best. Returns true when it is.
    fn record_score(&mut self, game: &GameState) -> bool {
        if game.score <= self.high_score {
            log::info!("Game over with {} (best {})", game.score, self.high_score);
            return false;
        }

        self.high_score = game.score;
        let entry = HighScoreEntry {
            score: game.score,
            level: game.level,
        };
        if let Err(e) = self.store.write(entry) {
            log::warn!("Failed to save high score {}: {}", game.score, e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::consts::SIM_DT;
    use crate::highscores::MemoryHighScoreStore;

    type TestGame = Game<MemoryHighScoreStore, NullAudio>;

    fn game_with(store: MemoryHighScoreStore) -> TestGame {
        Game::new(Tuning::default(), store, NullAudio, 77)
    }

    fn press(game: &mut TestGame, input: &mut InputState, key: Keys) -> Flow {
        input.begin_frame();
        input.set(key, true);
        let flow = game.update(input, SIM_DT);
        input.begin_frame();
        input.set(key, false);
        flow
    }

    fn idle(game: &mut TestGame, input: &mut InputState, dt: f32) -> Flow {
        input.begin_frame();
        game.update(input, dt)
    }

    /// Drive the session to GameOver with the given final score
    fn lose_with_score(game: &mut TestGame, input: &mut InputState, score: u64) {
        let dt = {
            let state = game.game_state_mut().unwrap();
            state.score = score;
            state.player.lives_remaining = 1;
            state.player.begin_dying();
            state.tuning.dying_frame_interval
        };
        for _ in 0..Tuning::default().dying_frames {
            idle(game, input, dt);
        }
        assert_eq!(game.kind(), SceneKind::GameOver);
    }

    #[test]
    fn test_title_waits_for_space() {
        let mut game = game_with(MemoryHighScoreStore::new());
        let mut input = InputState::new();
        for _ in 0..30 {
            idle(&mut game, &mut input, SIM_DT);
        }
        assert_eq!(game.kind(), SceneKind::Title);
        press(&mut game, &mut input, Keys::SPACE);
        assert_eq!(game.kind(), SceneKind::Playing);
        assert_eq!(game.game_state().unwrap().level, 1);
    }

    #[test]
    fn test_new_high_score_written_once() {
        let mut game = game_with(MemoryHighScoreStore::with_score(10));
        let mut input = InputState::new();
        press(&mut game, &mut input, Keys::SPACE);
        lose_with_score(&mut game, &mut input, 25);

        assert_eq!(game.high_score(), 25);
        assert_eq!(game.store().writes, 1);
        assert!(matches!(game.scene(), Scene::GameOver { new_high_score: true, .. }));

        for _ in 0..120 {
            idle(&mut game, &mut input, SIM_DT);
        }
        assert_eq!(game.store().writes, 1);
    }

    #[test]
    fn test_lower_score_not_written() {
        let mut game = game_with(MemoryHighScoreStore::with_score(100));
        let mut input = InputState::new();
        press(&mut game, &mut input, Keys::SPACE);
        lose_with_score(&mut game, &mut input, 100);
        assert_eq!(game.store().writes, 0);
        assert!(matches!(game.scene(), Scene::GameOver { new_high_score: false, .. }));
    }

    #[test]
    fn test_failed_write_keeps_in_memory_best() {
        let mut store = MemoryHighScoreStore::new();
        store.fail_writes = true;
        let mut game = game_with(store);
        let mut input = InputState::new();
        press(&mut game, &mut input, Keys::SPACE);
        lose_with_score(&mut game, &mut input, 5);
        assert_eq!(game.high_score(), 5);
        assert_eq!(game.store().read(), 0);
    }

    #[test]
    fn test_game_over_restart_and_quit() {
        let mut game = game_with(MemoryHighScoreStore::new());
        let mut input = InputState::new();
        press(&mut game, &mut input, Keys::SPACE);
        lose_with_score(&mut game, &mut input, 3);

        press(&mut game, &mut input, Keys::SPACE);
        assert_eq!(game.kind(), SceneKind::Playing);
        let state = game.game_state().unwrap();
        assert_eq!((state.score, state.level, state.player.lives_remaining), (0, 1, 3));

        lose_with_score(&mut game, &mut input, 0);
        assert_eq!(press(&mut game, &mut input, Keys::Q), Flow::Quit);
    }

    #[test]
    fn test_level_transition_on_release() {
        let mut game = game_with(MemoryHighScoreStore::new());
        let mut input = InputState::new();
        press(&mut game, &mut input, Keys::SPACE);

        let state = game.game_state_mut().unwrap();
        state.meteor_schedule.spawned_this_level = state.meteor_schedule.meteors_per_level;
        idle(&mut game, &mut input, SIM_DT);
        assert_eq!(game.kind(), SceneKind::LevelTransition);
        assert_eq!(game.game_state().unwrap().level, 2);

        // Holding SPACE keeps the banner; releasing it starts the level
        input.begin_frame();
        input.set(Keys::SPACE, true);
        game.update(&input, SIM_DT);
        assert_eq!(game.kind(), SceneKind::LevelTransition);
        input.begin_frame();
        input.set(Keys::SPACE, false);
        game.update(&input, SIM_DT);
        assert_eq!(game.kind(), SceneKind::Playing);
        assert_eq!(game.game_state().unwrap().meteor_schedule.meteors_per_level, 4);
    }
}
