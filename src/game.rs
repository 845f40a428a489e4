//! Game loop driver
//!
//! Owns the simulation state, the input aggregator and the key-value store.
//! Each animation frame: sample input, run fixed-timestep ticks, react to the
//! events they raised (persistence), and hand back a draw list on request.

use crate::consts::*;
use crate::highscores::HighScore;
use crate::input::{InputAggregator, RawInput};
use crate::platform::KeyValueStore;
use crate::renderer::{self, DrawList};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Game instance holding all state
pub struct Game<S: KeyValueStore> {
    pub state: GameState,
    input: InputAggregator,
    /// Input waiting for the next tick; one-shots survive frames with no tick
    pending: TickInput,
    accumulator: f32,
    store: S,
    high_score: HighScore,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl<S: KeyValueStore> Game<S> {
    pub fn new(seed: u64, store: S) -> Self {
        Self::with_tuning(seed, Tuning::default(), store)
    }

    /// Build the driver, reading the high score and settings once
    pub fn with_tuning(seed: u64, tuning: Tuning, store: S) -> Self {
        let high_score = HighScore::load(&store);
        let mut state = GameState::with_tuning(seed, tuning);
        state.high_score = high_score.best;
        state.settings = Settings::load(&store);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state,
            input: InputAggregator::new(),
            pending: TickInput::default(),
            accumulator: 0.0,
            store,
            high_score,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Advance by `dt` seconds of real time. Returns the number of ticks run.
    pub fn frame(&mut self, dt: f32, raw: &RawInput) -> u32 {
        let sampled = self.input.sample(raw, self.state.settings.touch_controls);
        self.pending.absorb(sampled);

        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.pending.clone();
            tick(&mut self.state, &input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending.clear_one_shots();
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than chase it next frame
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.handle_events();
        substeps
    }

    /// Feed a frame timestamp (milliseconds) into the FPS estimate
    pub fn record_frame_time(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % 60;

        // Calculate FPS from oldest to newest frame
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Pause an active round (focus loss, hidden tab)
    pub fn auto_pause(&mut self) -> bool {
        if self.state.phase == GamePhase::Playing {
            self.state.set_phase(GamePhase::Paused);
            self.handle_events();
            return true;
        }
        false
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Draw list for the current state
    pub fn draw(&self) -> DrawList {
        renderer::render(&self.state, Some(self.fps))
    }

    /// Best score known to the store
    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drain simulation events and apply their side effects
    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::NewHighScore(score) => {
                    if self.high_score.submit(score, &mut self.store) {
                        log::debug!("High score now {}", score);
                    }
                }
                GameEvent::SettingsChanged => {
                    if let Err(e) = self.state.settings.save(&mut self.store) {
                        log::warn!("Could not save settings: {e}");
                    }
                }
                GameEvent::PhaseChanged(GamePhase::GameOver) => {
                    log::info!(
                        "Final score {} (best {})",
                        self.state.score,
                        self.high_score.best
                    );
                }
                other => log::debug!("{:?}", other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::STORAGE_KEY;
    use crate::platform::MemoryStore;
    use crate::sim::spawn::build_level;
    use crate::sim::{Bullet, Enemy, EnemyKind};
    use glam::Vec2;

    fn quiet() -> Tuning {
        Tuning {
            enemy_fire_base: 0.0,
            enemy_fire_per_level: 0.0,
            enemy_fire_max: 0.0,
            falling_spawn_base: 0.0,
            falling_spawn_per_level: 0.0,
            falling_spawn_max: 0.0,
            ..Default::default()
        }
    }

    fn store_with_best(best: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, best).unwrap();
        store
    }

    /// A crab about to be hit by a player bullet
    fn one_kill_setup(game: &mut Game<MemoryStore>) {
        build_level(&mut game.state);
        game.state.enemies = vec![Enemy::new(100.0, 100.0, EnemyKind::Crab)];
        game.state.swarm_speed = 0.0;
        game.state.barriers.clear();
        game.state.player_bullets.push(Bullet::player(Vec2::new(115.0, 140.0)));
        game.state.phase = GamePhase::Playing;
    }

    fn click(x: f32, y: f32) -> RawInput {
        RawInput {
            clicks: vec![Vec2::new(x, y)],
            ..Default::default()
        }
    }

    #[test]
    fn test_loads_high_score_at_start() {
        let game = Game::new(1, store_with_best("1234"));
        assert_eq!(game.state.high_score, 1234);
        assert_eq!(game.high_score(), 1234);
    }

    #[test]
    fn test_substep_cap() {
        let mut game = Game::with_tuning(1, quiet(), MemoryStore::new());
        assert_eq!(game.frame(SIM_DT, &RawInput::default()), 1);
        assert_eq!(game.frame(1.0, &RawInput::default()), MAX_SUBSTEPS);
        assert_eq!(game.frame(0.0, &RawInput::default()), 1);
        assert_eq!(game.frame(0.0, &RawInput::default()), 0);
    }

    #[test]
    fn test_click_survives_frame_without_tick() {
        let mut game = Game::with_tuning(1, quiet(), MemoryStore::new());
        assert_eq!(game.frame(0.0, &click(400.0, 325.0)), 0);
        assert_eq!(game.state.phase, GamePhase::Title);
        game.frame(SIM_DT, &RawInput::default());
        assert!(matches!(game.state.phase, GamePhase::Countdown { .. }));
    }

    #[test]
    fn test_high_score_written_when_beaten() {
        let mut game = Game::with_tuning(1, quiet(), store_with_best("10"));
        one_kill_setup(&mut game);
        game.frame(SIM_DT, &RawInput::default());
        assert_eq!(game.state.score, 20);
        assert_eq!(game.store().get(STORAGE_KEY).unwrap().as_deref(), Some("20"));
        assert_eq!(game.high_score(), 20);
    }

    #[test]
    fn test_high_score_kept_when_not_beaten() {
        let mut game = Game::with_tuning(1, quiet(), store_with_best("500"));
        one_kill_setup(&mut game);
        game.frame(SIM_DT, &RawInput::default());
        assert_eq!(game.state.score, 20);
        assert_eq!(game.store().get(STORAGE_KEY).unwrap().as_deref(), Some("500"));
    }

    #[test]
    fn test_settings_toggle_persisted() {
        let mut game = Game::with_tuning(1, quiet(), MemoryStore::new());
        game.frame(SIM_DT, &click(400.0, 395.0));
        assert_eq!(game.state.phase, GamePhase::Settings);
        game.frame(SIM_DT, &click(400.0, 310.0));
        assert!(game.state.settings.touch_controls);

        let reloaded = Game::new(2, game.store().clone());
        assert!(reloaded.state.settings.touch_controls);
    }

    #[test]
    fn test_auto_pause_only_while_playing() {
        let mut game = Game::with_tuning(1, quiet(), MemoryStore::new());
        assert!(!game.auto_pause());
        assert_eq!(game.state.phase, GamePhase::Title);
        game.state.phase = GamePhase::Playing;
        assert!(game.auto_pause());
        assert_eq!(game.state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_fps_estimate() {
        let mut game = Game::new(1, MemoryStore::new());
        for i in 1..=120 {
            game.record_frame_time(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(game.fps(), 60);
    }

    #[test]
    fn test_draw_uses_current_phase() {
        let game = Game::new(1, MemoryStore::new());
        assert!(game.draw().texts().any(|t| t == "START"));
    }
}
