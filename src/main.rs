//! Canvas Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, TouchEvent};

    use canvas_invaders::Game;
    use canvas_invaders::consts::*;
    use canvas_invaders::input::RawInput;
    use canvas_invaders::platform::web::{CanvasPresenter, LocalStorageStore, poll_gamepad};
    use canvas_invaders::platform::{KeyValueStore, MemoryStore};

    /// Browser shell around the game driver
    struct App {
        game: Game<Box<dyn KeyValueStore>>,
        presenter: CanvasPresenter,
        raw: RawInput,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            // Calculate delta time
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.raw.gamepad = poll_gamepad();
            self.game.frame(dt, &self.raw);
            self.raw.clicks.clear();
            self.game.record_frame_time(time);

            if let Some(window) = web_sys::window() {
                self.presenter.resize(window.device_pixel_ratio());
            }
            if let Err(e) = self.presenter.present(&self.game.draw()) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Canvas Invaders starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let presenter = CanvasPresenter::new(canvas.clone())?;
        presenter.resize(window.device_pixel_ratio());

        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; high score will not persist");
                Box::new(MemoryStore::new())
            }
        };

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, store),
            presenter,
            raw: RawInput::default(),
            last_time: 0.0,
        }));

        setup_keyboard(&window, app.clone())?;
        setup_pointer(&canvas, app.clone())?;
        setup_touch(&canvas, app.clone())?;
        setup_auto_pause(&window, app.clone())?;

        // Start game loop
        request_animation_frame(app);

        log::info!("Canvas Invaders running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        for (event, down) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().raw.keys.set_key(&event.key(), down) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let mut a = app.borrow_mut();
            let point = a
                .presenter
                .to_logical(event.client_x() as f64, event.client_y() as f64);
            a.raw.clicks.push(point);
        });
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Every touch event replaces the full set of active points
        for event in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let list = event.touches();
                let touches = (0..list.length())
                    .filter_map(|i| list.get(i))
                    .map(|t| a.presenter.to_logical(t.client_x() as f64, t.client_y() as f64))
                    .collect();
                a.raw.touches = touches;
            });
            canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_auto_pause(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if app.borrow_mut().game.auto_pause() {
                log::info!("Auto-paused (window blur)");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use canvas_invaders::consts::*;
    use canvas_invaders::input::{KeyState, RawInput};
    use canvas_invaders::{Game, Tuning};
    use canvas_invaders::platform::{JsonFileStore, KeyValueStore, MemoryStore};
    use canvas_invaders::sim::{GamePhase, GameState};

    /// Store file in the system temp directory
    const STORE_FILE: &str = "canvas_invaders.json";
    const TUNING_ENV: &str = "CANVAS_INVADERS_TUNING";
    /// Stop after this many lost rounds
    const MAX_ROUNDS: u32 = 3;
    /// Hard cap on simulated frames (ten minutes at 60 Hz)
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Keys a simple bot would hold this frame
    pub fn autopilot(state: &GameState, frame: u64) -> RawInput {
        // Alternate so the aggregator sees fresh presses
        let tap = frame % 2 == 0;
        let mut keys = KeyState::default();
        match state.phase {
            GamePhase::Title
            | GamePhase::Paused
            | GamePhase::GameOver
            | GamePhase::LevelComplete => keys.confirm = tap,
            GamePhase::Playing => {
                let cx = state.player.rect.center().x;
                let threat = state
                    .enemy_bullets
                    .iter()
                    .map(|b| b.rect)
                    .chain(
                        state
                            .falling
                            .iter()
                            .filter(|f| f.kind.is_bomb())
                            .map(|f| f.rect),
                    )
                    .filter(|r| r.bottom() > PLAYER_Y - 120.0)
                    .find(|r| (r.center().x - cx).abs() < PLAYER_WIDTH);
                let target = match threat {
                    Some(r) if r.center().x > cx => cx - PLAYER_WIDTH,
                    Some(_) => cx + PLAYER_WIDTH,
                    None => state
                        .enemies
                        .iter()
                        .filter(|e| e.alive)
                        .map(|e| e.rect.center().x)
                        .min_by(|a, b| (a - cx).abs().total_cmp(&(b - cx).abs()))
                        .unwrap_or(cx),
                };
                keys.left = target < cx - 2.0;
                keys.right = target > cx + 2.0;
                keys.fire = tap;
            }
            _ => {}
        }
        RawInput {
            keys,
            ..Default::default()
        }
    }

    /// Balance overrides from the JSON file named by `CANVAS_INVADERS_TUNING`
    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var(TUNING_ENV) else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Tuning overrides from {}", path);
                Tuning::from_json_or_default(&json)
            }
            Err(e) => {
                log::warn!("Could not read {}: {e}", path);
                Tuning::default()
            }
        }
    }

    pub fn run(seed: u64) {
        let path = std::env::temp_dir().join(STORE_FILE);
        let store: Box<dyn KeyValueStore> = match JsonFileStore::open(&path) {
            Ok(store) => {
                log::info!("High score file: {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("Could not open {}: {e}; using memory store", path.display());
                Box::new(MemoryStore::new())
            }
        };

        let mut game = Game::with_tuning(seed, load_tuning(), store);
        let mut rounds = 0;
        let mut best_level = 1;
        let mut last_phase = game.state.phase;

        for frame in 0..MAX_FRAMES {
            let raw = autopilot(&game.state, frame);
            game.frame(SIM_DT, &raw);
            best_level = best_level.max(game.state.level);

            let phase = game.state.phase;
            if phase != last_phase && phase == GamePhase::GameOver {
                rounds += 1;
                log::info!(
                    "Round {} over at level {} with {} points",
                    rounds,
                    game.state.level,
                    game.state.score
                );
                if rounds >= MAX_ROUNDS {
                    break;
                }
            }
            last_phase = phase;
        }

        log::info!(
            "Session done: {} ticks, {} rounds, best level {}, high score {}",
            game.state.time_ticks,
            rounds,
            best_level,
            game.high_score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canvas Invaders (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
    headless::run(seed);
}
