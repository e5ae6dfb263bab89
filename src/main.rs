//! Road Rider entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, HtmlMediaElement, KeyboardEvent};

    use road_rider::persistence::LocalStorageStore;
    use road_rider::platform::BrowserClock;
    use road_rider::renderer::{CanvasRenderer, Renderer};
    use road_rider::sim::{GameEvent, GamePhase, SeededRandom, Simulation, autopilot};
    use road_rider::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        renderer: Option<CanvasRenderer>,
        settings: Settings,
        /// A frame callback is pending
        loop_active: bool,
        /// Idle/demo mode - autopilot rides
        idle_mode: bool,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut sim = Simulation::new(
                Tuning::default(),
                BrowserClock,
                SeededRandom::new(seed),
                LocalStorageStore::new(),
            );
            sim.set_fire_trail(settings.fire_trail);
            Self {
                sim,
                renderer: None,
                settings,
                loop_active: false,
                idle_mode: false,
            }
        }

        fn render(&mut self) {
            if let Some(ref mut renderer) = self.renderer {
                renderer.draw(&self.sim.frame());
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let telemetry = self.sim.telemetry();
            let lines = [
                ("score", telemetry.score_line()),
                ("high-score", telemetry.high_score_line()),
                ("speed", telemetry.speed_line()),
                ("time", telemetry.time_line()),
            ];
            for (id, text) in lines {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&text));
                }
            }

            set_display("game-over", self.sim.phase() == GamePhase::GameOver);

            if let Some(el) = document.get_element_by_id("pause-button") {
                let label = if self.sim.phase() == GamePhase::Paused {
                    "▶ Resume"
                } else {
                    "⏸ Pause"
                };
                el.set_text_content(Some(label));
            }
        }

        /// React to simulation events with background media
        fn apply_events(&mut self) {
            for event in self.sim.drain_events() {
                match event {
                    GameEvent::Started => {
                        set_display("start-image", false);
                        if self.settings.background_video {
                            set_display("bg-video", true);
                            play_media("bg-video", None);
                        }
                        if self.settings.music {
                            play_media("bg-music", Some(self.settings.effective_music_volume()));
                        }
                    }
                    GameEvent::Resumed => {
                        if self.settings.background_video {
                            play_media("bg-video", None);
                        }
                        if self.settings.music {
                            play_media("bg-music", Some(self.settings.effective_music_volume()));
                        }
                    }
                    GameEvent::Paused | GameEvent::Crashed { .. } => {
                        pause_media("bg-video");
                        pause_media("bg-music");
                    }
                    GameEvent::NewHighScore(score) => {
                        log::info!("New high score: {}", score);
                    }
                    GameEvent::Jumped | GameEvent::ObstacleSpawned(_) | GameEvent::SpeedUp(_) => {}
                }
            }
        }

        fn restart(&mut self) {
            self.sim.restart();
            if let Some(el) = media("bg-music") {
                el.set_current_time(0.0);
            }
        }
    }

    fn media(id: &str) -> Option<HtmlMediaElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlMediaElement>()
            .ok()
    }

    fn play_media(id: &str, volume: Option<f32>) {
        if let Some(el) = media(id) {
            if let Some(volume) = volume {
                el.set_volume(volume as f64);
            }
            // Autoplay may be refused before a user gesture; the game runs regardless
            if let Err(e) = el.play() {
                log::warn!("Could not play #{}: {:?}", id, e);
            }
        }
    }

    fn pause_media(id: &str) {
        if let Some(el) = media(id) {
            let _ = el.pause();
        }
    }

    fn set_display(id: &str, visible: bool) {
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        if let Some(el) = el {
            let value = if visible { "block" } else { "none" };
            let _ = el.style().set_property("display", value);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Road Rider starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("gameCanvas"))
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok());
        match canvas {
            Some(canvas) => {
                let (w, h) = {
                    let tuning = game.borrow().sim.tuning().clone();
                    (tuning.field_width as u32, tuning.field_height as u32)
                };
                match CanvasRenderer::new(&canvas, w, h) {
                    Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
                    Err(e) => log::error!("Canvas unavailable, running without rendering: {:?}", e),
                }
            }
            None => log::error!("No #gameCanvas element, running without rendering"),
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        {
            let mut g = game.borrow_mut();
            g.render();
            g.update_hud();
        }

        log::info!("Road Rider ready");
    }

    /// Enter the frame loop unless a callback is already pending
    fn schedule(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_active {
                return;
            }
            g.loop_active = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            if g.idle_mode && autopilot::should_jump(g.sim.state()) {
                g.sim.jump();
            }
            let outcome = g.sim.tick();
            g.apply_events();
            g.render();
            g.update_hud();
            if !outcome.should_continue() {
                g.loop_active = false;
            }
            outcome.should_continue()
        };

        if keep_going {
            request_animation_frame(game);
        }
    }

    fn jump(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        g.sim.jump();
        g.apply_events();
    }

    fn toggle_pause(game: Rc<RefCell<Game>>) {
        let resumed = {
            let mut g = game.borrow_mut();
            let resumed = g.sim.toggle_pause();
            g.apply_events();
            g.update_hud();
            resumed
        };
        if resumed {
            schedule(game);
        }
    }

    fn restart(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.restart();
            g.apply_events();
            g.update_hud();
        }
        schedule(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Tap and click both jump
        for event_name in ["touchstart", "mousedown"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                if event_name == "touchstart" {
                    event.prevent_default();
                }
                jump(&game);
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.code().as_str() {
                    "Space" | "ArrowUp" => {
                        event.prevent_default();
                        jump(&game);
                    }
                    "KeyP" | "Escape" => toggle_pause(game.clone()),
                    "Enter" => {
                        let phase = game.borrow().sim.phase();
                        if matches!(phase, GamePhase::Idle | GamePhase::GameOver) {
                            restart(game.clone());
                        }
                    }
                    "KeyI" => {
                        let mut g = game.borrow_mut();
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    "KeyF" => {
                        let mut g = game.borrow_mut();
                        g.settings.fire_trail = !g.settings.fire_trail;
                        let enabled = g.settings.fire_trail;
                        g.sim.set_fire_trail(enabled);
                        g.settings.save();
                    }
                    "KeyM" => {
                        let mut g = game.borrow_mut();
                        g.settings.music = !g.settings.music;
                        if g.settings.music && g.sim.phase() == GamePhase::Running {
                            play_media("bg-music", Some(g.settings.effective_music_volume()));
                        } else {
                            pause_media("bg-music");
                        }
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-button", "restart-button"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    restart(game.clone());
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pause-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                toggle_pause(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow().sim.phase() == GamePhase::Running
                {
                    toggle_pause(game.clone());
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if game.borrow().sim.phase() == GamePhase::Running {
                    toggle_pause(game.clone());
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run with the autopilot, for smoke testing outside the browser
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use road_rider::Tuning;
    use road_rider::persistence::{FileStore, HighScoreStore, MemoryStore};
    use road_rider::platform::ManualClock;
    use road_rider::sim::{GameEvent, SeededRandom, Simulation, StepDriver, TickOutcome, autopilot};

    const DEFAULT_MAX_TICKS: u64 = 20_000;

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("ROAD_RIDER_TUNING") else {
            return Tuning::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    /// Log notable events and count the jumps among them
    fn count_jumps(events: Vec<GameEvent>) -> u32 {
        let mut jumps = 0;
        for event in events {
            match event {
                GameEvent::Jumped => jumps += 1,
                GameEvent::SpeedUp(speed) => log::debug!("Obstacle speed {:.1}", speed),
                GameEvent::NewHighScore(score) => log::info!("New high score {}", score),
                _ => {}
            }
        }
        jumps
    }

    fn open_store() -> Box<dyn HighScoreStore> {
        match FileStore::default_path() {
            Some(path) => {
                log::info!("High score file: {}", path.display());
                Box::new(FileStore::new(path))
            }
            None => {
                log::warn!("No data directory, high score will not persist");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let max_ticks = args
            .next()
            .and_then(|a| a.parse().ok())
            .unwrap_or(DEFAULT_MAX_TICKS);
        let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        log::info!("Road Rider (headless) starting with seed {}", seed);

        let clock = ManualClock::new(0.0);
        let rng = SeededRandom::new(seed);
        let mut sim = Simulation::new(load_tuning(), clock.clone(), rng, open_store());
        let driver = StepDriver::new(clock);

        let mut jumps = 0;
        sim.start();
        let report = driver.run_until_stopped(&mut sim, max_ticks, |sim| {
            jumps += count_jumps(sim.drain_events());
            if autopilot::should_jump(sim.state()) {
                sim.jump();
            }
        });
        jumps += count_jumps(sim.drain_events());

        let telemetry = sim.telemetry();
        match report.last {
            TickOutcome::Crashed { score, .. } => println!("Crashed with score {}", score),
            _ => println!("Still riding after {} ticks", report.ticks),
        }
        println!(
            "{} | {} | {} | {} | jumps: {}",
            telemetry.score_line(),
            telemetry.high_score_line(),
            telemetry.speed_line(),
            telemetry.time_line(),
            jumps
        );
    }
}
