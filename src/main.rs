//! Granny Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use granny_run::commentary::{self, LOADING_LINE};
    use granny_run::platform::screen::{GAME_OVER_OVERLAY, TITLE_OVERLAY};
    use granny_run::platform::{InputAction, InputSource, InputState, Screen, action_for_key};
    use granny_run::renderer::{CanvasRenderer, RenderHook};
    use granny_run::sim::{GameEvent, Runner};
    use granny_run::{HighScore, Settings, Tuning};

    /// LocalStorage key for a developer tuning override
    const TUNING_KEY: &str = "granny_run_tuning";

    /// Game instance holding all state
    struct Game {
        runner: Runner,
        renderer: CanvasRenderer,
        input: InputState,
        screen: Screen,
        high_score: HighScore,
        settings: Settings,
        /// Last score shown in the HUD
        score: u32,
        /// `None` while the commentary request is in flight
        commentary: Option<String>,
        /// Bumped every run so a late commentary reply cannot land on a newer run
        run_id: u32,
    }

    impl Game {
        fn start_run(&mut self) {
            self.runner.start();
            self.input.clear();
            self.screen = Screen::Playing;
            self.score = 0;
            self.commentary = None;
            self.run_id = self.run_id.wrapping_add(1);
        }

        /// Advance and draw one frame; returns the final score if the run just ended
        fn frame(&mut self, time: f64) -> Option<u32> {
            match self.screen {
                Screen::Title => {
                    self.renderer.render_idle(self.runner.state());
                    None
                }
                // Last frame stays on screen under the overlay
                Screen::GameOver => None,
                Screen::Playing => {
                    self.input.apply(&mut self.runner);
                    self.runner.tick(time);
                    self.renderer.render(self.runner.state(), time);

                    let mut ended = None;
                    for event in self.runner.drain_events() {
                        match event {
                            GameEvent::ScoreChanged(score) => self.score = score.floor() as u32,
                            GameEvent::GameOver { score } => ended = Some(score),
                        }
                    }
                    if let Some(score) = ended {
                        self.score = score;
                        self.screen = Screen::GameOver;
                        if self.high_score.record(score) {
                            log::info!("New high score: {}", score);
                            self.high_score.save();
                        }
                    }
                    ended
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            // Only the `hidden` token changes; other classes stay
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.class_list().toggle_with_force("hidden", !visible);
                }
            };

            set_text("hud-score", &self.score.to_string());
            set_text("hud-high", &self.high_score.best.to_string());

            for (id, visible) in self.screen.overlays() {
                set_visible(id, visible);
            }

            if self.screen == Screen::GameOver {
                set_text("final-score", &self.score.to_string());
                match &self.commentary {
                    Some(line) => set_text("commentary", &format!("\"{}\"", line)),
                    None => set_text("commentary", LOADING_LINE),
                }
            }
        }
    }

    /// Fetch the one-liner without holding the game borrow across the await
    fn request_commentary(game: Rc<RefCell<Game>>, score: u32) {
        let (settings, run_id) = {
            let g = game.borrow();
            (g.settings.commentary.clone(), g.run_id)
        };
        wasm_bindgen_futures::spawn_local(async move {
            let line = commentary::commentary_for(&settings, score).await;
            let mut g = game.borrow_mut();
            if g.run_id == run_id {
                g.commentary = Some(line);
            }
        });
    }

    fn load_tuning() -> Tuning {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(TUNING_KEY).ok())
            .flatten();
        match stored {
            Some(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Using tuning override from LocalStorage");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning override: {}", e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Granny Run starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let tuning = load_tuning();
        let settings = Settings::load();
        let mut renderer = CanvasRenderer::new(&canvas, &tuning)?;
        renderer.set_reduced_motion(settings.reduced_motion);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            runner: Runner::with_seed(tuning, seed),
            renderer,
            input: InputState::new(),
            screen: Screen::Title,
            high_score: HighScore::load(),
            settings,
            score: 0,
            commentary: None,
            run_id: 0,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_pointer(&canvas, game.clone());
        setup_buttons(game.clone());

        game.borrow().update_hud();
        request_animation_frame(game);

        log::info!("Granny Run running!");
        Ok(())
    }

    /// Register a DOM event handler for the lifetime of the page
    fn listen<E>(target: &EventTarget, name: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            listen(&window, "keydown", move |event: KeyboardEvent| {
                let Some(action) = action_for_key(&event.code(), &event.key()) else {
                    return;
                };
                event.prevent_default();
                let mut g = game.borrow_mut();
                match g.screen {
                    Screen::Playing => g.input.press(action, InputSource::Keyboard),
                    screen if screen.starts_run_on_key(action, event.repeat()) => g.start_run(),
                    _ => {}
                }
            });
        }

        {
            let game = game.clone();
            listen(&window, "keyup", move |event: KeyboardEvent| {
                if let Some(action) = action_for_key(&event.code(), &event.key()) {
                    event.prevent_default();
                    game.borrow_mut().input.release(action, InputSource::Keyboard);
                }
            });
        }

        // Nothing stays held while the window is in the background
        listen(&window, "blur", move |_event: web_sys::Event| {
            game.borrow_mut().input.clear();
        });
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Clicking the field jumps
        {
            let game = game.clone();
            listen(canvas, "mousedown", move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.screen == Screen::Playing {
                    g.input.press(InputAction::Jump, InputSource::Pointer);
                }
            });
        }
        {
            let game = game.clone();
            listen(canvas, "mouseup", move |_event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .release(InputAction::Jump, InputSource::Pointer);
            });
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Hold-to-duck and tap-to-jump buttons under the field
        for (id, action) in [("duck-btn", InputAction::Duck), ("jump-btn", InputAction::Jump)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };

            for name in ["touchstart", "mousedown"] {
                let game = game.clone();
                listen(&btn, name, move |event: web_sys::Event| {
                    event.prevent_default();
                    game.borrow_mut().input.press(action, InputSource::Pointer);
                });
            }
            for name in ["touchend", "touchcancel", "mouseup", "mouseleave"] {
                let game = game.clone();
                listen(&btn, name, move |event: web_sys::Event| {
                    event.prevent_default();
                    game.borrow_mut().input.release(action, InputSource::Pointer);
                });
            }
        }

        // Touching the field itself also jumps
        {
            let game = game.clone();
            listen(canvas, "touchstart", move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if g.screen == Screen::Playing {
                    g.input.press(InputAction::Jump, InputSource::Pointer);
                }
            });
        }
        listen(canvas, "touchend", move |event: TouchEvent| {
            event.prevent_default();
            game.borrow_mut()
                .input
                .release(InputAction::Jump, InputSource::Pointer);
        });
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // The restart button sits inside the game-over overlay; its clicks bubble up
        for id in [TITLE_OVERLAY, GAME_OVER_OVERLAY] {
            if let Some(el) = document.get_element_by_id(id) {
                let game = game.clone();
                listen(&el, "click", move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    if g.screen.starts_run_on_click() {
                        g.start_run();
                        log::info!("Run {} started", g.run_id);
                    }
                });
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let ended = {
            let mut g = game.borrow_mut();
            let ended = g.frame(time);
            g.update_hud();
            ended
        };

        if let Some(score) = ended {
            request_commentary(game.clone(), score);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use granny_run::commentary::{self, CommentaryError};
    use granny_run::consts::FRAME_MS;
    use granny_run::renderer::{LogRenderer, RenderHook};
    use granny_run::sim::{AutopilotInput, Runner, autopilot_input};
    use granny_run::{HighScore, Tuning};

    /// Ten minutes of frames
    const MAX_DEMO_FRAMES: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Granny Run (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut runner = Runner::with_seed(tuning, seed);
    let mut renderer = LogRenderer::new(60);
    let mut high_score = HighScore::load();
    runner.start();

    let mut frame = 0u64;
    while runner.is_active() && frame < MAX_DEMO_FRAMES {
        let now = frame as f64 * FRAME_MS;
        let AutopilotInput { jump, duck } = autopilot_input(runner.state(), runner.tuning());
        runner.set_duck_input(duck);
        runner.set_jump_input(jump);
        runner.tick(now);
        renderer.render(runner.state(), now);
        frame += 1;
    }

    match runner.final_score() {
        Some(score) => {
            if high_score.record(score) {
                high_score.save();
            }
            println!("Granny tripped after {} frames with a score of {}", frame, score);
            println!(
                "Granny says: \"{}\"",
                commentary::line_or_fallback(Err(CommentaryError::Unavailable))
            );
        }
        None => println!(
            "Granny is still running after {} frames (score {})",
            frame,
            runner.state().display_score()
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
