//! Grid Snake entry point
//!
//! Handles platform-specific initialization. On the web this wires DOM
//! events into the session and runs the render loop; natively it plays a
//! headless autopilot run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use grid_snake::audio::{AudioManager, SoundEffect};
    use grid_snake::input::{KeyAction, SwipeTracker, action_for_key};
    use grid_snake::platform::{IntervalScheduler, LocalStorageStore};
    use grid_snake::renderer::CanvasRenderer;
    use grid_snake::{Command, GamePhase, Session, Settings};

    type WebSession = Session<LocalStorageStore, IntervalScheduler>;

    /// Game instance holding all state
    struct Game {
        session: WebSession,
        settings: Settings,
        settings_store: LocalStorageStore,
        swipe: SwipeTracker,
        audio: AudioManager,
        renderer: Option<CanvasRenderer>,
    }

    impl Game {
        /// Single entry point for every input source
        fn dispatch(&mut self, command: Command) {
            let events = self.session.dispatch(command);
            for event in &events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
            }
            if !events.is_empty() {
                self.update_hud();
            }
        }

        fn toggle_sound(&mut self) {
            let enabled = self.settings.toggle_sound();
            self.audio.set_volume(self.settings.effective_volume());
            log::info!("Sound {}", if enabled { "on" } else { "off" });
            if let Err(e) = self.settings.save(&mut self.settings_store) {
                log::warn!("Settings not saved: {}", e);
            }
            self.update_hud();
        }

        fn render(&self, time: f64) {
            if let Some(renderer) = &self.renderer {
                renderer.render(self.session.state(), &self.settings, time);
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
            let set_hidden = |id: &str, hidden: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
                }
            };

            set_text("score", &self.session.score().to_string());
            set_text("high-score", &self.session.high_score().to_string());

            let phase = self.session.phase();
            set_hidden("overlay", phase == GamePhase::Running);
            match phase {
                GamePhase::Running => {}
                GamePhase::Paused => {
                    set_text("overlay-title", "Paused");
                    set_hidden("final-score", true);
                    set_text("overlay-btn", "Resume");
                }
                GamePhase::GameOver => {
                    set_text("overlay-title", "Game Over!");
                    set_text(
                        "final-score",
                        &format!("Final Score: {}", self.session.score()),
                    );
                    set_hidden("final-score", false);
                    set_text("overlay-btn", "Play Again");
                }
            }

            set_text(
                "pause-btn",
                if phase == GamePhase::Paused { "▶" } else { "❚❚" },
            );
            set_text(
                "sound-btn",
                if self.settings.sound_enabled { "🔊" } else { "🔇" },
            );
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Grid Snake starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let renderer = CanvasRenderer::new(canvas);
        if renderer.is_none() {
            log::error!("Canvas 2D context unavailable - nothing will be drawn");
        }

        let settings_store = LocalStorageStore::new();
        let settings = Settings::load(&settings_store);
        let seed = js_sys::Date::now() as u64;

        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            // The interval only holds a weak ref so dropping the game stops it
            let weak = weak.clone();
            let scheduler = IntervalScheduler::new(move || {
                if let Some(game) = weak.upgrade()
                    && let Ok(mut g) = game.try_borrow_mut()
                {
                    g.dispatch(Command::Tick);
                }
            });
            RefCell::new(Game {
                session: Session::new(LocalStorageStore::new(), scheduler, seed),
                swipe: SwipeTracker::new(settings.min_swipe_distance),
                audio: AudioManager::new(settings.effective_volume()),
                settings,
                settings_store,
                renderer,
            })
        });

        log::info!("Game initialized with seed: {}", seed);
        game.borrow().update_hud();

        setup_keyboard(game.clone());
        setup_touch(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Grid Snake running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match action_for_key(&event.key()) {
                KeyAction::Game(command) => {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                    g.dispatch(command);
                }
                KeyAction::ToggleSound => g.toggle_sound(),
                KeyAction::None => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Touch start - remember where the swipe began
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    game.borrow_mut().swipe.begin(pos);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - resolve the swipe
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.changed_touches().get(0) {
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let mut g = game.borrow_mut();
                    if let Some(direction) = g.swipe.finish(pos) {
                        g.dispatch(Command::Steer(direction));
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let buttons: [(&str, Option<Command>); 3] = [
            ("pause-btn", Some(Command::TogglePause)),
            // Resume when paused, play again after game over
            ("overlay-btn", Some(Command::Confirm)),
            ("sound-btn", None),
        ];

        for (id, command) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                match command {
                    Some(command) => g.dispatch(command),
                    None => g.toggle_sound(),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.phase() == GamePhase::Running {
                        log::info!("Auto-paused (tab hidden)");
                        g.dispatch(Command::Pause);
                    }
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
                let mut g = game.borrow_mut();
                if g.session.phase() == GamePhase::Running {
                    log::info!("Auto-paused (window blur)");
                    g.dispatch(Command::Pause);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game.borrow().render(time);
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use grid_snake::consts::GRID_SIZE;
    use grid_snake::sim::{Cell, Direction, GameState};
    use grid_snake::{Command, ManualScheduler, MemoryStore, Session};

    /// Stop runaway runs (a perfect autopilot could loop forever)
    const MAX_TICKS: u64 = 10_000;

    /// Greedy steering: safe moves first, then the one closest to the food
    fn autopilot(state: &GameState) -> Option<Direction> {
        let head = state.head();
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(state.heading))
            .filter(|d| {
                let next = head.step(*d);
                next.in_bounds() && !state.occupies(next)
            })
            .min_by_key(|d| {
                let next = head.step(*d);
                (next.x - state.food.x).abs() + (next.y - state.food.y).abs()
            })
    }

    fn draw(state: &GameState) -> String {
        let mut out = String::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let cell = Cell::new(x, y);
                let c = if cell == state.head() {
                    '@'
                } else if state.occupies(cell) {
                    'o'
                } else if cell == state.food {
                    '*'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }

    pub fn run(seed: u64) {
        let scheduler = ManualScheduler::new();
        let mut session = Session::new(MemoryStore::new(), scheduler.clone(), seed);

        while scheduler.is_armed() && session.state().time_ticks < MAX_TICKS {
            if let Some(direction) = autopilot(session.state()) {
                session.dispatch(Command::Steer(direction));
            }
            session.dispatch(Command::Tick);
        }

        println!("{}", draw(session.state()));
        println!(
            "Score {} after {} moves (length {}, interval {:?})",
            session.score(),
            session.state().time_ticks,
            session.state().snake.len(),
            session.tick_interval(),
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5eed);

    log::info!("Grid Snake (native) starting with seed {}", seed);
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");

    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
