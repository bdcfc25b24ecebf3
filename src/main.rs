//! Asteroid Dodge entry point
//!
//! On the web this wires the game to the page and starts the frame loop.
//! Natively it flies a headless autopilot demo and reports the run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use asteroid_dodge::highscores::format_survival;
    use asteroid_dodge::platform::{FrameHandle, normalize_key};
    use asteroid_dodge::platform::web::{FrameCallback, WebHost};
    use asteroid_dodge::sim::GamePhase;
    use asteroid_dodge::{Game, HighScores, Settings};

    type SharedGame = Rc<RefCell<Game<WebHost>>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Asteroid Dodge starting...");

        let settings = Settings::load();
        let Some(host) = WebHost::new("canvas") else {
            log::error!("No browser window available");
            return;
        };
        let frame_slot = host.frame_slot();
        let held = host.held_keys();
        let high_scores = Rc::new(RefCell::new(HighScores::load()));
        let game: SharedGame = Rc::new(RefCell::new(Game::new(host, settings)));

        // Frame callback: tick, draw, and record the run when it ends
        {
            let weak = Rc::downgrade(&game);
            let high_scores = high_scores.clone();
            let callback: FrameCallback = Rc::new(move |handle: FrameHandle| {
                let Some(game) = weak.upgrade() else {
                    return;
                };
                let mut g = game.borrow_mut();
                g.frame(handle);
                if let Some(state) = g.state() {
                    g.host().render(state);
                }
                if let Some(run) = g.take_finished_run() {
                    let show = g.settings().show_high_scores;
                    drop(g);
                    finish_run(&high_scores, run, show);
                }
            });
            *frame_slot.borrow_mut() = Some(callback);
        }

        setup_keyboard(game.clone(), held);
        setup_restart_button(game.clone());

        game.borrow_mut().init();
    }

    /// Record a finished run and fill in the game-over panel
    fn finish_run(
        high_scores: &Rc<RefCell<HighScores>>,
        run: asteroid_dodge::sim::RunSummary,
        show_board: bool,
    ) {
        let mut scores = high_scores.borrow_mut();
        let rank = scores.record(&run, js_sys::Date::now());
        if rank.is_some() {
            scores.save();
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&run.score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("final-time") {
            el.set_text_content(Some(&format_survival(run.survived_ms)));
        }
        if let Some(el) = document.get_element_by_id("final-rank") {
            let text = match rank {
                _ if !show_board => String::new(),
                Some(r) => format!("New high score! Rank #{}", r),
                None => scores
                    .top_score()
                    .map(|best| format!("Best: {}", best))
                    .unwrap_or_default(),
            };
            el.set_text_content(Some(&text));
        }
    }

    fn setup_keyboard(game: SharedGame, held: Rc<RefCell<HashSet<String>>>) {
        let window = web_sys::window().unwrap();

        {
            let held = held.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = normalize_key(&event.key());
                let mut g = game.borrow_mut();
                if g.settings().keys.is_bound(&key) {
                    event.prevent_default();
                }
                match key.as_str() {
                    "Enter" | "r" if g.phase() == Some(GamePhase::GameOver) => {
                        g.restart();
                    }
                    "p" => {
                        let enabled = !g.settings().autopilot;
                        g.set_autopilot(enabled);
                    }
                    _ => {}
                }
                held.borrow_mut().insert(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let held = held.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                held.borrow_mut().remove(&normalize_key(&event.key()));
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while the page is unfocused never send keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                held.borrow_mut().clear();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: SharedGame) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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
    log::info!("Asteroid Dodge (native) starting...");
    log::info!("Native mode flies a headless autopilot demo - run with `trunk serve` to play");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use asteroid_dodge::highscores::format_survival;
    use asteroid_dodge::platform::{Clock, HeadlessHost};
    use asteroid_dodge::{Game, HighScores, Settings};

    /// Simulated display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Demo stops after five simulated minutes
    const MAX_FRAMES: u32 = 5 * 60 * 60;
    const DEMO_SEED: u64 = 0x00A5_7E20;

    pub fn run() {
        let mut settings = Settings::load();
        settings.autopilot = true;
        settings.seed.get_or_insert(DEMO_SEED);

        let mut game = Game::new(HeadlessHost::new(), settings);
        game.init();

        let mut frames = 0;
        while frames < MAX_FRAMES {
            game.host_mut().advance(FRAME_MS);
            let Some(handle) = game.host_mut().fire_frame() else {
                break;
            };
            game.frame(handle);
            frames += 1;
        }

        let mut high_scores = HighScores::load();
        match game.take_finished_run() {
            Some(run) => {
                let rank = high_scores.record(&run, game.host().now_ms());
                high_scores.save();
                println!(
                    "Ship destroyed after {} ({} points, {} asteroids dodged, rank {:?})",
                    format_survival(run.survived_ms),
                    run.score,
                    run.obstacles_dodged,
                    rank
                );
            }
            None => {
                let score = game.state().map(|s| s.score).unwrap_or_default();
                println!("Autopilot survived the full demo: {} points", score);
            }
        }

        game.teardown();
    }
}
