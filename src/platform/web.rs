//! Browser host: requestAnimationFrame, keyboard map, DOM HUD and a flat
//! 2D canvas view of the field

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashSet};
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, Storage, Window};

use super::{Clock, FrameHandle, FrameScheduler, Hud, InputSource, SceneSink, normalize_key};
use crate::consts::{PLAYER_BOUND, PLAYER_HALF_EXTENTS, SPAWN_HEIGHT};
use crate::sim::{EntityId, SimulationState};

/// Callback invoked when a requested frame fires
pub type FrameCallback = Rc<dyn Fn(FrameHandle)>;

type FrameClosure = Closure<dyn FnMut(f64)>;

/// Browser LocalStorage, if the page may use it
pub fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Visible world window (x and y extents)
const VIEW_HALF_WIDTH: f32 = PLAYER_BOUND + 2.0;
const VIEW_TOP: f32 = SPAWN_HEIGHT + 1.0;
const VIEW_BOTTOM: f32 = -10.0;

pub struct WebHost {
    window: Window,
    held: Rc<RefCell<HashSet<String>>>,
    on_frame: Rc<RefCell<Option<FrameCallback>>>,
    /// Closure behind the outstanding animation frame
    queued_frame: Option<(FrameHandle, FrameClosure)>,
    /// Closure of the frame that fired last. It may still be on the stack
    /// (the game requests the next frame from inside it), so it is only
    /// dropped at the following request.
    fired_frame: Option<FrameClosure>,
    canvas: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
    score_el: Option<Element>,
    game_over_el: Option<Element>,
    player: Option<EntityId>,
    obstacles: BTreeSet<EntityId>,
}

impl WebHost {
    /// Bind to the page. Returns None outside a browser window.
    pub fn new(canvas_id: &str) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let canvas = canvas_context(&document, canvas_id);
        if canvas.is_none() {
            log::warn!("No 2D canvas #{}; running without a view", canvas_id);
        }

        Some(Self {
            score_el: document.query_selector("#hud-score .hud-value").ok().flatten(),
            game_over_el: document.get_element_by_id("game-over"),
            window,
            held: Rc::new(RefCell::new(HashSet::new())),
            on_frame: Rc::new(RefCell::new(None)),
            queued_frame: None,
            fired_frame: None,
            canvas,
            player: None,
            obstacles: BTreeSet::new(),
        })
    }

    /// Shared held-key set, written by the page's keyboard listeners
    pub fn held_keys(&self) -> Rc<RefCell<HashSet<String>>> {
        self.held.clone()
    }

    /// Slot for the frame callback (installed once the game exists)
    pub fn frame_slot(&self) -> Rc<RefCell<Option<FrameCallback>>> {
        self.on_frame.clone()
    }

    /// Draw the entities currently in the scene
    pub fn render(&self, state: &SimulationState) {
        let Some((canvas, ctx)) = &self.canvas else {
            return;
        };
        let (w, h) = (canvas.width() as f64, canvas.height() as f64);
        let to_screen = |x: f32, y: f32| {
            let sx = (x + VIEW_HALF_WIDTH) / (2.0 * VIEW_HALF_WIDTH);
            let sy = (VIEW_TOP - y) / (VIEW_TOP - VIEW_BOTTOM);
            (sx as f64 * w, sy as f64 * h)
        };
        let scale = w / (2.0 * VIEW_HALF_WIDTH as f64);

        ctx.set_fill_style_str("#05060f");
        ctx.fill_rect(0.0, 0.0, w, h);

        for rock in state
            .obstacles
            .iter()
            .filter(|o| self.obstacles.contains(&o.id))
        {
            let (x, y) = to_screen(rock.pos.x, rock.pos.y);
            ctx.set_fill_style_str(&rock.color.to_css());
            ctx.begin_path();
            let _ = ctx.arc(x, y, rock.size as f64 * scale, 0.0, TAU);
            ctx.fill();
        }

        if self.player == Some(state.player.id) {
            let ship = &state.player;
            let (x, y) = to_screen(ship.pos.x, ship.pos.y);
            let half_w = PLAYER_HALF_EXTENTS.x as f64 * scale;
            let half_h = PLAYER_HALF_EXTENTS.y as f64 * scale;
            let _ = ctx.save();
            let _ = ctx.translate(x, y);
            let _ = ctx.rotate(-ship.tilt() as f64);
            ctx.set_fill_style_str("#7fd8ff");
            ctx.fill_rect(-half_w, -half_h, half_w * 2.0, half_h * 2.0);
            ctx.restore();
        }
    }
}

fn canvas_context(
    document: &Document,
    canvas_id: &str,
) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas = document
        .get_element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, ctx))
}

impl Clock for WebHost {
    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

impl FrameScheduler for WebHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.fired_frame = self.queued_frame.take().map(|(_, closure)| closure);

        let slot = self.on_frame.clone();
        let raw_id = Rc::new(Cell::new(0));
        let closure = {
            let raw_id = raw_id.clone();
            Closure::<dyn FnMut(f64)>::once(move |_time: f64| {
                let callback = slot.borrow().clone();
                if let Some(callback) = callback {
                    callback(FrameHandle(raw_id.get()));
                }
            })
        };

        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => {
                raw_id.set(id);
                let handle = FrameHandle(id);
                self.queued_frame = Some((handle, closure));
                Some(handle)
            }
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
        if self.queued_frame.as_ref().is_some_and(|(h, _)| *h == handle) {
            self.queued_frame = None;
        }
    }
}

impl InputSource for WebHost {
    fn is_held(&self, key: &str) -> bool {
        self.held.borrow().contains(&normalize_key(key))
    }
}

impl SceneSink for WebHost {
    fn player_placed(&mut self, id: EntityId, _state: &SimulationState) {
        self.player = Some(id);
    }

    fn obstacle_added(&mut self, id: EntityId, state: &SimulationState) {
        if let Some(rock) = state.obstacles.iter().find(|o| o.id == id) {
            log::debug!("Asteroid {} enters at x={:.2}", id, rock.pos.x);
        }
        self.obstacles.insert(id);
    }

    fn obstacle_removed(&mut self, id: EntityId) {
        self.obstacles.remove(&id);
    }

    fn player_removed(&mut self, id: EntityId) {
        if self.player == Some(id) {
            self.player = None;
        }
    }
}

impl Hud for WebHost {
    fn set_score(&mut self, score: u64) {
        if let Some(el) = &self.score_el {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn set_game_over(&mut self, visible: bool) {
        if let Some(el) = &self.game_over_el {
            let _ = el.set_attribute("class", if visible { "overlay" } else { "hidden" });
        }
    }
}
