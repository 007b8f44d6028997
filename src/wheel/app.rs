//! Browser shell: canvas + overlays, input listeners and the frame loop.
//!
//! All state lives in one thread-local slot. Input handlers and the
//! requestAnimationFrame callback borrow it in turn, so the controller is only
//! ever touched from the browser's main thread.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, window};

use super::card::QuestionCard;
use super::geometry::{SegmentGeometry, WheelLayout, wheel_geometry};
use super::render::{self, HUB_RADIUS};
use super::{Outcome, Snapshot, SpinController};
use crate::riddles::RiddleTable;

const CANVAS_ID: &str = "ns-wheel-canvas";
const CANVAS_SIZE: u32 = 360;

/// A command from the page: a click, a key, or a call from JS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Spin,
    Answer(Outcome),
    Peek,
    Reset,
}

impl Action {
    fn from_attr(value: &str) -> Option<Self> {
        match value {
            "spin" => Some(Action::Spin),
            "correct" => Some(Action::Answer(Outcome::Correct)),
            "incorrect" => Some(Action::Answer(Outcome::Incorrect)),
            "peek" => Some(Action::Peek),
            "reset" => Some(Action::Reset),
            _ => None,
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Enter" => Some(Action::Spin),
            "c" | "C" => Some(Action::Answer(Outcome::Correct)),
            "x" | "X" => Some(Action::Answer(Outcome::Incorrect)),
            "p" | "P" => Some(Action::Peek),
            "r" | "R" => Some(Action::Reset),
            _ => None,
        }
    }

    /// Keyboard shortcut for `key`. Space and Enter belong to a focused button
    /// (`on_control`) rather than the wheel.
    fn from_key_on(key: &str, on_control: bool) -> Option<Self> {
        match Self::from_key(key)? {
            Action::Spin if on_control => None,
            action => Some(action),
        }
    }
}

struct Overlays {
    card: Element,
    banner: Element,
    grid: Element,
}

struct WheelState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    overlays: Overlays,
    layout: WheelLayout,
    geometry: Vec<SegmentGeometry>,
    riddles: RiddleTable,
    controller: SpinController,
    card: QuestionCard,
    rng: SmallRng,
    // Overlays are rebuilt only after a state change.
    overlays_dirty: bool,
}

impl WheelState {
    fn apply(&mut self, action: Action, now: f64) {
        let changed = match action {
            Action::Spin => self.controller.spin(&mut self.rng, now).is_some(),
            Action::Answer(outcome) => self.controller.resolve(outcome),
            Action::Peek => {
                let before = self.card.revealed();
                self.card.peek();
                before != self.card.revealed()
            }
            Action::Reset => {
                self.controller.reset();
                true
            }
        };
        if changed {
            // The card follows the active segment, so any resolve or reset hides it.
            self.card.present(self.controller.active());
            self.overlays_dirty = true;
        }
    }

    fn tick(&mut self, now: f64) {
        if let Some(id) = self.controller.tick(now) {
            self.card.present(Some(id));
            self.overlays_dirty = true;
        }
    }

    fn render(&mut self, now: f64) {
        let snapshot = self.controller.snapshot();
        let rotation = self.controller.displayed_rotation(now);
        if let Err(err) = render::draw_wheel(
            &self.ctx,
            &self.layout,
            &self.geometry,
            &snapshot,
            rotation,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        ) {
            log::warn!("wheel draw failed: {:?}", err);
        }
        if self.overlays_dirty {
            self.refresh_overlays(&snapshot);
            self.overlays_dirty = false;
        }
    }

    fn refresh_overlays(&self, snapshot: &Snapshot) {
        let card = render::card_html(snapshot, &self.card, &self.riddles);
        render::set_overlay(&self.overlays.card, &card);
        render::set_overlay(&self.overlays.banner, &render::banner_html(snapshot));
        render::set_overlay(&self.overlays.grid, &render::grid_html(snapshot));
    }

    fn hits_hub(&self, x: f64, y: f64) -> bool {
        let dx = x - self.layout.center_x;
        let dy = y - self.layout.center_y;
        (dx * dx + dy * dy).sqrt() <= HUB_RADIUS
    }
}

thread_local! {
    static WHEEL_STATE: std::cell::RefCell<Option<WheelState>> = const { std::cell::RefCell::new(None) };
    // Listeners and the frame loop are installed once per page.
    static LISTENERS_INSTALLED: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// True only for the first caller on this thread; later starts reuse the
/// listeners and frame loop already in place.
fn claim_listener_install() -> bool {
    !LISTENERS_INSTALLED.with(|flag| flag.replace(true))
}

/// Runs `action` against the live session, if one has been started.
pub(crate) fn dispatch(action: Action) {
    let now = performance_now();
    WHEEL_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            state.apply(action, now);
        }
    });
}

/// Snapshot of the live session, if one has been started.
#[cfg(feature = "serde_json")]
pub(crate) fn snapshot() -> Option<Snapshot> {
    WHEEL_STATE.with(|cell| cell.borrow().as_ref().map(|s| s.controller.snapshot()))
}

fn ensure_div(doc: &Document, parent: &Element, id: &str, style: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let div = doc.create_element("div")?;
    div.set_id(id);
    div.set_attribute("style", style)?;
    parent.append_child(&div)?;
    Ok(div)
}

/// Builds the page, validates `riddles` against the wheel and starts the loop.
///
/// Calling it again swaps in a fresh session on the existing canvas.
pub fn start_wheel(riddles: RiddleTable) -> Result<(), JsValue> {
    let segments = riddles.segment_count();
    if let Err(err) = riddles.validate(segments) {
        log::error!("riddle table rejected: {}", err);
        return Err(JsValue::from_str(&err.to_string()));
    }

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let root = ensure_div(
        &doc,
        &body,
        "ns-root",
        "display:flex; flex-direction:column; align-items:center; gap:24px; padding:24px 16px; max-width:28rem; margin:0 auto; font-family:Rajdhani, sans-serif;",
    )?;

    // Create / reuse the wheel canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_width(CANVAS_SIZE);
        c.set_height(CANVAS_SIZE);
        c.set_attribute("style", "cursor:pointer;")?;
        root.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let overlays = Overlays {
        card: ensure_div(&doc, &root, "ns-card", "width:100%;")?,
        banner: ensure_div(&doc, &root, "ns-banner", "width:100%;")?,
        grid: ensure_div(&doc, &root, "ns-grid", "width:100%;")?,
    };

    let layout = WheelLayout {
        center_x: CANVAS_SIZE as f64 / 2.0,
        center_y: CANVAS_SIZE as f64 / 2.0 + 10.0,
        ..WheelLayout::default()
    };
    let state = WheelState {
        canvas: canvas.clone(),
        ctx,
        overlays,
        geometry: wheel_geometry(segments, &layout),
        layout,
        riddles,
        controller: SpinController::new(segments),
        card: QuestionCard::default(),
        rng: SmallRng::from_entropy(),
        overlays_dirty: true,
    };
    WHEEL_STATE.with(|cell| cell.replace(Some(state)));
    log::info!("wheel started with {} segments", segments);

    if !claim_listener_install() {
        return Ok(());
    }

    // Hub click spins
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (x, y) = (evt.offset_x() as f64, evt.offset_y() as f64);
            let on_hub = WHEEL_STATE.with(|cell| {
                cell.borrow()
                    .as_ref()
                    .map(|s| s.hits_hub(x, y))
                    .unwrap_or(false)
            });
            if on_hub {
                dispatch(Action::Spin);
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Card / banner buttons carry a data-action attribute
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let action = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten())
                .and_then(|el| el.get_attribute("data-action"))
                .and_then(|value| Action::from_attr(&value));
            if let Some(action) = action {
                dispatch(action);
            }
        }) as Box<dyn FnMut(_)>);
        root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyboard shortcuts
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let on_control = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("button, [data-action]").ok().flatten())
                .is_some();
            if let Some(action) = Action::from_key_on(&evt.key(), on_control) {
                if action == Action::Spin {
                    // keep Space from scrolling the page
                    evt.prevent_default();
                }
                dispatch(action);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_wheel_loop();
    Ok(())
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_wheel_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        WHEEL_STATE.with(|state_cell| {
            if let Some(state) = state_cell.borrow_mut().as_mut() {
                state.tick(ts);
                state.render(ts);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_actions() {
        assert_eq!(Action::from_key(" "), Some(Action::Spin));
        assert_eq!(Action::from_key("C"), Some(Action::Answer(Outcome::Correct)));
        assert_eq!(Action::from_key("x"), Some(Action::Answer(Outcome::Incorrect)));
        assert_eq!(Action::from_key("q"), None);
    }

    #[test]
    fn test_enter_and_space_leave_focused_buttons_alone() {
        assert_eq!(Action::from_key_on("Enter", true), None);
        assert_eq!(Action::from_key_on(" ", true), None);
        assert_eq!(Action::from_key_on("Enter", false), Some(Action::Spin));
        assert_eq!(Action::from_key_on("c", true), Some(Action::Answer(Outcome::Correct)));
        assert_eq!(Action::from_key_on("r", true), Some(Action::Reset));
    }

    #[test]
    fn test_listeners_are_installed_once() {
        assert!(claim_listener_install());
        assert!(!claim_listener_install());
        assert!(!claim_listener_install());
    }

    #[test]
    fn test_data_actions_parse() {
        assert_eq!(Action::from_attr("peek"), Some(Action::Peek));
        assert_eq!(Action::from_attr("reset"), Some(Action::Reset));
        assert_eq!(Action::from_attr("incorrect"), Some(Action::Answer(Outcome::Incorrect)));
        assert_eq!(Action::from_attr("bogus"), None);
    }
}
