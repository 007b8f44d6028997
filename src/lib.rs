//! Neon Spinner core crate.
//!
//! A trivia wheel: spin to land on a numbered segment that has not been
//! answered yet, read its riddle, and grade yourself. Correct answers retire
//! the segment; the game is complete once every segment is gone.
//!
//! The session logic in [`wheel::SpinController`] is plain Rust and runs on
//! the host; the wasm exports below wire it to a canvas in the browser.

use wasm_bindgen::prelude::*;

pub mod error;
pub mod riddles;
pub mod wheel;

pub use error::RiddleTableError;
pub use riddles::{Riddle, RiddleTable};
pub use wheel::{Outcome, Phase, PhaseKind, Snapshot, SpinController};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Starts the wheel with the built-in riddles.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    wheel::start_wheel(RiddleTable::builtin().clone())
}

/// Starts the wheel with riddles from a JSON array of `{id, q, a}` records.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_riddles(json: &str) -> Result<(), JsValue> {
    let table = RiddleTable::from_json(json).map_err(|e| {
        log::error!("could not load riddles: {}", e);
        JsValue::from_str(&e.to_string())
    })?;
    wheel::start_wheel(table)
}

// -----------------------------------------------------------------------------
// Commands from the host page (same as the in-page buttons)
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn spin() {
    wheel::dispatch(wheel::Action::Spin);
}

#[wasm_bindgen]
pub fn resolve(correct: bool) {
    let outcome = if correct {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    };
    wheel::dispatch(wheel::Action::Answer(outcome));
}

#[wasm_bindgen]
pub fn reset() {
    wheel::dispatch(wheel::Action::Reset);
}

/// Current session state as JSON, or `null` before `start_game`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn snapshot_json() -> Result<String, JsValue> {
    serde_json::to_string(&wheel::snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
}
