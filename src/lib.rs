//! Valentine greeting core crate.
//!
//! Three canvas mini-games (aim-and-throw, pop-the-head, letter puzzle) that
//! must be won in order to reach a reveal screen. The games, router and
//! particle systems are plain Rust driven by timestamps and pointer
//! positions; `app` is the thin browser shell around them.

use wasm_bindgen::prelude::*;

pub mod app;
pub mod audio;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod games;
pub mod geom;
pub mod particles;
pub mod render;
pub mod rng;
pub mod router;
pub mod ui;

pub use config::GreetingConfig;
pub use error::{GameError, Result};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    // only fails if a logger is already installed
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(level);
    #[cfg(not(target_arch = "wasm32"))]
    log::set_max_level(level.to_level_filter());
}

/// Start the greeting with the built-in configuration.
#[wasm_bindgen]
pub fn start_greeting() -> std::result::Result<(), JsValue> {
    app::start(GreetingConfig::default()).map_err(JsValue::from)
}

/// Start the greeting with a JSON configuration; missing fields keep their
/// defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_greeting_with_config(json: &str) -> std::result::Result<(), JsValue> {
    let config = GreetingConfig::from_json(json).inspect_err(|e| log::error!("{e}"))?;
    app::start(config).map_err(JsValue::from)
}
