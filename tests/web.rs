// Browser smoke test: `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn greeting_mounts_canvas_and_chrome() {
    valentine_games::start_greeting().expect("start");
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("vg-canvas").is_some());
    assert!(doc.get_element_by_id("vg-hearts").is_some());
    assert!(doc.get_element_by_id("vg-progress").is_some());
    // second start is a no-op
    valentine_games::start_greeting().expect("restart is ignored");
}

#[wasm_bindgen_test]
fn start_installs_console_logger() {
    valentine_games::wasm_start();
    assert!(log::max_level() >= log::LevelFilter::Info);
    assert!(log::logger().enabled(&log::Metadata::builder().level(log::Level::Info).build()));
    log::info!("console logger reachable");
}
