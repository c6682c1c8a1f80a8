pub mod runner;

use std::cell::RefCell;

use gisei_engine::{InputEvent, MapRegistry, SimConfig};
use wasm_bindgen::prelude::*;

pub use runner::{BufferPresenter, GameRunner};

type WebRunner = GameRunner<BufferPresenter, MapRegistry>;

thread_local! {
    static RUNNER: RefCell<Option<WebRunner>> = RefCell::new(None);
}

/// Run `f` against the runner, or log and return `None` before `game_init`.
fn with_runner<R>(f: impl FnOnce(&mut WebRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("game not initialized, call game_init() first");
                None
            }
        }
    })
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Create the runner. `config_json` may be empty for the defaults.
#[wasm_bindgen]
pub fn game_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        SimConfig::default()
    } else {
        SimConfig::from_json(config_json).map_err(js_error)?
    };
    let presenter = BufferPresenter::from_config(&config);
    let runner = GameRunner::new(config, MapRegistry::new(), presenter);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("gisei: initialized");
    Ok(())
}

/// Register a Tiled JSON map under `id`.
#[wasm_bindgen]
pub fn game_add_map(id: &str, json: &str) -> Result<(), JsValue> {
    with_runner(|r| r.source_mut().insert_json(id, json))
        .ok_or_else(|| js_error("game not initialized"))?
        .map_err(js_error)
}

/// Load the first configured level.
#[wasm_bindgen]
pub fn game_start() -> Result<(), JsValue> {
    with_runner(|r| r.start())
        .ok_or_else(|| js_error("game not initialized"))?
        .map_err(js_error)
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn game_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

/// Drop every held key, e.g. when the page loses focus.
#[wasm_bindgen]
pub fn game_release_keys() {
    with_runner(|r| r.push_input(InputEvent::ReleaseAll));
}

// ---- Frame buffer accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.presenter().as_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.presenter().layout().buffer_total_floats as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.presenter().instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.presenter().event_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_instances() -> u32 {
    with_runner(|r| r.presenter().layout().max_instances as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.presenter().layout().max_events as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_instance_data_offset() -> u32 {
    with_runner(|r| r.presenter().layout().instance_data_offset as u32).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_event_data_offset() -> u32 {
    with_runner(|r| r.presenter().layout().event_data_offset as u32).unwrap_or(0)
}

/// Whether the last level has been finished.
#[wasm_bindgen]
pub fn game_is_completed() -> bool {
    with_runner(|r| r.session().is_some_and(|s| s.is_completed())).unwrap_or(false)
}
