mod app;
mod geolocation;
mod leaflet;
mod map;

use wasm_bindgen::JsValue;

fn init_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        web_sys::console::error_1(&JsValue::from_str(&info.to_string()));
    }));
}

fn main() {
    init_panic_hook();
    tracing_wasm::set_as_global_default();
    leptos::mount_to_body(app::App);
}
