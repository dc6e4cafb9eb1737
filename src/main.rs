mod app_router;
mod http;
mod session_core;
mod token_store;
mod yew_app;

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn main() {
    console_error_panic_hook::set_once();
    let config = app_router::load_init_config();
    gloo::console::log!("songvote start", format!("{:?}", config.page));
    yew_app::run(config);
}
