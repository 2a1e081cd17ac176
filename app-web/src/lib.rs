#![cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use app_core::{AppConfig, HistoryMapApp};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = eframe::WebLogger::init(log::LevelFilter::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger not installed: {err}")));
    }

    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = run().await {
            log::error!("failed to start: {err:?}");
        }
    });
    Ok(())
}

#[wasm_bindgen]
pub async fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id("the_canvas_id")
        .ok_or_else(|| JsValue::from_str("canvas with id 'the_canvas_id' not found"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("failed to cast to HtmlCanvasElement"))?;

    let config = AppConfig::load_or_default();
    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(move |cc| {
                Ok::<Box<dyn eframe::App>, _>(Box::new(HistoryMapApp::new(cc, &config)))
            }),
        )
        .await?;
    Ok(())
}
