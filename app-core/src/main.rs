const APP_NAME: &str = "History Map";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use app_core::{AppConfig, HistoryMapApp};

    env_logger::init();

    let config = AppConfig::load_or_default();
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            Ok::<Box<dyn eframe::App>, _>(Box::new(HistoryMapApp::new(cc, &config)))
        }),
    )
}

// The web build starts from `app-web`.
#[cfg(target_arch = "wasm32")]
fn main() {
    log::info!("{APP_NAME} runs natively only, use app-web in the browser");
}
