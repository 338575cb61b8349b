#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use eframe_whiteboard::{WhiteboardApp, WhiteboardConfig};

// When compiling natively:
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // An explicit config file wins over the settings saved by the last run
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match WhiteboardConfig::load(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                log::warn!("Ignoring config {}: {}", path.display(), err);
                None
            }
        },
        None => None,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Whiteboard",
        native_options,
        Box::new(|cc| Ok(Box::new(WhiteboardApp::new(cc, config)))),
    )
}
