mod app;
mod color;
mod config;
mod data;
mod signing;
mod state;
mod ui;

use app::DatasetLensApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dataset Lens – Annotated Image Preview",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can fetch local files and URLs.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DatasetLensApp::new(cc)))
        }),
    )
}
