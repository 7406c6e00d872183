//! GUI entry point for platelot

mod app;
mod history_panel;
mod slot_panel;

use app::PlatelotApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_min_inner_size([900.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "License Plate Detector",
        options,
        Box::new(|cc| Ok(Box::new(PlatelotApp::new(cc)))),
    )
}
