#![windows_subsystem = "windows"]

mod clicker;
mod gui;
mod hotkeys;
mod simulator;

use eframe::egui;
use gui::AutoClickerApp;

fn main() -> Result<(), eframe::Error> {
    setup_tracing();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([300.0, 250.0])
            .with_resizable(false)
            .with_decorations(true),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Autoclicker",
        options,
        Box::new(|_cc| Box::new(AutoClickerApp::new())),
    )
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
