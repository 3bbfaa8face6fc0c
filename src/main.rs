//! EQ Editor - An interactive parametric EQ curve editor
//!
//! Entry point for the application.

use eframe::egui;
use eq_editor::app::EqApp;
use eq_editor::persistence::{default_settings_path, load_or_default};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = default_settings_path();
    let settings = load_or_default(&settings_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window.width, settings.window.height])
            .with_min_inner_size([640.0, 420.0])
            .with_title("EQ Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "EQ Editor",
        options,
        Box::new(move |_cc| Ok(Box::new(EqApp::new(settings, settings_path)))),
    )
}
