mod app;
mod color;
mod config;
mod data;
mod pipeline;
mod runner;
mod script;
mod settings;
mod state;
mod ui;

use app::LauncherApp;
use eframe::egui;
use settings::Settings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::from_env();
    log::info!(
        "using interpreter '{}', scripts in {}",
        settings.python,
        settings.script_dir.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "xCCD Launcher – COLD / S-CCD",
        options,
        Box::new(|_cc| Ok(Box::new(LauncherApp::new(settings)))),
    )
}
