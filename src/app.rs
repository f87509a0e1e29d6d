use eframe::egui;

use crate::settings::Settings;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LauncherApp {
    pub state: AppState,
}

impl LauncherApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }
}

impl eframe::App for LauncherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_run();
        if self.state.running.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(500));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: column roles ----
        egui::SidePanel::left("column_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: parameters, preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.state.dataset.is_some() {
                        panels::parameter_form(ui, &mut self.state);
                        ui.separator();
                    }
                    plot::series_plot(ui, &self.state);
                    ui.add_space(6.0);
                    plot::data_table(ui, &self.state);
                });
        });

        panels::script_window(ctx, &mut self.state);
    }
}
