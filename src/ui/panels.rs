use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::params::{FittingCurve, Method, OutputMode};
use crate::settings::SCRIPT_FILE_NAME;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – column roles
// ---------------------------------------------------------------------------

/// A role change requested while drawing; applied after the widgets are done.
enum ColumnAction {
    SetDate(String),
    EnableQa(bool),
    SetQa(String),
    AddBand(String),
    RemoveBand(String),
    SetIndicator(String),
}

/// Render the left column panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Columns");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state after drawing.
    let available = state.selection().available().to_vec();
    let roles = state.selection().roles().clone();
    let mut actions = Vec::new();

    // ---- Date column ----
    ui.strong("Date column");
    egui::ComboBox::from_id_salt("date_column")
        .selected_text(roles.date_column().unwrap_or("select…"))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            for col in available.iter().filter(|c| !roles.bands().contains(c)) {
                if ui
                    .selectable_label(roles.date_column() == Some(col.as_str()), col)
                    .clicked()
                {
                    actions.push(ColumnAction::SetDate(col.clone()));
                }
            }
        });
    ui.add_space(4.0);

    // ---- QA column ----
    let mut qa_enabled = roles.qa_enabled();
    if ui.checkbox(&mut qa_enabled, "Use QA column").changed() {
        actions.push(ColumnAction::EnableQa(qa_enabled));
    }
    ui.add_enabled_ui(roles.qa_enabled(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("qa_column")
            .selected_text(roles.qa_column().unwrap_or("select…"))
            .width(ui.available_width() - 8.0)
            .show_ui(ui, |ui: &mut Ui| {
                for col in available.iter().filter(|c| !roles.bands().contains(c)) {
                    if ui
                        .selectable_label(roles.qa_column() == Some(col.as_str()), col)
                        .clicked()
                    {
                        actions.push(ColumnAction::SetQa(col.clone()));
                    }
                }
            });
    });
    ui.separator();

    // ---- Available columns → bands ----
    ui.strong("Available columns");
    ui.label(RichText::new("Double-click to add as band").small().weak());
    ScrollArea::vertical()
        .id_salt("available_columns")
        .max_height(220.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for col in &available {
                let taken = roles.bands().contains(col)
                    || roles.date_column() == Some(col.as_str())
                    || roles.qa_column() == Some(col.as_str());
                if taken {
                    continue;
                }
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("+").clicked() {
                        actions.push(ColumnAction::AddBand(col.clone()));
                    }
                    if ui.selectable_label(false, col).double_clicked() {
                        actions.push(ColumnAction::AddBand(col.clone()));
                    }
                });
            }
        });
    ui.separator();

    // ---- Selected bands ----
    ui.strong(format!("Bands ({})", roles.bands().len()));
    for band in roles.bands() {
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("✖").on_hover_text("Remove band").clicked() {
                actions.push(ColumnAction::RemoveBand(band.clone()));
            }
            ui.label(RichText::new(band).color(state.band_colors.color_for(band)));
        });
    }
    ui.add_space(4.0);

    ui.strong("Break indicator band");
    egui::ComboBox::from_id_salt("indicator_band")
        .selected_text(roles.break_indicator_band().unwrap_or("-"))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            for band in roles.bands() {
                if ui
                    .selectable_label(roles.break_indicator_band() == Some(band.as_str()), band)
                    .clicked()
                {
                    actions.push(ColumnAction::SetIndicator(band.clone()));
                }
            }
        });

    if actions.is_empty() {
        return;
    }
    state.edit_selection(|sel| {
        for action in actions {
            match action {
                ColumnAction::SetDate(c) => sel.set_date(&c),
                ColumnAction::EnableQa(on) => sel.set_qa_enabled(on),
                ColumnAction::SetQa(c) => sel.set_qa(&c),
                ColumnAction::AddBand(c) => sel.add_band(&c),
                ColumnAction::RemoveBand(c) => sel.remove_band(&c),
                ColumnAction::SetIndicator(c) => sel.set_break_indicator_band(&c),
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Parameter form (top of the central panel)
// ---------------------------------------------------------------------------

/// Method, numeric parameters, fitting curve, display band and output.
pub fn parameter_form(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Method");
        let mut method = state.params.method;
        for m in Method::ALL {
            ui.radio_value(&mut method, m, m.to_string());
        }
        if method != state.params.method {
            log::debug!("method -> {method}");
            state.params.set_method(method);
        }
    });

    egui::Grid::new("parameter_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("P_CG").on_hover_text("Change probability, 0 < p < 1");
            ui.text_edit_singleline(&mut state.params.p_change_prob);
            ui.end_row();

            ui.label("CONSE").on_hover_text("Consecutive anomalies to confirm a break, 1-8");
            ui.text_edit_singleline(&mut state.params.consecutive_obs);
            ui.end_row();

            ui.label("Lambda").on_hover_text("Lasso regularization strength");
            ui.text_edit_singleline(&mut state.params.lambda);
            ui.end_row();

            ui.label("Trimodal");
            ui.add_enabled_ui(state.params.trimodal_editable(), |ui: &mut Ui| {
                ui.checkbox(&mut state.params.trimodal, "Fit a trimodal seasonal term");
            });
            ui.end_row();

            ui.label("Fitting curve");
            ui.add_enabled_ui(state.params.fitting_curve_editable(), |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    let mut curve = state.params.fitting_curve;
                    for c in FittingCurve::ALL {
                        ui.radio_value(&mut curve, c, c.to_string());
                    }
                    state.params.set_fitting_curve(curve);
                });
            });
            ui.end_row();

            ui.label("Display band");
            let roles = state.selection().roles().clone();
            let mut picked = None;
            egui::ComboBox::from_id_salt("display_band")
                .selected_text(roles.display_band().unwrap_or("-"))
                .show_ui(ui, |ui: &mut Ui| {
                    for band in roles.bands() {
                        if ui
                            .selectable_label(roles.display_band() == Some(band.as_str()), band)
                            .clicked()
                        {
                            picked = Some(band.clone());
                        }
                    }
                });
            if let Some(band) = picked {
                state.edit_selection(|sel| sel.set_display_band(&band));
            }
            ui.end_row();

            ui.label("Output");
            ui.add_enabled_ui(state.params.output_mode_editable(), |ui: &mut Ui| {
                let mut output = state.params.output_mode;
                egui::ComboBox::from_id_salt("output_mode")
                    .selected_text(output.to_string())
                    .show_ui(ui, |ui: &mut Ui| {
                        for o in OutputMode::ALL {
                            ui.selectable_value(&mut output, o, o.to_string());
                        }
                    });
                if output != state.params.output_mode {
                    state.params.set_output_mode(output);
                }
            });
            ui.end_row();
        });

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("View Script").clicked() && state.submit() {
            state.show_script = true;
        }
        if ui.button("Save Script…").clicked() {
            save_file_dialog(state);
        }
        let idle = state.running.is_none();
        if ui.add_enabled(idle, egui::Button::new("Run")).clicked() {
            state.run();
        }
    });

    for warning in &state.warnings {
        ui.label(RichText::new(format!("⚠ {warning}")).color(Color32::ORANGE));
    }
}

// ---------------------------------------------------------------------------
// Script window
// ---------------------------------------------------------------------------

pub fn script_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(script) = &state.script else {
        return;
    };
    egui::Window::new("Generated script")
        .open(&mut state.show_script)
        .default_size([760.0, 560.0])
        .resizable(true)
        .show(ctx, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(format!("{:?}", script.variant));
                if ui.small_button("Copy").clicked() {
                    ui.ctx().copy_text(script.text.clone());
                }
            });
            ui.separator();
            ScrollArea::both().auto_shrink([false, false]).show(ui, |ui: &mut Ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut script.text.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save Script…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows, {} columns from {}",
                ds.len(),
                ds.columns.len(),
                ds.source_display()
            ));
            ui.separator();
        }

        match &state.status {
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            Some(Status::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open time series")
        .add_filter("Supported files", &["csv", "xlsx", "xlsm", "xls", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save analysis script")
        .add_filter("Python", &["py"])
        .set_file_name(SCRIPT_FILE_NAME)
        .save_file();

    if let Some(path) = file {
        state.save(&path);
    }
}
