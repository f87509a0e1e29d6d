use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::data::dates;
use crate::data::inspect::numeric_series;
use crate::state::AppState;

/// Rows shown in the data preview table.
const PREVIEW_ROWS: usize = 200;

// ---------------------------------------------------------------------------
// Band preview plot (central panel)
// ---------------------------------------------------------------------------

/// Plot the selected bands against the normalized dates, or against the row
/// number while no valid date column is selected.
pub fn series_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a time series to configure an analysis  (File → Open…)");
            });
            return;
        }
    };

    let roles = state.selection().roles();
    if roles.bands().is_empty() {
        ui.label("Add bands to preview them.");
        return;
    }

    let days = match &state.dates {
        Some(Ok(days)) => Some(days.as_slice()),
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Dates: {e}")).color(egui::Color32::ORANGE));
            None
        }
        None => None,
    };

    let mut plot = Plot::new("band_preview")
        .legend(Legend::default())
        .height(300.0)
        .y_axis_label("Reflectance")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    plot = if days.is_some() {
        plot.x_axis_label("Date").x_axis_formatter(|mark, _range| {
            dates::from_ordinal(mark.value as i64)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
    } else {
        plot.x_axis_label("Row")
    };

    plot.show(ui, |plot_ui| {
        for band in roles.bands() {
            let Some(column) = dataset.column(band) else {
                continue;
            };
            let points: Vec<[f64; 2]> = numeric_series(column)
                .into_iter()
                .map(|(row, y)| {
                    let x = days.map_or(row as f64, |d| d[row] as f64);
                    [x, y]
                })
                .collect();

            let color = state.band_colors.color_for(band);
            let width = if roles.display_band() == Some(band.as_str()) {
                2.5
            } else {
                1.0
            };
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name(band)
                    .color(color)
                    .width(width),
            );
            plot_ui.points(Points::new(points).name(band).color(color).radius(2.0));
        }
    });
}

// ---------------------------------------------------------------------------
// Data preview table
// ---------------------------------------------------------------------------

/// First rows of the loaded table, with the role of each column in its header.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let roles = state.selection().roles();
    let rows = dataset.len().min(PREVIEW_ROWS);

    let role_of = |name: &str| {
        if roles.date_column() == Some(name) {
            " (date)"
        } else if roles.qa_column() == Some(name) {
            " (qa)"
        } else if roles.bands().iter().any(|b| b == name) {
            " (band)"
        } else {
            ""
        }
    };

    egui::CollapsingHeader::new(format!("Data preview ({rows} of {} rows)", dataset.len()))
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .max_scroll_height(240.0)
                    .column(TableColumn::auto())
                    .columns(TableColumn::initial(100.0).at_least(40.0), dataset.columns.len())
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("#");
                        });
                        for col in &dataset.columns {
                            header.col(|ui| {
                                ui.strong(format!("{}{}", col.name, role_of(&col.name)));
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, rows, |mut row| {
                            let i = row.index();
                            row.col(|ui| {
                                ui.label(i.to_string());
                            });
                            for col in &dataset.columns {
                                row.col(|ui| {
                                    ui.label(col.values[i].to_string());
                                });
                            }
                        });
                    });
            });
        });
}
