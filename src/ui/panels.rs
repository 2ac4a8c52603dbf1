use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A value toggled in one of the filter groups this frame.
enum Toggle {
    Year(i64),
    Season(String),
    Weather(String),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut toggled: Vec<Toggle> = Vec::new();
    let mut select_all: Option<Dimension> = None;
    let mut select_none: Option<Dimension> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let n_selected = state.selection.selected_count(dim);
                let n_total = match dim {
                    Dimension::Year => dataset.years.len(),
                    Dimension::Season => dataset.seasons.len(),
                    Dimension::Weather => dataset.weathers.len(),
                };
                let header_text = format!("{}  ({n_selected}/{n_total})", dim.title());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.title())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                select_all = Some(dim);
                            }
                            if ui.small_button("None").clicked() {
                                select_none = Some(dim);
                            }
                        });

                        match dim {
                            Dimension::Year => {
                                for &year in &dataset.years {
                                    let text = RichText::new(year.to_string())
                                        .color(state.year_colors.color_for(year));
                                    let mut checked = state.selection.years.contains(&year);
                                    if ui.checkbox(&mut checked, text).changed() {
                                        toggled.push(Toggle::Year(year));
                                    }
                                }
                            }
                            Dimension::Season => {
                                for season in &dataset.seasons {
                                    let mut checked = state.selection.seasons.contains(season);
                                    if ui.checkbox(&mut checked, season.as_str()).changed() {
                                        toggled.push(Toggle::Season(season.clone()));
                                    }
                                }
                            }
                            Dimension::Weather => {
                                for weather in &dataset.weathers {
                                    let mut checked = state.selection.weathers.contains(weather);
                                    if ui.checkbox(&mut checked, weather.as_str()).changed() {
                                        toggled.push(Toggle::Weather(weather.clone()));
                                    }
                                }
                            }
                        }
                    });
            }

            if dataset.is_synthetic() {
                ui.separator();
                ui.label(
                    RichText::new("Some columns are synthetic; see the notice above the charts.")
                        .small()
                        .color(Color32::from_rgb(200, 140, 0)),
                );
            }
        });

    // Applied once the widgets have released their borrows of `state`.
    if let Some(dim) = select_all {
        state.select_all(dim);
    }
    if let Some(dim) = select_none {
        state.select_none(dim);
    }
    for t in toggled {
        match t {
            Toggle::Year(y) => state.toggle_year(y),
            Toggle::Season(s) => state.toggle_season(&s),
            Toggle::Weather(w) => state.toggle_weather(&w),
        }
    }
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.loader.path().display().to_string());
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open rental data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_path(path);
    }
}
