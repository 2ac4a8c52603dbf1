use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::Config;
use crate::state::AppState;
use crate::ui::{panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BikeDashboardApp {
    pub state: AppState,
}

impl BikeDashboardApp {
    /// Build the app and load the configured dataset.
    pub fn new(config: &Config) -> Self {
        let mut state = AppState::new(config);
        state.load();
        Self { state }
    }
}

impl eframe::App for BikeDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts + preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(format!(
                "⚠ No data loaded. Place {} next to the program, then File → Reload (or File → Open…).",
                state.loader.path().display()
            ));
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(RichText::new("🚲 Bike Rental Dashboard").strong());
            });
            ui.label(RichText::new(format!("Showing {}", state.selection.describe())).strong());

            if dataset.is_synthetic() {
                let names: Vec<&str> = dataset.synthetic_columns.iter().map(|c| c.name()).collect();
                ui.label(
                    RichText::new(format!(
                        "⚠ Columns filled with random values (not in the file): {}. \
                         Charts based on them have no statistical meaning.",
                        names.join(", ")
                    ))
                    .color(Color32::from_rgb(200, 140, 0)),
                );
            }
            ui.separator();

            plot::year_chart(ui, state);
            ui.separator();
            plot::season_chart(ui, state);
            ui.separator();
            plot::weekday_chart(ui, state);
            ui.separator();
            preview::preview(ui, state);
        });
}
