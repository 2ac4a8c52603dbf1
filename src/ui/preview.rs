use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::CellValue;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data preview + dataset info
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;

/// First rows of the filtered data next to row/column counts and the column
/// listing.
pub fn preview(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let table = &dataset.table;

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].heading("🧾 Data preview");
        let rows: Vec<&Vec<CellValue>> = state
            .visible_indices
            .iter()
            .take(state.preview_rows)
            .filter_map(|&i| table.rows.get(i))
            .collect();

        ScrollArea::horizontal()
            .id_salt("preview_scroll")
            .show(&mut cols[0], |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .columns(Column::auto().at_least(60.0), table.column_count())
                    .header(ROW_HEIGHT + 2.0, |mut header| {
                        for name in &table.columns {
                            header.col(|ui: &mut Ui| {
                                ui.strong(name.as_str());
                            });
                        }
                    })
                    .body(|mut body| {
                        for row in &rows {
                            body.row(ROW_HEIGHT, |mut table_row| {
                                for cell in row.iter() {
                                    table_row.col(|ui: &mut Ui| {
                                        match cell {
                                            CellValue::Null => {
                                                ui.label(RichText::new("null").weak());
                                            }
                                            other => {
                                                ui.label(other.to_string());
                                            }
                                        }
                                    });
                                }
                            });
                        }
                    });
            });

        cols[1].heading("📋 Dataset info");
        cols[1].label(format!("Rows: {}", state.visible_indices.len()));
        cols[1].label(format!("Columns: {}", table.column_count()));
        cols[1].label("Column names:");
        cols[1].code(table.columns.join(", "));
    });
}
