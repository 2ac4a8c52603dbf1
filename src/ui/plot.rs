use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotUi, Text,
};

use crate::color::YearColors;
use crate::data::aggregate::season_key;
use crate::report::format_thousands;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;
/// Share of a category slot covered by its bars.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// One bar of a chart: category slot on x, yearly total on y.
struct YearBar {
    category: usize,
    year: i64,
    total: u64,
    label: String,
}

fn category_plot<'a>(id: &str, x_label: &str, categories: Vec<String>) -> Plot<'a> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label.to_string())
        .y_axis_label("Rentals")
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let v = mark.value;
            if v < 0.0 || (v - v.round()).abs() > 1e-6 {
                return String::new();
            }
            categories.get(v.round() as usize).cloned().unwrap_or_default()
        })
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            if mark.value < 0.0 {
                String::new()
            } else {
                format_thousands(mark.value as u64)
            }
        })
        .include_y(0.0)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
}

/// Draw bars grouped by category, one colour and legend entry per year.
fn draw_year_bars(plot_ui: &mut PlotUi, bars: &[YearBar], colors: &YearColors) {
    let years: Vec<i64> = bars
        .iter()
        .map(|b| b.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let slot = GROUP_WIDTH / years.len().max(1) as f64;

    for (slot_idx, &year) in years.iter().enumerate() {
        let offset = (slot_idx as f64 - (years.len() as f64 - 1.0) / 2.0) * slot;
        let mut chart_bars = Vec::new();
        for b in bars.iter().filter(|b| b.year == year) {
            let x = b.category as f64 + offset;
            let y = b.total as f64;
            chart_bars.push(Bar::new(x, y).width(slot * 0.95).name(&b.label));
            plot_ui.text(
                Text::new(PlotPoint::new(x, y), RichText::new(&b.label).strong())
                    .anchor(Align2::CENTER_BOTTOM),
            );
        }
        plot_ui.bar_chart(
            BarChart::new(chart_bars)
                .name(year.to_string())
                .color(colors.color_for(year)),
        );
    }
}

fn no_data(ui: &mut Ui) {
    ui.label(RichText::new("No data for the current selection.").italics());
}

// ---------------------------------------------------------------------------
// Chart 1: rentals per year
// ---------------------------------------------------------------------------

pub fn year_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("📈 1. Rentals per year");
    let rows = &state.aggregates.by_year;
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    let categories: Vec<String> = rows.iter().map(|r| r.year.to_string()).collect();
    let bars: Vec<YearBar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| YearBar {
            category: i,
            year: r.year,
            total: r.total,
            label: format_thousands(r.total),
        })
        .collect();

    category_plot("year_chart", "Year", categories).show(ui, |plot_ui| {
        // One category per year, so every group holds a single centred bar.
        for bar in &bars {
            draw_year_bars(plot_ui, std::slice::from_ref(bar), &state.year_colors);
        }
    });
}

// ---------------------------------------------------------------------------
// Chart 2: rentals per season and year, with intensity bucket
// ---------------------------------------------------------------------------

pub fn season_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("🌤 2. Rentals per season and year");
    let rows = &state.aggregates.by_year_season;
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    // Rows arrive ordered by year then season; collect seasons in calendar order.
    let mut seasons: Vec<&str> = rows.iter().map(|r| r.season_group.as_str()).collect();
    seasons.sort_by_key(|s| season_key(s));
    seasons.dedup();

    let bars: Vec<YearBar> = rows
        .iter()
        .map(|r| YearBar {
            category: seasons
                .iter()
                .position(|s| *s == r.season_group)
                .unwrap_or_default(),
            year: r.year,
            total: r.total,
            label: format!("{}\n{}", r.total, r.bucket),
        })
        .collect();
    let categories = seasons.iter().map(|s| s.to_string()).collect();

    category_plot("season_chart", "Season", categories).show(ui, |plot_ui| {
        draw_year_bars(plot_ui, &bars, &state.year_colors);
    });
}

// ---------------------------------------------------------------------------
// Chart 3: rentals per weekday and year
// ---------------------------------------------------------------------------

pub fn weekday_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("📅 3. Rentals per weekday and year");
    let rows = &state.aggregates.by_weekday_year;
    if rows.is_empty() {
        no_data(ui);
        return;
    }

    // Already in weekday order.
    let mut weekdays: Vec<&str> = rows.iter().map(|r| r.weekday.as_str()).collect();
    weekdays.dedup();

    let bars: Vec<YearBar> = rows
        .iter()
        .map(|r| YearBar {
            category: weekdays
                .iter()
                .position(|d| *d == r.weekday)
                .unwrap_or_default(),
            year: r.year,
            total: r.total,
            label: r.total.to_string(),
        })
        .collect();
    let categories = weekdays.iter().map(|d| d.to_string()).collect();

    category_plot("weekday_chart", "Weekday", categories).show(ui, |plot_ui| {
        draw_year_bars(plot_ui, &bars, &state.year_colors);
    });
}
