use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (170.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Year → colour
// ---------------------------------------------------------------------------

/// One colour per observed year, shared by all three charts so a year keeps
/// its colour everywhere.
#[derive(Debug, Clone, Default)]
pub struct YearColors {
    mapping: BTreeMap<i64, Color32>,
}

impl YearColors {
    pub fn new(years: &BTreeSet<i64>) -> Self {
        let mapping = years
            .iter()
            .copied()
            .zip(generate_palette(years.len()))
            .collect();
        YearColors { mapping }
    }

    pub fn color_for(&self, year: i64) -> Color32 {
        self.mapping.get(&year).copied().unwrap_or(Color32::GRAY)
    }
}
