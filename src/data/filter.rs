use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter selection: which values are allowed per dimension
// ---------------------------------------------------------------------------

/// The three filterable dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Season,
    Weather,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Year, Dimension::Season, Dimension::Weather];

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Season => "Season",
            Dimension::Weather => "Weather",
        }
    }
}

/// Allowed values per dimension. An empty set allows nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i64>,
    pub seasons: BTreeSet<String>,
    pub weathers: BTreeSet<String>,
}

impl FilterSelection {
    /// Every observed value selected, i.e. show everything.
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            years: dataset.years.clone(),
            seasons: dataset.seasons.clone(),
            weathers: dataset.weathers.clone(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.years.contains(&record.year)
            && self.seasons.contains(&record.season_group)
            && self.weathers.contains(&record.weathersit)
    }

    pub fn select_all(&mut self, dimension: Dimension, dataset: &Dataset) {
        match dimension {
            Dimension::Year => self.years = dataset.years.clone(),
            Dimension::Season => self.seasons = dataset.seasons.clone(),
            Dimension::Weather => self.weathers = dataset.weathers.clone(),
        }
    }

    pub fn select_none(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.years.clear(),
            Dimension::Season => self.seasons.clear(),
            Dimension::Weather => self.weathers.clear(),
        }
    }

    pub fn toggle_year(&mut self, year: i64) {
        if !self.years.remove(&year) {
            self.years.insert(year);
        }
    }

    pub fn toggle_season(&mut self, season: &str) {
        toggle(&mut self.seasons, season);
    }

    pub fn toggle_weather(&mut self, weather: &str) {
        toggle(&mut self.weathers, weather);
    }

    /// Number of selected values in a dimension.
    pub fn selected_count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Year => self.years.len(),
            Dimension::Season => self.seasons.len(),
            Dimension::Weather => self.weathers.len(),
        }
    }

    /// One-line summary, e.g. `Year: 2011, 2012 | Season: Fall | Weather: Clear`.
    pub fn describe(&self) -> String {
        fn join<T: ToString>(values: impl Iterator<Item = T>) -> String {
            let parts: Vec<String> = values.map(|v| v.to_string()).collect();
            if parts.is_empty() {
                "(none)".to_string()
            } else {
                parts.join(", ")
            }
        }
        format!(
            "Year: {} | Season: {} | Weather: {}",
            join(self.years.iter()),
            join(self.seasons.iter()),
            join(self.weathers.iter()),
        )
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Return indices of records that pass all three dimension filters, in
/// dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect()
}
