use std::path::PathBuf;
use std::sync::Arc;

use crate::color::YearColors;
use crate::config::Config;
use crate::data::aggregate::Aggregates;
use crate::data::filter::{filtered_indices, Dimension, FilterSelection};
use crate::data::loader::DatasetLoader;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Load-once handle for the dataset file.
    pub loader: DatasetLoader,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// Per-dimension filter selections.
    pub selection: FilterSelection,

    /// Indices of records passing the current filters.
    pub visible_indices: Vec<usize>,

    /// The three chart views for `visible_indices`.
    pub aggregates: Aggregates,

    pub year_colors: YearColors,

    /// Number of filtered rows shown in the preview table.
    pub preview_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            loader: DatasetLoader::new(config.data.clone(), config.seed),
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            aggregates: Aggregates::default(),
            year_colors: YearColors::default(),
            preview_rows: config.preview_rows,
            status_message: None,
        }
    }

    /// Load through the cache. On failure everything derived from the
    /// dataset is cleared so nothing stale is shown.
    pub fn load(&mut self) {
        if self.loader.is_cached() {
            log::debug!("Using cached dataset for {}", self.loader.path().display());
        }
        match self.loader.load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached dataset and read the file again.
    pub fn reload(&mut self) {
        self.loader.invalidate();
        self.load();
    }

    /// Switch to another file.
    pub fn open_path(&mut self, path: PathBuf) {
        self.loader.set_path(path);
        self.load();
    }

    /// Ingest a newly loaded dataset, select every value and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = FilterSelection::all(&dataset);
        self.year_colors = YearColors::new(&dataset.years);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    fn clear(&mut self) {
        self.dataset = None;
        self.selection = FilterSelection::default();
        self.visible_indices.clear();
        self.aggregates = Aggregates::default();
    }

    /// Recompute `visible_indices` and the aggregates after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.selection);
        self.aggregates = Aggregates::compute(ds.select(&self.visible_indices));
        log::debug!(
            "{} of {} rows visible ({})",
            self.visible_indices.len(),
            ds.len(),
            self.selection.describe()
        );
    }

    pub fn toggle_year(&mut self, year: i64) {
        self.selection.toggle_year(year);
        self.refilter();
    }

    pub fn toggle_season(&mut self, season: &str) {
        self.selection.toggle_season(season);
        self.refilter();
    }

    pub fn toggle_weather(&mut self, weather: &str) {
        self.selection.toggle_weather(weather);
        self.refilter();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(dimension, ds);
            self.refilter();
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        self.selection.select_none(dimension);
        self.refilter();
    }
}
