use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::data::filter::FilterSelection;
use crate::data::loader::DEFAULT_DATA_FILE;
use crate::data::model::Dataset;

/// Command line / environment configuration.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "bike-rental-dashboard",
    version,
    about = "Bike rental dashboard: yearly, seasonal and weekday rental totals",
    long_about = None
)]
pub struct Config {
    /// Rental dataset (.csv, .json or .parquet)
    #[arg(
        short,
        long,
        env = "BIKE_DASHBOARD_DATA",
        default_value = DEFAULT_DATA_FILE,
        value_hint = ValueHint::FilePath
    )]
    pub data: PathBuf,

    /// Seed for columns synthesized when the file lacks them (random if omitted)
    #[arg(long, env = "BIKE_DASHBOARD_SEED")]
    pub seed: Option<u64>,

    /// Rows shown in the data preview
    #[arg(long, default_value_t = 10)]
    pub preview_rows: usize,

    /// Print the aggregates to stdout instead of opening a window
    #[arg(long, action = ArgAction::SetTrue)]
    pub summary: bool,

    /// Year to include in --summary (repeatable; all years if omitted)
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i64>,

    /// Season to include in --summary (repeatable; all seasons if omitted)
    #[arg(long = "season", value_name = "SEASON")]
    pub seasons: Vec<String>,

    /// Weather condition to include in --summary (repeatable; all if omitted)
    #[arg(long = "weather", value_name = "WEATHER")]
    pub weathers: Vec<String>,
}

impl Config {
    /// Filter selection from the command line; an omitted dimension selects
    /// every observed value.
    pub fn selection(&self, dataset: &Dataset) -> FilterSelection {
        let mut selection = FilterSelection::all(dataset);
        if !self.years.is_empty() {
            selection.years = self.years.iter().copied().collect();
        }
        if !self.seasons.is_empty() {
            selection.seasons = self.seasons.iter().cloned().collect();
        }
        if !self.weathers.is_empty() {
            selection.weathers = self.weathers.iter().cloned().collect();
        }
        selection
    }
}
