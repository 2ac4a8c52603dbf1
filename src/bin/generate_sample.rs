//! Writes a sample rental dataset: one row per day for 2011 and 2012.
//!
//! Usage: `generate_sample [OUTPUT] [--seed N]` where OUTPUT ends in `.csv`
//! (default `main_data(2).csv`) or `.parquet`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bike_rental_dashboard::data::loader::DEFAULT_DATA_FILE;
use bike_rental_dashboard::data::model::{SEASONS, WEEKDAYS};
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(about = "Write a sample bike rental dataset")]
struct Args {
    /// Output file; `.parquet`/`.pq` writes Parquet, anything else CSV.
    #[arg(default_value = DEFAULT_DATA_FILE)]
    output: PathBuf,

    /// Seed for the random generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, Serialize)]
struct DayRow {
    dteday: String,
    year: i64,
    month: u32,
    season_group: &'static str,
    weekday: &'static str,
    weathersit: &'static str,
    temp: f64,
    count: i64,
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Meteorological season for a month (1-based): Mar–May is spring.
fn season_for(month: u32) -> &'static str {
    SEASONS[(((month + 9) % 12) / 3) as usize]
}

fn generate_days(rng: &mut StdRng) -> Vec<DayRow> {
    let mut rows = Vec::new();
    // 2011-01-01 was a Saturday.
    let mut weekday_idx = 5usize;

    for year in [2011i64, 2012] {
        let growth = if year == 2012 { 1.6 } else { 1.0 };
        for (m, &days) in MONTH_DAYS.iter().enumerate() {
            let month = m as u32 + 1;
            let days = if month == 2 && is_leap(year) { 29 } else { days };
            for day in 1..=days {
                let season = season_for(month);
                // Warmest in July, coldest in January.
                let phase = (month as f64 - 7.0) / 6.0 * std::f64::consts::FRAC_PI_2;
                let temp = 0.5 - 0.3 * phase.sin().abs() + rng.gen_range(-0.08..0.08);

                let roll: f64 = rng.gen();
                let (weathersit, weather_factor) = if roll < 0.63 {
                    ("Clear", 1.0)
                } else if roll < 0.97 {
                    ("Cloudy", 0.85)
                } else {
                    ("Rainy", 0.35)
                };

                let weekend = weekday_idx >= 5;
                let base = 1_500.0 + 6_000.0 * temp;
                let noise = rng.gen_range(0.85..1.15);
                let weekday_factor = if weekend { 0.95 } else { 1.05 };
                let count = (base * growth * weather_factor * weekday_factor * noise).round() as i64;

                rows.push(DayRow {
                    dteday: format!("{year}-{month:02}-{day:02}"),
                    year,
                    month,
                    season_group: season,
                    weekday: WEEKDAYS[weekday_idx],
                    weathersit,
                    temp: (temp * 1000.0).round() / 1000.0,
                    count: count.max(20),
                });
                weekday_idx = (weekday_idx + 1) % 7;
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[DayRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[DayRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("month", DataType::Int64, false),
        Field::new("season_group", DataType::Utf8, false),
        Field::new("weekday", DataType::Utf8, false),
        Field::new("weathersit", DataType::Utf8, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("count", DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.dteday.as_str()))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.month as i64))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.season_group))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.weekday))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.weathersit))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.temp))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.count))),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = args.output.as_path();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let rows = generate_days(&mut rng);

    let is_parquet = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("parquet") | Some("pq")
    );
    if is_parquet {
        write_parquet(path, &rows)?;
    } else {
        write_csv(path, &rows)?;
    }

    let total: i64 = rows.iter().map(|r| r.count).sum();
    println!(
        "Wrote {} days ({total} rentals) to {}",
        rows.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_the_dashboard_data_file() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.output, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(args.seed, 42);

        let args = Args::try_parse_from(["generate_sample", "out.parquet", "--seed", "7"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out.parquet"));
        assert_eq!(args.seed, 7);
    }

    #[test]
    fn two_years_of_days_with_known_labels() {
        let rows = generate_days(&mut StdRng::seed_from_u64(1));
        assert_eq!(rows.len(), 365 + 366);
        assert_eq!(rows[0].weekday, "Saturday");
        assert_eq!(rows[0].season_group, "Winter");
        assert!(rows.iter().all(|r| SEASONS.contains(&r.season_group)));
        assert!(rows.iter().all(|r| WEEKDAYS.contains(&r.weekday)));
        assert!(rows.iter().all(|r| r.count >= 20));
    }
}
