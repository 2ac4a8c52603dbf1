use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::config::Config;
use crate::data::aggregate::Aggregates;
use crate::data::filter::{filtered_indices, FilterSelection};
use crate::data::loader::DatasetLoader;
use crate::data::model::{CellValue, Dataset};

const BAR_WIDTH: usize = 40;

/// `1234567` → `1,234,567`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Headless mode: load, filter by the command line selection, print.
pub fn print_summary(config: &Config) -> Result<()> {
    let mut loader = DatasetLoader::new(config.data.clone(), config.seed);
    let dataset = loader.load()?;
    let selection = config.selection(&dataset);
    let text = render_summary(&dataset, &selection, config.preview_rows)?;
    print!("{text}");
    Ok(())
}

/// Text rendering of the dashboard for one selection.
pub fn render_summary(
    dataset: &Dataset,
    selection: &FilterSelection,
    preview_rows: usize,
) -> Result<String> {
    let indices = filtered_indices(dataset, selection);
    let agg = Aggregates::compute(dataset.select(&indices));

    let mut out = String::new();
    writeln!(out, "Showing {}", selection.describe())?;
    if dataset.is_synthetic() {
        let names: Vec<&str> = dataset.synthetic_columns.iter().map(|c| c.name()).collect();
        writeln!(
            out,
            "WARNING: synthetic columns (random values): {}",
            names.join(", ")
        )?;
    }

    writeln!(out, "\n1. Rentals per year")?;
    let rows: Vec<(String, u64)> = agg
        .by_year
        .iter()
        .map(|r| (r.year.to_string(), r.total))
        .collect();
    write_bars(&mut out, &rows)?;

    writeln!(out, "\n2. Rentals per season and year")?;
    let rows: Vec<(String, u64)> = agg
        .by_year_season
        .iter()
        .map(|r| (format!("{} {} [{}]", r.season_group, r.year, r.bucket), r.total))
        .collect();
    write_bars(&mut out, &rows)?;

    writeln!(out, "\n3. Rentals per weekday and year")?;
    let rows: Vec<(String, u64)> = agg
        .by_weekday_year
        .iter()
        .map(|r| (format!("{} {}", r.weekday, r.year), r.total))
        .collect();
    write_bars(&mut out, &rows)?;

    writeln!(out, "\nData preview")?;
    writeln!(out, "{}", preview_table(dataset, &indices, preview_rows)?)?;
    writeln!(out, "Rows: {}", indices.len())?;
    writeln!(out, "Columns: {}", dataset.table.column_count())?;
    writeln!(out, "Column names: {}", dataset.table.columns.join(", "))?;
    Ok(out)
}

fn write_bars(out: &mut String, rows: &[(String, u64)]) -> std::fmt::Result {
    if rows.is_empty() {
        return writeln!(out, "  (no data)");
    }
    let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1);
    for (label, value) in rows {
        let len = ((*value as u128 * BAR_WIDTH as u128) / max as u128) as usize;
        writeln!(
            out,
            "  {label:<label_width$}  {bar:<width$}  {}",
            format_thousands(*value),
            bar = "█".repeat(len),
            width = BAR_WIDTH,
        )?;
    }
    Ok(())
}

/// First `limit` filtered rows, pretty-printed through Arrow.
fn preview_table(dataset: &Dataset, indices: &[usize], limit: usize) -> Result<String> {
    let table = &dataset.table;
    let shown: Vec<&Vec<CellValue>> = indices
        .iter()
        .take(limit)
        .filter_map(|&i| table.rows.get(i))
        .collect();

    let fields: Vec<Field> = table
        .columns
        .iter()
        .map(|c| Field::new(c, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = (0..table.column_count())
        .map(|col| {
            let values: Vec<Option<String>> = shown
                .iter()
                .map(|row| match row.get(col) {
                    Some(CellValue::Null) | None => None,
                    Some(v) => Some(v.to_string()),
                })
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building preview batch")?;
    let formatted = pretty_format_batches(&[batch]).context("formatting preview")?;
    Ok(formatted.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Record, RequiredColumn};

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            Record::new(2011, "Spring", "Monday", "Clear", 100),
            Record::new(2012, "Spring", "Monday", "Clear", 200),
            Record::new(2012, "Winter", "Sunday", "Rainy", 12_500),
        ])
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(3_292_679), "3,292,679");
    }

    #[test]
    fn summary_lists_views_and_preview() {
        let ds = dataset();
        let text = render_summary(&ds, &FilterSelection::all(&ds), 2).unwrap();
        assert!(text.contains("Year: 2011, 2012"));
        assert!(text.contains("Winter 2012 [Low]"), "{text}");
        assert!(text.contains("12,500"));
        assert!(text.contains("Sunday 2012"));
        assert!(text.contains("Rows: 3"));
        assert!(text.contains("Columns: 5"));
        assert!(text.contains("Column names: year, count, season_group, weekday, weathersit"));
        assert!(!text.contains("WARNING"));
        // Preview is capped at two rows.
        assert!(text.contains("| 2011 "));
        assert!(!text.contains("12500"));
    }

    #[test]
    fn empty_selection_prints_no_data() {
        let ds = dataset();
        let text = render_summary(&ds, &FilterSelection::default(), 10).unwrap();
        assert_eq!(text.matches("(no data)").count(), 3);
        assert!(text.contains("Rows: 0"));
    }

    #[test]
    fn synthetic_columns_are_announced() {
        let mut ds = dataset();
        ds.synthetic_columns = vec![RequiredColumn::Year, RequiredColumn::Weathersit];
        let text = render_summary(&ds, &FilterSelection::all(&ds), 10).unwrap();
        assert!(text.contains("WARNING: synthetic columns (random values): year, weathersit"));
    }
}
