use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Dataset, Table};
use super::normalize::normalize;

/// File read when no other path is configured.
pub const DEFAULT_DATA_FILE: &str = "main_data(2).csv";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize a rental dataset.
///
/// A missing file is reported as [`LoadError::FileNotFound`] before any
/// parsing; everything else that goes wrong is a [`LoadError::Parse`].
pub fn load_dataset(path: &Path, rng: &mut impl rand::Rng) -> Result<Dataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let parse_error = |reason: String| LoadError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    let table = load_table(path).map_err(|e| parse_error(format!("{e:#}")))?;
    normalize(table, rng).map_err(|e| parse_error(e.to_string()))
}

/// Read a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – Parquet file with scalar columns
/// * `.json`    – `[{ "year": 2011, "count": 985, ... }, ...]`
/// * anything else is read as CSV with a header row
pub fn load_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        _ => load_csv(path),
    }
}

// ---------------------------------------------------------------------------
// Memoized loader
// ---------------------------------------------------------------------------

/// Load-once handle for the single dataset of the process.
///
/// The first successful [`DatasetLoader::load`] is cached and handed out
/// again until [`DatasetLoader::invalidate`] or [`DatasetLoader::set_path`].
/// Failures are not cached.
#[derive(Debug)]
pub struct DatasetLoader {
    path: PathBuf,
    seed: Option<u64>,
    cached: Option<Arc<Dataset>>,
}

impl DatasetLoader {
    /// `seed` makes column synthesis reproducible; `None` draws from entropy.
    pub fn new(path: impl Into<PathBuf>, seed: Option<u64>) -> Self {
        DatasetLoader {
            path: path.into(),
            seed,
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point at another file, dropping the cached dataset.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    pub fn load(&mut self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(ds) = &self.cached {
            return Ok(Arc::clone(ds));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let dataset = Arc::new(load_dataset(&self.path, &mut rng)?);

        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            dataset.len(),
            dataset.table.columns,
            self.path.display()
        );
        if dataset.is_synthetic() {
            log::warn!(
                "{} lacks {:?}; filled with random values",
                self.path.display(),
                dataset
                    .synthetic_columns
                    .iter()
                    .map(|c| c.name())
                    .collect::<Vec<_>>()
            );
        }

        self.cached = Some(Arc::clone(&dataset));
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Cell types are inferred per value.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no header row");
    }

    let mut table = Table::new(headers);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        table
            .rows
            .push(record.iter().map(|v| CellValue::infer(v.trim())).collect());
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "year": 2011, "season_group": "Spring", "weekday": "Saturday", "count": 985 },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen order; keys missing from a row become null.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let mut table = Table::new(columns);
    for obj in objects {
        let row = table
            .columns
            .iter()
            .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        table.rows.push(row);
    }
    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut table = Table::new(columns);
    // Batches may list columns in any order; index by name.
    let positions: BTreeMap<String, usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.clone(), i))
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let mut rows = vec![vec![CellValue::Null; table.column_count()]; batch.num_rows()];

        for (col_idx, field) in schema.fields().iter().enumerate() {
            let Some(&target) = positions.get(field.name()) else {
                bail!("Parquet batch has unexpected column '{}'", field.name());
            };
            let cells = column_cells(batch.column(col_idx))
                .with_context(|| format!("parquet column '{}'", field.name()))?;
            for (row, cell) in rows.iter_mut().zip(cells) {
                row[target] = cell;
            }
        }
        table.rows.extend(rows);
    }

    Ok(table)
}

/// Convert one Arrow column into cells.
///
/// Dictionary columns (pandas `category`) are decoded to their value type
/// first. Types without a direct cell counterpart (dates, timestamps,
/// decimals, ...) keep their Arrow text rendering.
fn column_cells(col: &ArrayRef) -> Result<Vec<CellValue>> {
    let col = match col.data_type() {
        DataType::Dictionary(_, value_type) => {
            cast(col.as_ref(), value_type).context("decoding dictionary column")?
        }
        _ => Arc::clone(col),
    };
    let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())
        .context("formatting column")?;
    Ok((0..col.len())
        .map(|row| extract_cell(col.as_ref(), &formatter, row))
        .collect())
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &dyn Array, formatter: &ArrayFormatter<'_>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let int = |v: Option<i64>| v.map(CellValue::Integer).unwrap_or(CellValue::Null);
    let float = |v: Option<f64>| v.map(CellValue::Float).unwrap_or(CellValue::Null);
    match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::String(s.value(row).to_string()))
            .unwrap_or(CellValue::Null),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::String(s.value(row).to_string()))
            .unwrap_or(CellValue::Null),
        DataType::Int8 => int(col.as_primitive_opt::<Int8Type>().map(|a| a.value(row) as i64)),
        DataType::Int16 => int(col.as_primitive_opt::<Int16Type>().map(|a| a.value(row) as i64)),
        DataType::Int32 => int(col.as_primitive_opt::<Int32Type>().map(|a| a.value(row) as i64)),
        DataType::Int64 => int(col.as_primitive_opt::<Int64Type>().map(|a| a.value(row))),
        DataType::UInt8 => int(col.as_primitive_opt::<UInt8Type>().map(|a| a.value(row) as i64)),
        DataType::UInt16 => int(col.as_primitive_opt::<UInt16Type>().map(|a| a.value(row) as i64)),
        DataType::UInt32 => int(col.as_primitive_opt::<UInt32Type>().map(|a| a.value(row) as i64)),
        // Beyond i64 the value stays text so validation can name it.
        DataType::UInt64 => match col.as_primitive_opt::<UInt64Type>().map(|a| a.value(row)) {
            Some(v) => i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::String(v.to_string())),
            None => CellValue::Null,
        },
        DataType::Float32 => {
            float(col.as_primitive_opt::<Float32Type>().map(|a| a.value(row) as f64))
        }
        DataType::Float64 => float(col.as_primitive_opt::<Float64Type>().map(|a| a.value(row))),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|a| CellValue::Bool(a.value(row)))
            .unwrap_or(CellValue::Null),
        _ => CellValue::String(formatter.value(row).to_string()),
    }
}
