use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Category domains
// ---------------------------------------------------------------------------

/// Years used when the `year` column has to be synthesized.
pub const YEARS: [i64; 2] = [2011, 2012];

/// Seasons in calendar order.
pub const SEASONS: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];

/// Weekdays in calendar order, starting on Monday.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Weather conditions, mildest first.
pub const WEATHERS: [&str; 3] = ["Clear", "Cloudy", "Rainy"];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Infer a cell type from raw text the way `pandas.read_csv` would.
    pub fn infer(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Interpret the cell as a whole number.
    ///
    /// Integral floats (`2011.0`) and numeric strings are accepted, anything
    /// with a fractional part is not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            CellValue::String(s) => match CellValue::infer(s.trim()) {
                CellValue::String(_) => None,
                other => other.as_i64(),
            },
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – the raw loaded file
// ---------------------------------------------------------------------------

/// Column names plus row-major cells, exactly as read from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a column; `values` must hold one cell per row.
    pub fn push_column(&mut self, name: &str, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

// ---------------------------------------------------------------------------
// Required columns
// ---------------------------------------------------------------------------

/// The five columns the dashboard needs; synthesized when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequiredColumn {
    Year,
    Count,
    SeasonGroup,
    Weekday,
    Weathersit,
}

impl RequiredColumn {
    /// Synthesis order.
    pub const ALL: [RequiredColumn; 5] = [
        RequiredColumn::Year,
        RequiredColumn::Count,
        RequiredColumn::SeasonGroup,
        RequiredColumn::Weekday,
        RequiredColumn::Weathersit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RequiredColumn::Year => "year",
            RequiredColumn::Count => "count",
            RequiredColumn::SeasonGroup => "season_group",
            RequiredColumn::Weekday => "weekday",
            RequiredColumn::Weathersit => "weathersit",
        }
    }
}

impl fmt::Display for RequiredColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Record – one typed rental row
// ---------------------------------------------------------------------------

/// One row of the rental dataset, reduced to the fields the pipeline uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub year: i64,
    pub season_group: String,
    pub weekday: String,
    pub weathersit: String,
    /// Rental volume.
    pub count: u64,
}

impl Record {
    pub fn new(year: i64, season_group: &str, weekday: &str, weathersit: &str, count: u64) -> Self {
        Record {
            year,
            season_group: season_group.to_string(),
            weekday: weekday.to_string(),
            weathersit: weathersit.to_string(),
            count,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete normalized dataset
// ---------------------------------------------------------------------------

/// The loaded table together with its typed records and category indices.
///
/// `records[i]` always describes `table.rows[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub table: Table,
    pub records: Vec<Record>,
    /// Columns filled with random values because the file lacked them.
    pub synthetic_columns: Vec<RequiredColumn>,
    pub years: BTreeSet<i64>,
    pub seasons: BTreeSet<String>,
    pub weathers: BTreeSet<String>,
}

impl Dataset {
    /// Build category indices from the records.
    pub fn new(table: Table, records: Vec<Record>, synthetic_columns: Vec<RequiredColumn>) -> Self {
        let mut years = BTreeSet::new();
        let mut seasons = BTreeSet::new();
        let mut weathers = BTreeSet::new();
        for r in &records {
            years.insert(r.year);
            seasons.insert(r.season_group.clone());
            weathers.insert(r.weathersit.clone());
        }
        Dataset {
            table,
            records,
            synthetic_columns,
            years,
            seasons,
            weathers,
        }
    }

    /// Dataset whose table holds exactly the five required columns.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Table::new(
            RequiredColumn::ALL
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        );
        table.rows = records
            .iter()
            .map(|r| {
                vec![
                    CellValue::Integer(r.year),
                    CellValue::Integer(r.count as i64),
                    CellValue::String(r.season_group.clone()),
                    CellValue::String(r.weekday.clone()),
                    CellValue::String(r.weathersit.clone()),
                ]
            })
            .collect();
        Dataset::new(table, records, Vec::new())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any required column was synthesized.
    pub fn is_synthetic(&self) -> bool {
        !self.synthetic_columns.is_empty()
    }

    /// Records at the given indices, in index order.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Record> + Clone + 'a {
        indices.iter().filter_map(|&i| self.records.get(i))
    }
}
