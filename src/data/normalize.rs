use rand::seq::SliceRandom;
use rand::Rng;

use super::error::SchemaError;
use super::model::{
    CellValue, Dataset, Record, RequiredColumn, Table, SEASONS, WEATHERS, WEEKDAYS, YEARS,
};

// ---------------------------------------------------------------------------
// Column normalizer
// ---------------------------------------------------------------------------

/// Fill in missing required columns and type every row.
///
/// Missing columns are appended to the table with random values and listed in
/// [`Dataset::synthetic_columns`]. They carry no statistical meaning.
pub fn normalize<R: Rng + ?Sized>(mut table: Table, rng: &mut R) -> Result<Dataset, SchemaError> {
    let mut synthetic = Vec::new();

    for column in RequiredColumn::ALL {
        if table.column_index(column.name()).is_some() {
            continue;
        }
        let values = (0..table.row_count())
            .map(|_| synthesize(column, rng))
            .collect();
        table.push_column(column.name(), values);
        synthetic.push(column);
    }

    let idx = |c: RequiredColumn| table.column_index(c.name()).unwrap_or_default();
    let (year_idx, count_idx) = (idx(RequiredColumn::Year), idx(RequiredColumn::Count));
    let season_idx = idx(RequiredColumn::SeasonGroup);
    let weekday_idx = idx(RequiredColumn::Weekday);
    let weather_idx = idx(RequiredColumn::Weathersit);

    let mut records = Vec::with_capacity(table.row_count());
    for (row_no, row) in table.rows.iter().enumerate() {
        let cell = |i: usize| row.get(i).unwrap_or(&CellValue::Null);
        records.push(Record {
            year: year_cell(cell(year_idx), row_no)?,
            count: count_cell(cell(count_idx), row_no)?,
            season_group: label_cell(cell(season_idx), RequiredColumn::SeasonGroup, row_no)?,
            weekday: label_cell(cell(weekday_idx), RequiredColumn::Weekday, row_no)?,
            weathersit: label_cell(cell(weather_idx), RequiredColumn::Weathersit, row_no)?,
        });
    }

    Ok(Dataset::new(table, records, synthetic))
}

fn synthesize<R: Rng + ?Sized>(column: RequiredColumn, rng: &mut R) -> CellValue {
    let pick = |options: &[&str], rng: &mut R| {
        options
            .choose(rng)
            .map(|s| CellValue::String(s.to_string()))
            .unwrap_or(CellValue::Null)
    };
    match column {
        RequiredColumn::Year => YEARS
            .choose(rng)
            .map(|&y| CellValue::Integer(y))
            .unwrap_or(CellValue::Null),
        RequiredColumn::Count => CellValue::Integer(rng.gen_range(50..500)),
        RequiredColumn::SeasonGroup => pick(&SEASONS, rng),
        RequiredColumn::Weekday => pick(&WEEKDAYS, rng),
        RequiredColumn::Weathersit => pick(&WEATHERS, rng),
    }
}

fn year_cell(value: &CellValue, row: usize) -> Result<i64, SchemaError> {
    let column = RequiredColumn::Year.name();
    if value.is_null() {
        return Err(SchemaError::Missing { column, row });
    }
    value.as_i64().ok_or_else(|| SchemaError::Invalid {
        column,
        row,
        value: value.to_string(),
        expected: "a whole number",
    })
}

fn count_cell(value: &CellValue, row: usize) -> Result<u64, SchemaError> {
    let column = RequiredColumn::Count.name();
    if value.is_null() {
        return Err(SchemaError::Missing { column, row });
    }
    value
        .as_i64()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| SchemaError::Invalid {
            column,
            row,
            value: value.to_string(),
            expected: "a non-negative whole number",
        })
}

fn label_cell(value: &CellValue, column: RequiredColumn, row: usize) -> Result<String, SchemaError> {
    match value {
        CellValue::Null => Err(SchemaError::Missing {
            column: column.name(),
            row,
        }),
        CellValue::String(s) => Ok(s.clone()),
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        t.rows = rows
            .iter()
            .map(|r| r.iter().map(|v| CellValue::infer(v)).collect())
            .collect();
        t
    }

    #[test]
    fn complete_table_is_typed_without_synthesis() {
        let t = table(
            &["instant", "year", "season_group", "weekday", "weathersit", "count"],
            &[
                &["1", "2011", "Spring", "Saturday", "Cloudy", "985"],
                &["2", "2012", "Winter", "Sunday", "Clear", "801"],
            ],
        );
        let ds = normalize(t, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(!ds.is_synthetic());
        assert_eq!(ds.table.column_count(), 6);
        assert_eq!(ds.records[0], Record::new(2011, "Spring", "Saturday", "Cloudy", 985));
        assert_eq!(ds.records[1], Record::new(2012, "Winter", "Sunday", "Clear", 801));
    }

    #[test]
    fn missing_columns_are_synthesized_within_domain() {
        let rows: Vec<Vec<&str>> = (0..200).map(|_| vec!["x"]).collect();
        let row_refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&["note"], &row_refs);

        let ds = normalize(t, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(ds.synthetic_columns, RequiredColumn::ALL.to_vec());
        assert_eq!(
            ds.table.columns,
            vec!["note", "year", "count", "season_group", "weekday", "weathersit"]
        );
        for r in &ds.records {
            assert!(YEARS.contains(&r.year));
            assert!((50..500).contains(&r.count));
            assert!(SEASONS.contains(&r.season_group.as_str()));
            assert!(WEEKDAYS.contains(&r.weekday.as_str()));
            assert!(WEATHERS.contains(&r.weathersit.as_str()));
        }
    }

    #[test]
    fn only_absent_columns_are_synthesized() {
        let t = table(&["year", "count"], &[&["2012", "10"], &["2011", "20"]]);
        let ds = normalize(t, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(
            ds.synthetic_columns,
            vec![
                RequiredColumn::SeasonGroup,
                RequiredColumn::Weekday,
                RequiredColumn::Weathersit
            ]
        );
        assert_eq!(ds.records[0].year, 2012);
        assert_eq!(ds.records[1].count, 20);
    }

    #[test]
    fn same_seed_gives_same_synthesis() {
        let t = table(&["note"], &[&["a"], &["b"], &["c"], &["d"]]);
        let a = normalize(t.clone(), &mut StdRng::seed_from_u64(99)).unwrap();
        let b = normalize(t, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn numeric_labels_become_text() {
        let t = table(
            &["year", "count", "season_group", "weekday", "weathersit"],
            &[&["2011", "3", "1", "6", "2"]],
        );
        let ds = normalize(t, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(ds.records[0].season_group, "1");
        assert_eq!(ds.records[0].weathersit, "2");
    }

    #[test]
    fn negative_count_is_rejected() {
        let t = table(
            &["year", "count", "season_group", "weekday", "weathersit"],
            &[&["2011", "-4", "Fall", "Monday", "Clear"]],
        );
        let err = normalize(t, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, SchemaError::Invalid { column: "count", row: 0, .. }));
    }

    #[test]
    fn missing_year_value_is_rejected() {
        let t = table(
            &["year", "count", "season_group", "weekday", "weathersit"],
            &[
                &["2011", "1", "Fall", "Monday", "Clear"],
                &["", "1", "Fall", "Monday", "Clear"],
            ],
        );
        let err = normalize(t, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, SchemaError::Missing { column: "year", row: 1 });
    }
}
