use std::collections::BTreeMap;
use std::fmt;

use super::model::{Record, SEASONS, WEEKDAYS};

// ---------------------------------------------------------------------------
// Intensity buckets
// ---------------------------------------------------------------------------

/// Ordinal label for a summed rental count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntensityBucket {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    Extreme,
}

/// Lower edges of Low..=VeryHigh. Very High also includes its upper edge,
/// Extreme starts strictly above it.
const BUCKET_EDGES: [u64; 5] = [10_000, 20_000, 30_000, 40_000, 50_000];

impl IntensityBucket {
    pub const ALL: [IntensityBucket; 6] = [
        IntensityBucket::VeryLow,
        IntensityBucket::Low,
        IntensityBucket::Medium,
        IntensityBucket::High,
        IntensityBucket::VeryHigh,
        IntensityBucket::Extreme,
    ];

    pub fn classify(total: u64) -> Self {
        if total > BUCKET_EDGES[4] {
            return IntensityBucket::Extreme;
        }
        let rank = BUCKET_EDGES[..4].iter().filter(|&&edge| total >= edge).count();
        Self::ALL[rank]
    }

    pub fn label(self) -> &'static str {
        match self {
            IntensityBucket::VeryLow => "Very Low",
            IntensityBucket::Low => "Low",
            IntensityBucket::Medium => "Medium",
            IntensityBucket::High => "High",
            IntensityBucket::VeryHigh => "Very High",
            IntensityBucket::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for IntensityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Category ordering
// ---------------------------------------------------------------------------

/// Sort key placing known labels in calendar order and unknown ones after,
/// alphabetically.
fn rank_in(known: &[&str], label: &str) -> (usize, String) {
    let rank = known.iter().position(|k| *k == label).unwrap_or(known.len());
    (rank, label.to_string())
}

pub fn season_key(label: &str) -> (usize, String) {
    rank_in(&SEASONS, label)
}

pub fn weekday_key(label: &str) -> (usize, String) {
    rank_in(&WEEKDAYS, label)
}

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearTotal {
    pub year: i64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonYearTotal {
    pub year: i64,
    pub season_group: String,
    pub total: u64,
    pub bucket: IntensityBucket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayYearTotal {
    pub weekday: String,
    pub year: i64,
    pub total: u64,
}

/// Add `count` to a running total, pinning at `u64::MAX` instead of wrapping.
fn accumulate(total: &mut u64, count: u64) {
    *total = total.saturating_add(count);
}

/// Total rentals per year, ordered by year.
pub fn totals_by_year<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<YearTotal> {
    let mut sums: BTreeMap<i64, u64> = BTreeMap::new();
    for r in records {
        accumulate(sums.entry(r.year).or_default(), r.count);
    }
    sums.into_iter()
        .map(|(year, total)| YearTotal { year, total })
        .collect()
}

/// Total rentals per (year, season) with an intensity bucket, ordered by
/// year then season.
pub fn totals_by_year_season<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Vec<SeasonYearTotal> {
    let mut sums: BTreeMap<(i64, (usize, String)), u64> = BTreeMap::new();
    for r in records {
        accumulate(
            sums.entry((r.year, season_key(&r.season_group))).or_default(),
            r.count,
        );
    }
    sums.into_iter()
        .map(|((year, (_, season_group)), total)| SeasonYearTotal {
            year,
            season_group,
            total,
            bucket: IntensityBucket::classify(total),
        })
        .collect()
}

/// Total rentals per (weekday, year), ordered by weekday then year.
pub fn totals_by_weekday_year<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Vec<WeekdayYearTotal> {
    let mut sums: BTreeMap<((usize, String), i64), u64> = BTreeMap::new();
    for r in records {
        accumulate(
            sums.entry((weekday_key(&r.weekday), r.year)).or_default(),
            r.count,
        );
    }
    sums.into_iter()
        .map(|(((_, weekday), year), total)| WeekdayYearTotal {
            weekday,
            year,
            total,
        })
        .collect()
}

/// All three views for one filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub by_year: Vec<YearTotal>,
    pub by_year_season: Vec<SeasonYearTotal>,
    pub by_weekday_year: Vec<WeekdayYearTotal>,
}

impl Aggregates {
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        I::IntoIter: Clone,
    {
        let records = records.into_iter();
        Aggregates {
            by_year: totals_by_year(records.clone()),
            by_year_season: totals_by_year_season(records.clone()),
            by_weekday_year: totals_by_weekday_year(records),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty() && self.by_year_season.is_empty() && self.by_weekday_year.is_empty()
    }

    /// Sum over the by-year view; equals the filtered total up to `u64::MAX`.
    pub fn grand_total(&self) -> u64 {
        self.by_year
            .iter()
            .fold(0, |acc: u64, y| acc.saturating_add(y.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterSelection};
    use crate::data::model::Dataset;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            Record::new(2011, "Winter", "Monday", "Clear", 7_000),
            Record::new(2011, "Spring", "Sunday", "Cloudy", 3_000),
            Record::new(2012, "Spring", "Monday", "Clear", 25_000),
            Record::new(2011, "Winter", "Monday", "Rainy", 4_000),
            Record::new(2012, "Fall", "Friday", "Clear", 60_000),
            Record::new(2012, "Spring", "Sunday", "Clear", 25_000),
        ])
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(IntensityBucket::classify(0), IntensityBucket::VeryLow);
        assert_eq!(IntensityBucket::classify(9_999), IntensityBucket::VeryLow);
        assert_eq!(IntensityBucket::classify(10_000), IntensityBucket::Low);
        assert_eq!(IntensityBucket::classify(20_000), IntensityBucket::Medium);
        assert_eq!(IntensityBucket::classify(30_000), IntensityBucket::High);
        assert_eq!(IntensityBucket::classify(40_000), IntensityBucket::VeryHigh);
        assert_eq!(IntensityBucket::classify(50_000), IntensityBucket::VeryHigh);
        assert_eq!(IntensityBucket::classify(50_001), IntensityBucket::Extreme);
        assert_eq!(IntensityBucket::classify(u64::MAX), IntensityBucket::Extreme);
    }

    #[test]
    fn buckets_are_monotonic() {
        let mut last = IntensityBucket::VeryLow;
        for total in (0..70_000).step_by(250) {
            let b = IntensityBucket::classify(total);
            assert!(b >= last);
            last = b;
        }
        assert_eq!(last, IntensityBucket::Extreme);
    }

    #[test]
    fn two_record_scenario_by_year() {
        let ds = Dataset::from_records(vec![
            Record::new(2011, "Spring", "Monday", "Clear", 100),
            Record::new(2012, "Spring", "Monday", "Clear", 200),
        ]);
        let sel = FilterSelection {
            years: [2011, 2012].into(),
            seasons: ["Spring".to_string()].into(),
            weathers: ["Clear".to_string()].into(),
        };
        let idx = filtered_indices(&ds, &sel);
        assert_eq!(
            totals_by_year(ds.select(&idx)),
            vec![
                YearTotal { year: 2011, total: 100 },
                YearTotal { year: 2012, total: 200 },
            ]
        );

        let only_2011 = FilterSelection {
            years: [2011].into(),
            ..sel
        };
        let idx = filtered_indices(&ds, &only_2011);
        assert_eq!(idx.len(), 1);
        assert_eq!(
            totals_by_year(ds.select(&idx)),
            vec![YearTotal { year: 2011, total: 100 }]
        );
    }

    #[test]
    fn year_season_groups_sum_and_bucket() {
        let ds = sample();
        let rows = totals_by_year_season(&ds.records);
        assert_eq!(
            rows,
            vec![
                SeasonYearTotal {
                    year: 2011,
                    season_group: "Spring".into(),
                    total: 3_000,
                    bucket: IntensityBucket::VeryLow,
                },
                SeasonYearTotal {
                    year: 2011,
                    season_group: "Winter".into(),
                    total: 11_000,
                    bucket: IntensityBucket::Low,
                },
                SeasonYearTotal {
                    year: 2012,
                    season_group: "Spring".into(),
                    total: 50_000,
                    bucket: IntensityBucket::VeryHigh,
                },
                SeasonYearTotal {
                    year: 2012,
                    season_group: "Fall".into(),
                    total: 60_000,
                    bucket: IntensityBucket::Extreme,
                },
            ]
        );
    }

    #[test]
    fn weekday_year_follows_calendar_order() {
        let ds = sample();
        let rows = totals_by_weekday_year(&ds.records);
        let keys: Vec<(&str, i64, u64)> = rows
            .iter()
            .map(|r| (r.weekday.as_str(), r.year, r.total))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Monday", 2011, 11_000),
                ("Monday", 2012, 25_000),
                ("Friday", 2012, 60_000),
                ("Sunday", 2011, 3_000),
                ("Sunday", 2012, 25_000),
            ]
        );
    }

    #[test]
    fn unknown_labels_sort_after_known_ones() {
        assert!(season_key("Winter") < season_key("Monsoon"));
        assert!(season_key("Dry") < season_key("Monsoon"));
        assert!(weekday_key("Sunday") < weekday_key("Holiday"));
    }

    #[test]
    fn absent_combinations_produce_no_rows() {
        let ds = sample();
        let rows = totals_by_year_season(&ds.records);
        assert!(!rows
            .iter()
            .any(|r| r.year == 2011 && r.season_group == "Fall"));
    }

    #[test]
    fn grand_total_matches_filtered_sum() {
        let ds = sample();
        let selections = [
            FilterSelection::all(&ds),
            FilterSelection {
                years: [2012].into(),
                ..FilterSelection::all(&ds)
            },
            FilterSelection {
                weathers: ["Clear".to_string()].into(),
                ..FilterSelection::all(&ds)
            },
        ];
        for sel in &selections {
            let idx = filtered_indices(&ds, sel);
            let expected: u64 = ds.select(&idx).map(|r| r.count).sum();
            let agg = Aggregates::compute(ds.select(&idx));
            assert_eq!(agg.grand_total(), expected);
            let by_season: u64 = agg.by_year_season.iter().map(|r| r.total).sum();
            let by_weekday: u64 = agg.by_weekday_year.iter().map(|r| r.total).sum();
            assert_eq!(by_season, expected);
            assert_eq!(by_weekday, expected);
        }
    }

    #[test]
    fn empty_selection_gives_empty_views() {
        let ds = sample();
        let idx = filtered_indices(&ds, &FilterSelection::default());
        let agg = Aggregates::compute(ds.select(&idx));
        assert!(idx.is_empty());
        assert!(agg.is_empty());
        assert_eq!(agg, Aggregates::default());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let ds = sample();
        let mut sel = FilterSelection::all(&ds);
        sel.toggle_season("Fall");
        let first_idx = filtered_indices(&ds, &sel);
        let first = Aggregates::compute(ds.select(&first_idx));
        let second_idx = filtered_indices(&ds, &sel);
        let second = Aggregates::compute(ds.select(&second_idx));
        assert_eq!(first_idx, second_idx);
        assert_eq!(first, second);
    }

    #[test]
    fn large_sums_stay_exact() {
        let records: Vec<Record> = (0..1_000)
            .map(|_| Record::new(2012, "Summer", "Friday", "Clear", 9_007_199_254_741))
            .collect();
        let by_year = totals_by_year(&records);
        assert_eq!(by_year[0].total, 9_007_199_254_741_000);
    }

    #[test]
    fn overflowing_sums_saturate() {
        let huge = i64::MAX as u64;
        let records = vec![
            Record::new(2011, "Summer", "Friday", "Clear", huge),
            Record::new(2011, "Summer", "Friday", "Clear", huge),
            Record::new(2011, "Summer", "Friday", "Clear", huge),
            Record::new(2012, "Summer", "Friday", "Clear", huge),
        ];
        let agg = Aggregates::compute(&records);
        assert_eq!(agg.by_year[0].total, u64::MAX);
        assert_eq!(agg.by_year[1].total, huge);
        assert_eq!(agg.by_year_season[0].total, u64::MAX);
        assert_eq!(agg.by_year_season[0].bucket, IntensityBucket::Extreme);
        assert_eq!(agg.by_weekday_year[0].total, u64::MAX);
        assert_eq!(agg.grand_total(), u64::MAX);
    }
}
