/// Data layer: core types, loading, normalization, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table  (cached by DatasetLoader)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  fill missing columns → Dataset (Vec<Record>)
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / season / weather membership → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  per-year, year×season (bucketed), weekday×year sums
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
