/// Data layer: county table, outlines, and the eligibility filter.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet        .geojson
///        │                           │
///        ▼                           ▼
///   ┌──────────┐               ┌──────────┐
///   │  loader   │               │ boundary │
///   └──────────┘               └──────────┘
///        │                           │
///        └──────────┬────────────────┘
///                   ▼
///             ┌──────────┐
///             │  store    │  Vec<CountyRecord> + BoundaryCatalog, read-only
///             └──────────┘
///                   │
///                   ▼
///             ┌──────────┐
///             │  filter   │  ThresholdSet → id → DisplayValue
///             └──────────┘
/// ```

pub mod boundary;
pub mod filter;
pub mod loader;
pub mod model;
pub mod store;
