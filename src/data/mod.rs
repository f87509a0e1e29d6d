/// Data layer: table model, loading, date normalization and inspection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  ordered Vec<Column>, typed cells
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  dates    │   │ inspect   │  band diagnostics, preview series
///   └──────────┘   └──────────┘
///   date column → ordinal days
/// ```

pub mod dates;
pub mod inspect;
pub mod loader;
pub mod model;
