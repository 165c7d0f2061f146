/// Data layer: core types, loading, and the session cache.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PatientTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetCache │  read once, share Arc<PatientTable>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ PatientTable │  ids, rows by id, numeric columns
///   └──────────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
