/// Data layer: metadata table, catalog discovery, and per-patient filtering.
///
/// Architecture:
/// ```text
///  metadata.csv / .tsv / .json / .parquet      files/<id>/
///        │                                        │
///        ▼                                        ▼
///   ┌──────────┐                            ┌───────────┐
///   │  loader   │  parse file → table        │  catalog   │  scan numeric folders
///   └──────────┘                            └───────────┘
///        │                                        │
///        └──────────────┬─────────────────────────┘
///                       ▼
///                 ┌──────────┐
///                 │  filter   │  patient_id == int(id) → matching rows
///                 └──────────┘
/// ```

pub mod catalog;
pub mod filter;
pub mod loader;
pub mod model;
