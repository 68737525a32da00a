/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate file → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, sites, payload bounds (immutable)
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site wildcard + inclusive payload range → row iterators
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
