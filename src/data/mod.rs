/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  data_cleaned.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → StudentDataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ StudentDataset │  Vec<StudentRecord>, bounds, status values
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive range predicates → filtered indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
