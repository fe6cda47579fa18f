/// Data layer: ingestion, reshaping, joining and filtering.
///
/// Architecture:
/// ```text
///  5 × .csv (fixed names in one data dir)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read → RawTable, failures → Diagnostic
///   └──────────┘
///        │
///        ├─► reference   concat both sections, key = sample id
///        ├─► mineralogy  one table per section
///        └─► reshape     element-major → sample-major
///                │
///                ▼
///   ┌──────────────┐
///   │    derive     │  left join on sample id, Sc-normalised ratios
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  section / type predicates → visible indices
///   └──────────┘
/// ```

pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod mineralogy;
pub mod model;
pub mod parse;
pub mod reference;
pub mod reshape;
pub mod schema;
