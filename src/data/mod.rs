/// Data layer: core types, loading, filtering and projection.
///
/// Architecture:
/// ```text
///  .csv bytes
///        │
///        ▼
///   ┌──────────┐      ┌─────────┐
///   │  loader   │ ───► │ signing │  gs:// → signed https URL
///   └──────────┘      └─────────┘
///        │  memoized in `cache` per (content hash, expiry)
///        ▼
///   ┌───────────────┐
///   │ LoadedDataset │  Vec<Record>, all_sets, labels_per_set
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  required sets / values → matching indices
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection │  table rows, hover labels
///   └────────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
