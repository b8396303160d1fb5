/// Data layer: workbook loading, column resolution, filtering and the
/// series every view is drawn from.
///
/// Architecture:
/// ```text
///  data_python.xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  3 sheets → Dataset (memoized per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  resolve  │  header keywords → ColumnMap
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → filtered province table
///   └──────────┘
///        │
///        ├──► summary   headline metrics, boxplot stats
///        ├──► series    ranked bars, map bubbles, pie slices
///        ├──► regency   drill-down per province
///        ├──► labor     male/female participation
///        └──► school    school-participation brackets
/// ```

pub mod export;
pub mod filter;
pub mod labor;
pub mod loader;
pub mod model;
pub mod regency;
pub mod resolve;
pub mod school;
pub mod series;
pub mod summary;

#[cfg(test)]
pub mod testutil;
