//! # Reportsort
//!
//! `reportsort` sorts hierarchical analytics report tables: tables of rows where each
//! row may own a nested sub-table (visits by country, each country owning its visits
//! by city).
//!
//! ## Key Features
//!
//! - **Column Fallback**: A requested column the rows lack is resolved to its metric id
//!   (or name), then to the default "number of visits" metric. If nothing matches the
//!   sort still succeeds and every row ties.
//! - **Typed Comparators**: One sample value decides between numeric, natural
//!   (`page2 < page10`) and plain case-insensitive ordering for the whole call.
//! - **Deterministic Ties**: Numeric ties break on the label, always descending.
//!   Missing values sort last in both directions.
//! - **Recursive Sort**: Sub-tables are sorted with the same criteria at any depth,
//!   using an explicit work stack.
//! - **Pluggable Rows**: The [`RowAccessor`] trait lets rows backed by other storage
//!   be sorted in place.
//!
//! ## Usage
//!
//! ```rust
//! use reportsort::prelude::*;
//! use reportsort::metrics::NB_VISITS;
//!
//! let cities = DataTable::from_rows(vec![
//!     Row::new().with_label("Lyon").with_column(NB_VISITS, 2),
//!     Row::new().with_label("Paris").with_column(NB_VISITS, 9),
//! ]);
//! let mut countries = DataTable::from_rows(vec![
//!     Row::new().with_label("Japan").with_column(NB_VISITS, 4),
//!     Row::new()
//!         .with_label("France")
//!         .with_column(NB_VISITS, 11)
//!         .with_subtable(cities),
//! ]);
//!
//! let criteria = SortCriteria::new("nb_visits").descending().recursive(true);
//! sort_table(&mut countries, &criteria, &MetricRegistry::standard()).unwrap();
//!
//! assert_eq!(countries.rows()[0].label(), Some("France"));
//! assert_eq!(countries.sorted_by(), Some(&ColumnKey::Metric(NB_VISITS)));
//!
//! let cities = countries.rows()[0].subtable().unwrap();
//! assert_eq!(cities.rows()[0].label(), Some("Paris"));
//! ```
//!
//! ## Summary Row
//!
//! A table's summary row ("Others") is held in its own slot
//! ([`DataTable::summary_row`]) and never takes part in sorting. Placing it when
//! rendering is up to the caller; [`DataTable::rows_with_summary`] yields it last.

pub mod algo;
pub mod compare;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod filter;
pub mod metrics;
pub mod resolve;

pub use crate::algo::sort_table;
pub use crate::config::{SortCriteria, SortOrder, SortRequest};
pub use crate::core::{ColumnKey, DataTable, Row, RowAccessor, Value};
pub use crate::error::{Result, SortError};
pub use crate::metrics::MetricRegistry;

pub mod prelude {
    pub use crate::algo::sort_table;
    pub use crate::config::{SortCriteria, SortOrder};
    pub use crate::core::{ColumnKey, DataTable, Row, RowAccessor, Value};
    pub use crate::filter::{Sort, TableFilter};
    pub use crate::metrics::MetricRegistry;
}
