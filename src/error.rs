//! Error types for the sort engine.

use crate::core::ColumnKey;
use thiserror::Error;

/// Error returned by a faulting [`RowAccessor::read_column`](crate::core::RowAccessor::read_column).
pub type ColumnReadError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, SortError>;

#[derive(Error, Debug)]
pub enum SortError {
    /// The row storage failed to read a column. Absent columns are not errors;
    /// this only surfaces integration faults of the row implementation.
    #[error("failed to read column `{column}`")]
    ColumnRead {
        column: ColumnKey,
        #[source]
        source: ColumnReadError,
    },

    #[error("invalid sort order `{0}`, expected `asc` or `desc`")]
    InvalidOrder(String),
}
