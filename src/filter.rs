//! Table filters.
//!
//! Report pipelines run a chain of filters over each table before rendering it.
//! [`Sort`] is the sort engine packaged as one of those filters.

use crate::algo::sort_table;
use crate::config::SortCriteria;
use crate::core::{DataTable, Row, RowAccessor};
use crate::error::Result;
use crate::metrics::MetricRegistry;

/// A transformation applied to a table in place.
pub trait TableFilter<R: RowAccessor = Row> {
    fn filter(&self, table: &mut DataTable<R>) -> Result<()>;
}

/// Sorts a table by a column, see [`sort_table`].
///
/// ```
/// use reportsort::filter::{Sort, TableFilter};
/// use reportsort::{DataTable, MetricRegistry, Row, SortCriteria};
///
/// let registry = MetricRegistry::standard();
/// let sort = Sort::new(SortCriteria::new("label").ascending(), &registry);
///
/// let mut table = DataTable::from_rows(vec![
///     Row::new().with_label("page10"),
///     Row::new().with_label("page2"),
/// ]);
/// table.filter(&sort).unwrap();
///
/// assert_eq!(table.rows()[0].label(), Some("page2"));
/// ```
#[derive(Clone, Debug)]
pub struct Sort<'a> {
    criteria: SortCriteria,
    registry: &'a MetricRegistry,
}

impl<'a> Sort<'a> {
    pub fn new(criteria: SortCriteria, registry: &'a MetricRegistry) -> Self {
        Self { criteria, registry }
    }

    pub fn criteria(&self) -> &SortCriteria {
        &self.criteria
    }
}

impl<R: RowAccessor> TableFilter<R> for Sort<'_> {
    fn filter(&self, table: &mut DataTable<R>) -> Result<()> {
        sort_table(table, &self.criteria, self.registry)
    }
}

impl<R: RowAccessor> DataTable<R> {
    /// Applies `filter` to this table.
    pub fn filter<F: TableFilter<R> + ?Sized>(&mut self, filter: &F) -> Result<()> {
        filter.filter(self)
    }

    /// Applies each filter in turn, stopping at the first error.
    pub fn filter_all(&mut self, filters: &[&dyn TableFilter<R>]) -> Result<()> {
        filters.iter().try_for_each(|filter| filter.filter(self))
    }
}
