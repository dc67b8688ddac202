//! The recursive table sort.
//!
//! Each table goes through the same steps:
//! - **Resolve**: pick the column to sort by from the table's first row, always starting
//!   from the requested column (see [`crate::resolve`]).
//! - **Select**: on the top-level table only, pick the [`Comparator`] from that row's value.
//! - **Sort**: build one entry per row, sort the entries, then permute the rows in place.
//! - **Recurse**: when requested, queue every row's sub-table and repeat.
//!
//! Sub-tables are processed from an explicit work stack, so arbitrarily deep reports
//! do not grow the call stack. The main entry point is [`sort_table`].

use crate::compare::Comparator;
use crate::config::SortCriteria;
use crate::core::{ColumnKey, DataTable, RowAccessor, SortEntry};
use crate::error::Result;
use crate::extract;
use crate::metrics::MetricRegistry;
use crate::resolve::ColumnResolver;
use tracing::{debug, debug_span, trace};

/// Sorts `table` in place according to `criteria`.
///
/// Empty tables and [`TableKind::Simple`](crate::core::TableKind::Simple) tables are
/// left untouched. Otherwise the rows are reordered, the resolved column is recorded
/// with [`DataTable::set_sorted_by`], and with `criteria.recursive` every sub-table
/// (including the summary row's) is flagged recursive and sorted the same way.
///
/// Missing columns never fail the sort. The only error is a row whose
/// [`RowAccessor::read_column`] faults; the sort stops there and the error is returned.
///
/// # Examples
///
/// ```
/// use reportsort::{sort_table, DataTable, MetricRegistry, Row, SortCriteria};
///
/// let mut table = DataTable::from_rows(vec![
///     Row::new().with_label("Paris").with_column("nb_visits", 3),
///     Row::new().with_label("Tokyo").with_column("nb_visits", 8),
/// ]);
///
/// sort_table(&mut table, &SortCriteria::new("nb_visits"), &MetricRegistry::standard()).unwrap();
///
/// let labels: Vec<_> = table.rows().iter().filter_map(|r| r.label()).collect();
/// assert_eq!(labels, vec!["Tokyo", "Paris"]);
/// ```
pub fn sort_table<R: RowAccessor>(
    table: &mut DataTable<R>,
    criteria: &SortCriteria,
    registry: &MetricRegistry,
) -> Result<()> {
    if !table.is_sortable() {
        return Ok(());
    }
    let Some(first) = table.first_row() else {
        return Ok(());
    };

    let span = debug_span!(
        "sort_table",
        column = %criteria.column,
        order = %criteria.order,
        natural = criteria.natural,
        recursive = criteria.recursive
    );
    let _enter = span.enter();

    let resolver = ColumnResolver::new(registry);
    let column = resolver.resolve(&criteria.column, first)?;
    let sample = extract::primary_value(first, &column)?;
    let comparator = Comparator::select(&sample, criteria.natural);
    debug!(%column, ?comparator, "selected comparator");

    sort_level(table, &column, comparator, criteria)?;
    if !criteria.recursive {
        return Ok(());
    }

    table.enable_recursive_sort();
    let mut pending = Vec::new();
    queue_subtables(table, &mut pending);

    let mut sorted = 0usize;
    while let Some(subtable) = pending.pop() {
        if !subtable.is_sortable() {
            continue;
        }
        let Some(first) = subtable.first_row() else {
            continue;
        };
        let column = resolver.resolve(&criteria.column, first)?;
        sort_level(subtable, &column, comparator, criteria)?;
        sorted += 1;
        queue_subtables(subtable, &mut pending);
    }
    debug!(subtables = sorted, "recursive sort finished");

    Ok(())
}

/// Sorts the rows of one table by an already resolved column.
fn sort_level<R: RowAccessor>(
    table: &mut DataTable<R>,
    column: &ColumnKey,
    comparator: Comparator,
    criteria: &SortCriteria,
) -> Result<()> {
    let mut entries = table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| -> Result<SortEntry> {
            let (primary, label) = extract::extract(row, column)?;
            Ok(comparator.entry(index, primary, label))
        })
        .collect::<Result<Vec<_>>>()?;

    // Stable: rows the comparator ties keep their input order.
    entries.sort_by(|a, b| comparator.compare(a, b, criteria.order));

    let indices = entries.into_iter().map(|entry| entry.index).collect();
    apply_permutation(table.rows_mut(), indices);
    table.set_sorted_by(column.clone());

    trace!(rows = table.row_count(), %column, "sorted table");
    Ok(())
}

/// Flags every sub-table under `table` recursive and queues it.
fn queue_subtables<'a, R: RowAccessor>(
    table: &'a mut DataTable<R>,
    pending: &mut Vec<&'a mut DataTable<R>>,
) {
    for row in table.rows_and_summary_mut() {
        if let Some(subtable) = row.subtable_mut() {
            subtable.enable_recursive_sort();
            pending.push(subtable);
        }
    }
}

/// Reorders `data` so that position `i` holds the element previously at `indices[i]`.
///
/// Follows each permutation cycle with swaps, so rows are moved without cloning.
fn apply_permutation<T>(data: &mut [T], mut indices: Vec<usize>) {
    for i in 0..data.len() {
        let mut current = i;
        while indices[current] != i {
            let next = indices[current];
            data.swap(current, next);
            indices[current] = current; // Mark as placed
            current = next;
        }
        indices[current] = current;
    }
}
