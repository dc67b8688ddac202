//! Column resolution.
//!
//! A report can be requested sorted by a column the stored rows do not carry under
//! that key: archived rows keep metrics under numeric ids, and older archives may
//! lack a metric altogether. [`ColumnResolver`] picks the key to actually sort by
//! from one representative row:
//!
//! 1. the requested key, if the row has it;
//! 2. the other spelling of a known metric (name for id, id for name);
//! 3. the registry's default metric (number of visits), by id then by name;
//! 4. the requested key unchanged, so every row compares as missing.

use crate::core::{ColumnKey, RowAccessor};
use crate::error::{Result, SortError};
use crate::metrics::MetricRegistry;
use tracing::debug;

/// Resolves requested sort columns against sample rows.
#[derive(Clone, Copy, Debug)]
pub struct ColumnResolver<'a> {
    registry: &'a MetricRegistry,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(registry: &'a MetricRegistry) -> Self {
        Self { registry }
    }

    /// Key to sort by, given the table's first row.
    pub fn resolve<R: RowAccessor>(&self, requested: &ColumnKey, sample: &R) -> Result<ColumnKey> {
        if has_column(sample, requested)? {
            return Ok(requested.clone());
        }

        if let Some(counterpart) = self.registry.counterpart(requested) {
            if has_column(sample, &counterpart)? {
                debug!(%requested, resolved = %counterpart, "sorting by metric counterpart");
                return Ok(counterpart);
            }
        }

        let default = ColumnKey::Metric(self.registry.default_metric());
        let default_name = self.registry.counterpart(&default);
        for candidate in std::iter::once(default).chain(default_name) {
            if has_column(sample, &candidate)? {
                debug!(%requested, resolved = %candidate, "column unavailable, sorting by default metric");
                return Ok(candidate);
            }
        }

        debug!(%requested, "column unavailable, rows will tie");
        Ok(requested.clone())
    }
}

fn has_column<R: RowAccessor>(row: &R, column: &ColumnKey) -> Result<bool> {
    row.has_column(column)
        .map_err(|source| SortError::ColumnRead {
            column: column.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Row;
    use crate::metrics::{NB_ACTIONS, NB_VISITS};

    fn resolve(requested: impl Into<ColumnKey>, row: &Row) -> ColumnKey {
        let registry = MetricRegistry::standard();
        ColumnResolver::new(&registry)
            .resolve(&requested.into(), row)
            .unwrap()
    }

    #[test]
    fn keeps_a_present_column() {
        let row = Row::new().with_column("nb_visits", 3).with_column(NB_VISITS, 4);
        assert_eq!(resolve("nb_visits", &row), ColumnKey::from("nb_visits"));
    }

    #[test]
    fn maps_metric_name_to_id() {
        let row = Row::new().with_column(NB_ACTIONS, 9).with_column(NB_VISITS, 4);
        assert_eq!(resolve("nb_actions", &row), ColumnKey::Metric(NB_ACTIONS));
    }

    #[test]
    fn maps_metric_id_to_name() {
        let row = Row::new().with_column("nb_actions", 9);
        assert_eq!(resolve(NB_ACTIONS, &row), ColumnKey::from("nb_actions"));
    }

    #[test]
    fn falls_back_to_visits() {
        let row = Row::new().with_column(NB_VISITS, 4);
        assert_eq!(resolve("revenue_per_visit", &row), ColumnKey::Metric(NB_VISITS));

        let named = Row::new().with_column("nb_visits", 4);
        assert_eq!(resolve("revenue_per_visit", &named), ColumnKey::from("nb_visits"));
    }

    #[test]
    fn keeps_the_request_when_nothing_resolves() {
        let row = Row::new().with_label("only a label");
        assert_eq!(resolve("bounce_rate", &row), ColumnKey::from("bounce_rate"));
    }
}
