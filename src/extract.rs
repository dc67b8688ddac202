//! Reading sort keys out of rows.

use crate::core::{ColumnKey, RowAccessor, SortValue};
use crate::error::{Result, SortError};

/// Primary sort value of `row` under `column`.
///
/// Absent columns and non-scalar cells read as [`SortValue::Missing`].
pub fn primary_value<R: RowAccessor>(row: &R, column: &ColumnKey) -> Result<SortValue> {
    let cell = row
        .read_column(column)
        .map_err(|source| SortError::ColumnRead {
            column: column.clone(),
            source,
        })?;
    Ok(SortValue::from_cell(cell))
}

/// Label of `row`, the tiebreak for numeric sorts.
pub fn label_value<R: RowAccessor>(row: &R) -> Result<SortValue> {
    primary_value(row, &ColumnKey::label())
}

/// `(primary, label)` pair for `row`.
pub fn extract<R: RowAccessor>(row: &R, column: &ColumnKey) -> Result<(SortValue, SortValue)> {
    Ok((primary_value(row, column)?, label_value(row)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Row, Value};

    #[test]
    fn extracts_primary_and_label() {
        let row = Row::new().with_label("Paris").with_column(2u16, 10);
        let (primary, label) = extract(&row, &ColumnKey::Metric(2)).unwrap();
        assert_eq!(primary, SortValue::Numeric(10.0));
        assert_eq!(label, SortValue::Text("Paris".to_string()));
    }

    #[test]
    fn missing_and_list_columns_read_as_missing() {
        let row = Row::new().with_column("goals", Value::List(vec![Value::from(3)]));
        let (primary, label) = extract(&row, &ColumnKey::from("goals")).unwrap();
        assert!(primary.is_missing());
        assert!(label.is_missing());
        assert!(
            primary_value(&row, &ColumnKey::from("nb_visits"))
                .unwrap()
                .is_missing()
        );
    }
}
