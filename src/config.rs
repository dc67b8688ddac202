//! Sort criteria and their request-parameter form.

use crate::core::ColumnKey;
use crate::error::SortError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Direction of the primary sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// `+1` for ascending, `-1` for descending.
    pub fn sign(self) -> i8 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Folds the direction into an ascending comparison result.
    #[inline(always)]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        })
    }
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            o if o.eq_ignore_ascii_case("asc") => Ok(SortOrder::Ascending),
            o if o.eq_ignore_ascii_case("desc") => Ok(SortOrder::Descending),
            other => Err(SortError::InvalidOrder(other.to_string())),
        }
    }
}

/// Everything one sort call needs, held constant across all recursion levels.
#[derive(Clone, Debug, PartialEq)]
pub struct SortCriteria {
    /// Requested column; the engine may fall back to another one per table.
    pub column: ColumnKey,
    pub order: SortOrder,
    /// Compare text naturally (`page2 < page10`) instead of byte-wise.
    pub natural: bool,
    /// Also sort every nested sub-table.
    pub recursive: bool,
}

impl SortCriteria {
    /// Descending, natural, non-recursive sort by `column`.
    pub fn new(column: impl Into<ColumnKey>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::default(),
            natural: true,
            recursive: false,
        }
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn ascending(self) -> Self {
        self.order(SortOrder::Ascending)
    }

    pub fn descending(self) -> Self {
        self.order(SortOrder::Descending)
    }

    pub fn natural(mut self, natural: bool) -> Self {
        self.natural = natural;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Sort parameters as they arrive on a report API request.
///
/// ```
/// use reportsort::config::{SortCriteria, SortOrder, SortRequest};
///
/// let request: SortRequest = serde_json::from_str(
///     r#"{"filter_sort_column": "nb_visits", "filter_sort_order": "asc"}"#,
/// ).unwrap();
/// let criteria = SortCriteria::from(request);
///
/// assert_eq!(criteria.order, SortOrder::Ascending);
/// assert!(criteria.natural);
/// assert!(!criteria.recursive);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SortRequest {
    #[serde(rename = "filter_sort_column")]
    pub column: ColumnKey,
    #[serde(rename = "filter_sort_order", default)]
    pub order: SortOrder,
    #[serde(rename = "filter_sort_natural", default = "enabled")]
    pub natural: bool,
    #[serde(rename = "filter_sort_recursive", default)]
    pub recursive: bool,
}

fn enabled() -> bool {
    true
}

impl From<SortRequest> for SortCriteria {
    fn from(request: SortRequest) -> Self {
        SortCriteria {
            column: request.column,
            order: request.order,
            natural: request.natural,
            recursive: request.recursive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_order_case_insensitively() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert_eq!(" desc".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert!(matches!(
            "up".parse::<SortOrder>(),
            Err(SortError::InvalidOrder(o)) if o == "up"
        ));
    }

    #[test]
    fn sign_matches_direction() {
        assert_eq!(SortOrder::Ascending.sign(), 1);
        assert_eq!(SortOrder::Descending.sign(), -1);
        assert_eq!(SortOrder::Descending.apply(Ordering::Less), Ordering::Greater);
    }

    #[test]
    fn request_defaults() {
        let request: SortRequest = serde_json::from_str(r#"{"filter_sort_column": 2}"#).unwrap();
        let criteria = SortCriteria::from(request);
        assert_eq!(criteria, SortCriteria::new(ColumnKey::Metric(2)));
        assert_eq!(criteria.order, SortOrder::Descending);
    }

    #[test]
    fn rejects_unknown_order_in_request() {
        let result: Result<SortRequest, _> =
            serde_json::from_str(r#"{"filter_sort_column": "label", "filter_sort_order": "up"}"#);
        assert!(result.is_err());
    }
}
