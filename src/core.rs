//! Core traits and types for report tables.
//!
//! This module defines:
//! - [`RowAccessor`]: The trait the sort engine reads rows through.
//! - [`Row`] and [`DataTable`]: The in-memory report table produced by the aggregation pipeline.
//! - [`ColumnKey`], [`Value`] and [`SortValue`]: Column addressing and cell values.
//! - SortEntry: Internal per-row sort record.

use crate::error::ColumnReadError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Small-integer id a metric is stored under inside archived rows.
pub type MetricId = u16;

/// Column every row uses for its human-readable label.
pub const LABEL_COLUMN: &str = "label";

/// Size of the key prefix cached in a sort entry.
pub const PREFIX_SIZE: usize = 8;

/// Address of a column inside a row.
///
/// Archived rows usually store metrics under their numeric id to save space, while
/// freshly computed rows and dimension columns use names. Serialized untagged, so a
/// JSON integer reads as [`ColumnKey::Metric`] and a string as [`ColumnKey::Name`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnKey {
    Metric(MetricId),
    Name(String),
}

impl ColumnKey {
    /// The label column.
    pub fn label() -> Self {
        ColumnKey::Name(LABEL_COLUMN.to_string())
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            ColumnKey::Name(name) => Some(name),
            ColumnKey::Metric(_) => None,
        }
    }

    pub fn as_metric(&self) -> Option<MetricId> {
        match self {
            ColumnKey::Metric(id) => Some(*id),
            ColumnKey::Name(_) => None,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Metric(id) => write!(f, "{id}"),
            ColumnKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        ColumnKey::Name(name.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(name: String) -> Self {
        ColumnKey::Name(name)
    }
}

impl From<MetricId> for ColumnKey {
    fn from(id: MetricId) -> Self {
        ColumnKey::Metric(id)
    }
}

/// A stored cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Nested collection (e.g. per-goal breakdowns). Never sortable.
    List(Vec<Value>),
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Sort-time view of a cell: a number, a string, or the missing sentinel.
///
/// Absent columns, lists and NaN numbers all read as [`SortValue::Missing`].
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    Numeric(f64),
    Text(String),
    Missing,
}

impl SortValue {
    /// Converts an optional stored cell into its sort-time view.
    pub fn from_cell(cell: Option<&Value>) -> Self {
        match cell {
            Some(Value::Number(n)) if !n.is_nan() => SortValue::Numeric(positive_zero(*n)),
            Some(Value::Text(s)) => SortValue::Text(s.clone()),
            Some(Value::Number(_)) | Some(Value::List(_)) | None => SortValue::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SortValue::Missing)
    }

    /// Numeric reading of the value. Text counts when it parses as a decimal number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SortValue::Numeric(n) => Some(*n),
            SortValue::Text(s) => parse_numeric(s),
            SortValue::Missing => None,
        }
    }

    /// Text reading of the value. Numbers render the way they display in reports.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            SortValue::Numeric(n) => Some(Cow::Owned(n.to_string())),
            SortValue::Text(s) => Some(Cow::Borrowed(s)),
            SortValue::Missing => None,
        }
    }
}

/// Parses a decimal number the way report values are written: optional sign,
/// digits, optional fraction and exponent, surrounding ASCII whitespace allowed.
///
/// Words such as `inf` or `NaN` are rejected even though `f64::from_str` accepts them.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim_matches(|c: char| c.is_ascii_whitespace());
    let well_formed = s.bytes().any(|b| b.is_ascii_digit())
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !well_formed {
        return None;
    }
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(positive_zero)
}

// -0.0 and 0.0 must compare equal under `f64::total_cmp`.
fn positive_zero(n: f64) -> f64 {
    if n == 0.0 { 0.0 } else { n }
}

/// A trait for reading sort input from a row without copying it.
///
/// The sort engine only ever reads columns and walks into sub-tables through this
/// trait, so rows backed by other storage (lazily decoded archive blobs, FFI
/// handles) can be sorted in place.
///
/// # Examples
///
/// ```
/// use reportsort::core::{ColumnKey, DataTable, RowAccessor, Value};
/// use reportsort::error::ColumnReadError;
///
/// struct PageRow {
///     label: Value,
///     hits: Value,
/// }
///
/// impl RowAccessor for PageRow {
///     fn read_column(&self, key: &ColumnKey) -> Result<Option<&Value>, ColumnReadError> {
///         Ok(match key.as_name() {
///             Some("label") => Some(&self.label),
///             Some("nb_hits") => Some(&self.hits),
///             _ => None,
///         })
///     }
///
///     fn subtable(&self) -> Option<&DataTable<Self>> {
///         None
///     }
///
///     fn subtable_mut(&mut self) -> Option<&mut DataTable<Self>> {
///         None
///     }
/// }
/// ```
pub trait RowAccessor: Sized {
    /// Reads a column. `Ok(None)` means the row does not have it.
    ///
    /// An `Err` is reserved for storage faults and aborts the sort.
    fn read_column(&self, key: &ColumnKey) -> Result<Option<&Value>, ColumnReadError>;

    /// The sub-table this row owns, if any.
    fn subtable(&self) -> Option<&DataTable<Self>>;

    fn subtable_mut(&mut self) -> Option<&mut DataTable<Self>>;

    /// Presence check used by column resolution.
    fn has_column(&self, key: &ColumnKey) -> Result<bool, ColumnReadError> {
        Ok(self.read_column(key)?.is_some())
    }
}

/// One record of a report table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    columns: BTreeMap<ColumnKey, Value>,
    subtable: Option<DataTable>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column setter.
    pub fn with_column(mut self, key: impl Into<ColumnKey>, value: impl Into<Value>) -> Self {
        self.set_column(key, value);
        self
    }

    pub fn with_label(self, label: impl Into<Value>) -> Self {
        self.with_column(LABEL_COLUMN, label)
    }

    pub fn with_subtable(mut self, subtable: DataTable) -> Self {
        self.subtable = Some(subtable);
        self
    }

    pub fn set_column(&mut self, key: impl Into<ColumnKey>, value: impl Into<Value>) {
        self.columns.insert(key.into(), value.into());
    }

    pub fn remove_column(&mut self, key: &ColumnKey) -> Option<Value> {
        self.columns.remove(key)
    }

    pub fn column(&self, key: &ColumnKey) -> Option<&Value> {
        self.columns.get(key)
    }

    /// The label as text, if it is stored as text.
    pub fn label(&self) -> Option<&str> {
        match self.columns.get(&ColumnKey::label()) {
            Some(Value::Text(label)) => Some(label),
            _ => None,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = (&ColumnKey, &Value)> {
        self.columns.iter()
    }

    pub fn set_subtable(&mut self, subtable: DataTable) {
        self.subtable = Some(subtable);
    }

    pub fn take_subtable(&mut self) -> Option<DataTable> {
        self.subtable.take()
    }
}

impl RowAccessor for Row {
    fn read_column(&self, key: &ColumnKey) -> Result<Option<&Value>, ColumnReadError> {
        Ok(self.columns.get(key))
    }

    fn subtable(&self) -> Option<&DataTable> {
        self.subtable.as_ref()
    }

    fn subtable_mut(&mut self) -> Option<&mut DataTable> {
        self.subtable.as_mut()
    }
}

/// Flavor of a report table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Standard,
    /// Degenerate single-row table of plain metrics. Sorting it is a no-op.
    Simple,
}

/// An ordered sequence of rows plus the sort state callers can inspect.
///
/// The summary row ("Others") lives in its own slot and never takes part in sorting.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTable<R = Row> {
    rows: Vec<R>,
    summary_row: Option<Box<R>>,
    kind: TableKind,
    recursive_sort: bool,
    sorted_by: Option<ColumnKey>,
}

impl<R> Default for DataTable<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            summary_row: None,
            kind: TableKind::Standard,
            recursive_sort: false,
            sorted_by: None,
        }
    }
}

impl<R> DataTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<R>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A table of the non-sortable [`TableKind::Simple`] flavor.
    pub fn simple(rows: Vec<R>) -> Self {
        Self {
            rows,
            kind: TableKind::Simple,
            ..Self::default()
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn is_sortable(&self) -> bool {
        self.kind != TableKind::Simple
    }

    pub fn push_row(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: R) -> Self {
        self.rows.push(row);
        self
    }

    /// Rows in their current order, summary row excluded.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [R] {
        &mut self.rows
    }

    pub fn first_row(&self) -> Option<&R> {
        self.rows.first()
    }

    /// Replaces the whole row sequence. The summary row is kept.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary_row(&self) -> Option<&R> {
        self.summary_row.as_deref()
    }

    pub fn summary_row_mut(&mut self) -> Option<&mut R> {
        self.summary_row.as_deref_mut()
    }

    pub fn set_summary_row(&mut self, row: R) {
        self.summary_row = Some(Box::new(row));
    }

    pub fn with_summary_row(mut self, row: R) -> Self {
        self.set_summary_row(row);
        self
    }

    pub fn take_summary_row(&mut self) -> Option<R> {
        self.summary_row.take().map(|row| *row)
    }

    /// Rows followed by the summary row, the order reports render them in.
    pub fn rows_with_summary(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().chain(self.summary_row.as_deref())
    }

    pub fn is_recursive_sort_enabled(&self) -> bool {
        self.recursive_sort
    }

    pub fn enable_recursive_sort(&mut self) {
        self.recursive_sort = true;
    }

    pub fn set_recursive_sort(&mut self, enabled: bool) {
        self.recursive_sort = enabled;
    }

    /// Column the table was last sorted by, after fallback resolution.
    pub fn sorted_by(&self) -> Option<&ColumnKey> {
        self.sorted_by.as_ref()
    }

    pub fn set_sorted_by(&mut self, column: ColumnKey) {
        self.sorted_by = Some(column);
    }

    /// Rows and summary row mutably, borrowed for the table's full lifetime.
    pub(crate) fn rows_and_summary_mut(&mut self) -> impl Iterator<Item = &mut R> {
        self.rows.iter_mut().chain(self.summary_row.as_deref_mut())
    }
}

impl<R> FromIterator<R> for DataTable<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

/// Per-row sort record: position in the input, prepared primary key, label text and
/// a cached big-endian prefix of text keys.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SortEntry {
    pub index: usize,
    pub primary: SortValue,
    pub label: String,
    pub cache: u64,
}

/// First [`PREFIX_SIZE`] bytes of `key`, zero padded, as a big-endian integer.
///
/// Comparing two prefixes orders keys the same way as comparing the bytes, except
/// that keys which only differ past the prefix (or in trailing zero bytes) tie.
#[inline(always)]
pub(crate) fn key_prefix(key: &[u8]) -> u64 {
    let mut buf = [0u8; PREFIX_SIZE];
    let len = key.len().min(PREFIX_SIZE);
    buf[..len].copy_from_slice(&key[..len]);
    u64::from_be_bytes(buf)
}
