//! Comparator strategies.
//!
//! One [`Comparator`] is selected per sort call by looking at a single sample value:
//! - **Numeric**: the sample reads as a number. Ties break on the label, naturally
//!   and always descending.
//! - **Natural**: text, compared with digit runs as numbers (`img2 < img10`).
//! - **PlainText**: text, compared byte-wise ignoring ASCII case.
//!
//! Every strategy sorts missing values last, whatever the direction.

use crate::config::SortOrder;
use crate::core::{SortEntry, SortValue, key_prefix};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparator {
    Numeric,
    Natural,
    PlainText,
}

impl Comparator {
    /// Picks the strategy from the first row's primary value.
    pub fn select(sample: &SortValue, natural: bool) -> Self {
        if sample.as_number().is_some() {
            Comparator::Numeric
        } else if natural {
            Comparator::Natural
        } else {
            Comparator::PlainText
        }
    }

    /// Builds the sort record for one row, converting its key to this strategy's
    /// representation so comparisons never re-parse or re-allocate.
    pub(crate) fn entry(self, index: usize, primary: SortValue, label: SortValue) -> SortEntry {
        match self {
            Comparator::Numeric => SortEntry {
                index,
                primary: primary
                    .as_number()
                    .map_or(SortValue::Missing, SortValue::Numeric),
                label: label.as_text().map(|l| l.into_owned()).unwrap_or_default(),
                cache: 0,
            },
            Comparator::Natural => SortEntry {
                index,
                primary: text_key(&primary, false),
                label: String::new(),
                cache: 0,
            },
            Comparator::PlainText => {
                let primary = text_key(&primary, true);
                let cache = match &primary {
                    SortValue::Text(key) => key_prefix(key.as_bytes()),
                    _ => 0,
                };
                SortEntry {
                    index,
                    primary,
                    label: String::new(),
                    cache,
                }
            }
        }
    }

    /// Total order over prepared entries, with `order` folded in.
    pub(crate) fn compare(self, a: &SortEntry, b: &SortEntry, order: SortOrder) -> Ordering {
        match (&a.primary, &b.primary) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Greater,
            (_, SortValue::Missing) => Ordering::Less,
            (SortValue::Numeric(x), SortValue::Numeric(y)) => match x.total_cmp(y) {
                Ordering::Equal => natural_cmp(&a.label, &b.label).reverse(),
                ordering => order.apply(ordering),
            },
            (SortValue::Text(x), SortValue::Text(y)) => {
                let ordering = match self {
                    Comparator::PlainText => a
                        .cache
                        .cmp(&b.cache)
                        .then_with(|| x.as_bytes().cmp(y.as_bytes())),
                    _ => natural_cmp(x, y),
                };
                order.apply(ordering)
            }
            // Entries built by one strategy never mix kinds; keep the order total anyway.
            (SortValue::Numeric(_), SortValue::Text(_)) => order.apply(Ordering::Less),
            (SortValue::Text(_), SortValue::Numeric(_)) => order.apply(Ordering::Greater),
        }
    }
}

fn text_key(value: &SortValue, fold_case: bool) -> SortValue {
    match value.as_text() {
        Some(text) if fold_case => SortValue::Text(text.to_ascii_lowercase()),
        Some(text) => SortValue::Text(text.into_owned()),
        None => SortValue::Missing,
    }
}

/// Case-insensitive natural comparison.
///
/// Strings are split into runs of digits and runs of everything else. Digit runs
/// compare by numeric value (leading zeros ignored), other runs byte-wise ignoring
/// ASCII case. A digit run sorts where the character `0` would.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = Chunks(a.as_bytes());
    let mut b = Chunks(b.as_bytes());
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => {}
                ordering => return ordering,
            },
        }
    }
}

#[derive(Debug)]
enum Chunk<'a> {
    Digits(&'a [u8]),
    Text(&'a [u8]),
}

impl Chunk<'_> {
    fn lead(&self) -> u8 {
        match self {
            Chunk::Digits(_) => b'0',
            Chunk::Text(t) => t[0].to_ascii_lowercase(),
        }
    }
}

impl Ord for Chunk<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Chunk::Digits(x), Chunk::Digits(y)) => {
                let x = strip_zeros(x);
                let y = strip_zeros(y);
                x.len().cmp(&y.len()).then_with(|| x.cmp(y))
            }
            (Chunk::Text(x), Chunk::Text(y)) => x
                .iter()
                .map(u8::to_ascii_lowercase)
                .cmp(y.iter().map(u8::to_ascii_lowercase)),
            _ => self.lead().cmp(&other.lead()),
        }
    }
}

impl PartialEq for Chunk<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Chunk<'_> {}

impl PartialOrd for Chunk<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn strip_zeros(digits: &[u8]) -> &[u8] {
    let start = digits
        .iter()
        .position(|&d| d != b'0')
        .unwrap_or(digits.len());
    &digits[start..]
}

struct Chunks<'a>(&'a [u8]);

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.0.first()?;
        let digits = first.is_ascii_digit();
        let end = self
            .0
            .iter()
            .position(|b| b.is_ascii_digit() != digits)
            .unwrap_or(self.0.len());
        let (chunk, rest) = self.0.split_at(end);
        self.0 = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_orders_digit_runs_numerically() {
        assert_eq!(natural_cmp("img2", "img10"), Ordering::Less);
        assert_eq!(natural_cmp("page10", "page1"), Ordering::Greater);
        assert_eq!(natural_cmp("Page2", "page10"), Ordering::Less);
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Equal);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
        assert_eq!(natural_cmp("a1", "ab"), Ordering::Less);
        assert_eq!(natural_cmp("Tokyo", "paris"), Ordering::Greater);
    }

    #[test]
    fn natural_handles_huge_digit_runs() {
        let big = "9".repeat(40);
        assert_eq!(natural_cmp(&format!("v{big}"), "v10"), Ordering::Greater);
    }

    #[test]
    fn selects_strategy_from_sample() {
        assert_eq!(Comparator::select(&SortValue::Numeric(1.0), false), Comparator::Numeric);
        assert_eq!(
            Comparator::select(&SortValue::Text("12".into()), true),
            Comparator::Numeric
        );
        assert_eq!(
            Comparator::select(&SortValue::Text("abc".into()), true),
            Comparator::Natural
        );
        assert_eq!(Comparator::select(&SortValue::Missing, false), Comparator::PlainText);
    }

    #[test]
    fn missing_sorts_last_in_both_directions() {
        let cmp = Comparator::Numeric;
        let present = cmp.entry(0, SortValue::Numeric(1.0), SortValue::Missing);
        let missing = cmp.entry(1, SortValue::Missing, SortValue::Missing);
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            assert_eq!(cmp.compare(&missing, &present, order), Ordering::Greater);
            assert_eq!(cmp.compare(&present, &missing, order), Ordering::Less);
            assert_eq!(cmp.compare(&missing, &missing, order), Ordering::Equal);
        }
    }

    #[test]
    fn numeric_ties_break_on_label_descending() {
        let cmp = Comparator::Numeric;
        let paris = cmp.entry(0, SortValue::Numeric(10.0), SortValue::Text("Paris".into()));
        let tokyo = cmp.entry(1, SortValue::Numeric(10.0), SortValue::Text("Tokyo".into()));
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            assert_eq!(cmp.compare(&tokyo, &paris, order), Ordering::Less);
        }
    }

    #[test]
    fn unparseable_text_is_missing_for_numeric() {
        let entry = Comparator::Numeric.entry(0, SortValue::Text("n/a".into()), SortValue::Missing);
        assert!(entry.primary.is_missing());
    }

    #[test]
    fn plain_text_ignores_case_and_uses_bytes() {
        let cmp = Comparator::PlainText;
        let a = cmp.entry(0, SortValue::Text("Page10".into()), SortValue::Missing);
        let b = cmp.entry(1, SortValue::Text("page2".into()), SortValue::Missing);
        assert_eq!(cmp.compare(&a, &b, SortOrder::Ascending), Ordering::Less);

        let long_a = cmp.entry(2, SortValue::Text("abcdefgh-1".into()), SortValue::Missing);
        let long_b = cmp.entry(3, SortValue::Text("ABCDEFGH-2".into()), SortValue::Missing);
        assert_eq!(long_a.cache, long_b.cache);
        assert_eq!(cmp.compare(&long_a, &long_b, SortOrder::Descending), Ordering::Greater);
    }
}
