//! Dewey-decimal ordering of sequence strings.
//!
//! Member order and title component sequences are written as dot-separated
//! segments (`"1"`, `"1.5"`, `"1.10"`). Numeric segments compare numerically,
//! so `"1.10"` sorts after `"1.9"`. A sequence that is a strict prefix of
//! another sorts first (`"1"` before `"1.0"`). Non-numeric segments sort after
//! numeric ones and compare as text.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Number(u64),
    Text(&'a str),
}

fn segments(sequence: &str) -> impl Iterator<Item = Segment<'_>> {
    sequence.trim().split('.').map(|part| {
        let part = part.trim();
        match part.parse::<u64>() {
            Ok(n) => Segment::Number(n),
            Err(_) => Segment::Text(part),
        }
    })
}

/// Compares two sequence strings in dewey-decimal order.
#[must_use]
pub fn compare_sequences(a: &str, b: &str) -> Ordering {
    let mut left = segments(a);
    let mut right = segments(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match x.cmp(&y) {
                Ordering::Equal => continue,
                unequal => return unequal,
            },
        }
    }
}

/// A sequence string ordered by [`compare_sequences`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeweyOrder(pub String);

impl DeweyOrder {
    /// Wraps a sequence string.
    pub fn new(sequence: impl Into<String>) -> Self {
        Self(sequence.into())
    }

    /// The wrapped sequence string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for DeweyOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_sequences(&self.0, &other.0).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for DeweyOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
