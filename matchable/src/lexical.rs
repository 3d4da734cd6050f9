//! The letter-priority string order used for lexical views and lookup by name.
//!
//! Strings are compared byte by byte. At the first differing position an ASCII
//! letter sorts before anything that is not a letter; two bytes of the same class
//! compare by value. When one string is a prefix of the other, the shorter one is less.
//!
//! ```rust
//! use std::cmp::Ordering;
//! use matchable::lexical::lexical_cmp;
//!
//! assert_eq!(lexical_cmp("Zebra", "_private"), Ordering::Less);
//! assert_eq!(lexical_cmp("Apple", "Banana"), Ordering::Less);
//! assert_eq!(lexical_cmp("O", "O(1)"), Ordering::Less);
//! ```

use std::cmp::Ordering;

use crate::Matchable;

/// Compares two strings with letters taking priority over every other byte.
pub fn lexical_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    for (x, y) in a.iter().zip(b) {
        let ordering = match (x.is_ascii_alphabetic(), y.is_ascii_alphabetic()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

/// Sorts `variants` into lexical order. Equal display strings keep their relative order.
pub(crate) fn sort<T: Matchable>(variants: &mut [T]) {
    variants.sort_by(|a, b| lexical_cmp(a.as_str(), b.as_str()));
}

/// Binary search over a lexically sorted slice.
pub(crate) fn find<T: Matchable>(sorted: &[T], s: &str) -> Option<T> {
    sorted
        .binary_search_by(|v| lexical_cmp(v.as_str(), s))
        .ok()
        .map(|index| sorted[index])
}

/// The result of [Matchable::from_string_with_neighbors].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors<T> {
    /// The greatest variant lexically less than the searched string.
    pub below: Option<T>,
    /// The variant whose display string equals the searched string.
    pub exact: Option<T>,
    /// The least variant lexically greater than the searched string.
    pub above: Option<T>,
}

pub(crate) fn neighbors<T: Matchable>(sorted: &[T], s: &str) -> Neighbors<T> {
    let start = sorted.partition_point(|v| lexical_cmp(v.as_str(), s) == Ordering::Less);
    let below = start.checked_sub(1).map(|i| sorted[i]);

    let (exact, above_index) = match sorted.get(start) {
        Some(v) if v.as_str() == s => (Some(*v), start + 1),
        _ => (None, start),
    };

    Neighbors {
        below,
        exact,
        above: sorted.get(above_index).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_before_punctuation() {
        assert_eq!(lexical_cmp("a", "_"), Ordering::Less);
        assert_eq!(lexical_cmp("Z", "1"), Ordering::Less);
        assert_eq!(lexical_cmp("1", "z"), Ordering::Greater);
    }

    #[test]
    fn same_class_by_byte() {
        assert_eq!(lexical_cmp("B", "a"), Ordering::Less);
        assert_eq!(lexical_cmp("(", ")"), Ordering::Less);
        assert_eq!(lexical_cmp("Days", "Days"), Ordering::Equal);
    }

    #[test]
    fn prefix_is_less() {
        assert_eq!(lexical_cmp("Day", "Days"), Ordering::Less);
        assert_eq!(lexical_cmp("Days", "Day"), Ordering::Greater);
        assert_eq!(lexical_cmp("", "x"), Ordering::Less);
    }

    #[test]
    fn differs_from_byte_order() {
        // ' ' < 'a' as bytes, but the letter wins here
        assert_eq!("ab".cmp("a b"), Ordering::Greater);
        assert_eq!(lexical_cmp("ab", "a b"), Ordering::Less);
    }
}
