//! Key orderings supplied by callers.

use std::cmp::Ordering;

/// A total order over keys.
///
/// The map navigates exclusively through this trait, so the order must be
/// antisymmetric, transitive and consistent for the lifetime of a tree.
/// Any `Fn(&K, &K) -> Ordering` closure is a comparator.
///
/// # Examples
///
/// ```rust
/// use lambda_rt::persistent::{Comparator, NaturalOrder, ReverseOrder};
/// use std::cmp::Ordering;
///
/// assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
/// assert_eq!(ReverseOrder.compare(&1, &2), Ordering::Greater);
///
/// let by_last_digit = |left: &i32, right: &i32| (left % 10).cmp(&(right % 10));
/// assert_eq!(by_last_digit.compare(&19, &21), Ordering::Greater);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

/// The order given by `K: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// The reverse of the order given by `K: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<K: Ord + ?Sized> Comparator<K> for ReverseOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        right.cmp(left)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 2, Ordering::Less)]
    #[case(2, 2, Ordering::Equal)]
    #[case(3, 2, Ordering::Greater)]
    fn test_natural_order(#[case] left: i32, #[case] right: i32, #[case] expected: Ordering) {
        assert_eq!(NaturalOrder.compare(&left, &right), expected);
        assert_eq!(ReverseOrder.compare(&left, &right), expected.reverse());
    }

    #[rstest]
    fn test_closure_comparator_on_strings() {
        let comparator = |left: &String, right: &String| left.cmp(right);
        assert_eq!(
            comparator.compare(&"10".to_string(), &"9".to_string()),
            Ordering::Less
        );
    }
}
