//! Persistent ordered map with an owned key order.
//!
//! This module provides [`OrderedMap`], a [`Tree`] paired with the
//! [`Comparator`] it was built with, so callers do not have to thread the
//! order through every call.
//!
//! # Examples
//!
//! ```rust
//! use lambda_rt::persistent::{OrderedMap, ReverseOrder};
//!
//! let ascending: OrderedMap<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
//! assert_eq!(ascending.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
//!
//! let descending = OrderedMap::with_comparator(ReverseOrder)
//!     .insert(1, 'a')
//!     .insert(2, 'b');
//! assert_eq!(descending.keys().copied().collect::<Vec<_>>(), vec![2, 1]);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use super::comparator::{Comparator, NaturalOrder};
use super::enumerator::Enumerator;
use super::tree::{NotFound, Tree};

// =============================================================================
// OrderedMap Definition
// =============================================================================

/// A persistent (immutable) ordered map.
///
/// Every update returns a new map and leaves the original untouched. The
/// underlying nodes are shared between versions.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `find` / `get` | O(log N)   |
/// | `insert`       | O(log N)   |
/// | `cardinal`     | O(N)       |
/// | `compare_with` | O(N)       |
/// | `equal_with`   | O(N)       |
///
/// # Examples
///
/// ```rust
/// use lambda_rt::persistent::{NotFound, OrderedMap};
///
/// let map = OrderedMap::new()
///     .insert("b".to_string(), 2)
///     .insert("a".to_string(), 1);
///
/// assert_eq!(map.find(&"a".to_string()), Ok(&1));
/// assert_eq!(map.find(&"z".to_string()), Err(NotFound));
/// assert_eq!(map.cardinal(), 2);
/// ```
pub struct OrderedMap<K, V, C = NaturalOrder> {
    root: Tree<K, V>,
    comparator: C,
}

impl<K, V> OrderedMap<K, V, NaturalOrder> {
    /// Creates an empty map ordered by `K: Ord`.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Clone, V: Clone> OrderedMap<K, V, NaturalOrder>
where
    K: Ord,
{
    /// Creates a map containing a single binding.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert_by(key, value, |_, _| false)
    }
}

impl<K, V, C> OrderedMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            root: Tree::Empty,
            comparator,
        }
    }

    /// Returns the underlying tree.
    #[inline]
    pub const fn root(&self) -> &Tree<K, V> {
        &self.root
    }

    /// Returns the key order of this map.
    #[inline]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns `true` if the map contains no bindings.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the number of bindings.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[inline]
    pub fn cardinal(&self) -> usize {
        self.root.cardinal()
    }

    /// Returns `true` if both maps share the same root.
    ///
    /// An insertion that changes nothing returns a map for which this holds.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.root.ptr_eq(&other.root)
    }

    /// Returns an iterator over the bindings in key order.
    #[inline]
    pub fn iter(&self) -> Enumerator<'_, K, V> {
        self.root.enumerate()
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Tests two maps for equal bindings, comparing values with `value_equal`.
    ///
    /// Keys are compared with `==`.
    pub fn equal_with<F>(&self, other: &Self, value_equal: F) -> bool
    where
        K: PartialEq,
        F: FnMut(&V, &V) -> bool,
    {
        self.root.equal(&other.root, value_equal)
    }
}

impl<K, V, C: Comparator<K>> OrderedMap<K, V, C> {
    /// Returns the value bound to `key`.
    ///
    /// `key` may be any borrowed form of `K`, as with the standard maps.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if the map has no binding for `key`.
    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Result<&V, NotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.root.find(key, &self.comparator)
    }

    /// Returns the value bound to `key`, if any.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find(key).ok()
    }

    /// Returns `true` if the map has a binding for `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.root.contains(key, &self.comparator)
    }

    /// Orders two maps by their bindings in key order.
    ///
    /// Keys are compared with this map's comparator and values with
    /// `value_comparator`. A map that is a strict prefix of the other is the
    /// smaller one.
    pub fn compare_with<F>(&self, other: &Self, value_comparator: F) -> Ordering
    where
        F: FnMut(&V, &V) -> Ordering,
    {
        self.root.compare(&other.root, &self.comparator, value_comparator)
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Clone> OrderedMap<K, V, C> {
    /// Returns a map binding `key` to `value`.
    ///
    /// If `key` is already bound to an equal value, the returned map shares
    /// its root with `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambda_rt::persistent::OrderedMap;
    ///
    /// let map = OrderedMap::new().insert(1, "one");
    /// let updated = map.insert(1, "ONE");
    ///
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// assert_eq!(updated.get(&1), Some(&"ONE"));
    /// assert!(map.insert(1, "one").ptr_eq(&map));
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self
    where
        V: PartialEq,
    {
        self.insert_by(key, value, |stored, inserted| stored == inserted)
    }

    /// Returns a map binding `key` to `value`, deciding with `same_value`
    /// whether an existing binding already holds this value.
    #[must_use]
    pub fn insert_by<S>(&self, key: K, value: V, same_value: S) -> Self
    where
        S: Fn(&V, &V) -> bool,
    {
        Self {
            root: self
                .root
                .add_by(key, value, &self.comparator, &same_value),
            comparator: self.comparator.clone(),
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Clone> Clone for OrderedMap<K, V, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C: Default> Default for OrderedMap<K, V, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

/// Builds a map by inserting the pairs in order; a later pair replaces an
/// earlier one with the same key.
impl<K, V, C> FromIterator<(K, V)> for OrderedMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |map, (key, value)| {
                map.insert_by(key, value, |_, _| false)
            })
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Enumerator<'a, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrderedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.equal_with(other, |left, right| left == right)
    }
}

impl<K: Eq, V: Eq, C> Eq for OrderedMap<K, V, C> {}

impl<K: Eq, V: Ord, C: Comparator<K>> PartialOrd for OrderedMap<K, V, C> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Eq, V: Ord, C: Comparator<K>> Ord for OrderedMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_with(other, V::cmp)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrderedMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for OrderedMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

#[cfg(feature = "serde")]
struct OrderedMapVisitor<K, V, C> {
    marker: std::marker::PhantomData<fn() -> OrderedMap<K, V, C>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::de::Visitor<'de> for OrderedMapVisitor<K, V, C>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de> + Clone,
    C: Comparator<K> + Clone + Default,
{
    type Value = OrderedMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = OrderedMap::default();
        while let Some((key, value)) = access.next_entry()? {
            map = map.insert_by(key, value, |_, _| false);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::Deserialize<'de> for OrderedMap<K, V, C>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de> + Clone,
    C: Comparator<K> + Clone + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::ReverseOrder;
    use rstest::rstest;

    #[rstest]
    fn test_new_map_is_empty() {
        let map: OrderedMap<i32, i32> = OrderedMap::new();
        assert!(map.is_empty());
        assert_eq!(map.cardinal(), 0);
        assert_eq!(map.find(&1), Err(NotFound));
    }

    #[rstest]
    fn test_singleton() {
        let map = OrderedMap::singleton(1, '1');
        assert_eq!(map.cardinal(), 1);
        assert_eq!(map.get(&1), Some(&'1'));
    }

    #[rstest]
    fn test_from_iter_later_pair_wins() {
        let map: OrderedMap<i32, &str> = [(1, "a"), (2, "b"), (1, "c")].into_iter().collect();
        assert_eq!(map.cardinal(), 2);
        assert_eq!(map.get(&1), Some(&"c"));
    }

    #[rstest]
    fn test_reverse_order_iteration() {
        let map: OrderedMap<i32, i32, ReverseOrder> = (0..5).map(|key| (key, key)).collect();
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![4, 3, 2, 1, 0]);
        assert_eq!(map.find(&3), Ok(&3));
    }

    #[rstest]
    fn test_closure_comparator_map() {
        let map = OrderedMap::with_comparator(|left: &String, right: &String| {
            left.len().cmp(&right.len()).then_with(|| left.cmp(right))
        })
        .insert("ccc".to_string(), 3)
        .insert("a".to_string(), 1)
        .insert("bb".to_string(), 2);
        let values: Vec<i32> = map.values().copied().collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_insert_identical_binding_shares_root() {
        let map: OrderedMap<i32, i32> = (0..10).map(|key| (key, key)).collect();
        assert!(map.insert(4, 4).ptr_eq(&map));
        assert!(!map.insert(4, 40).ptr_eq(&map));
    }

    #[rstest]
    fn test_eq_and_ord() {
        let left: OrderedMap<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
        let right: OrderedMap<i32, i32> = [(2, 2), (1, 1)].into_iter().collect();
        let bigger: OrderedMap<i32, i32> = [(1, 1), (2, 3)].into_iter().collect();
        assert_eq!(left, right);
        assert_eq!(left.cmp(&right), Ordering::Equal);
        assert!(left < bigger);
        assert_ne!(left, bigger);
    }

    #[rstest]
    fn test_debug_lists_bindings_in_order() {
        let map: OrderedMap<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
        assert_eq!(format!("{map:?}"), r#"{1: "one", 2: "two"}"#);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_in_key_order() {
        let map: OrderedMap<String, i32> = [("c", 3), ("a", 1), ("b", 2)]
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"a":1,"b":2,"c":3}"#);
    }

    #[rstest]
    fn test_deserialize_overwrites_duplicate_keys() {
        let json = r#"{"key":1,"key":2}"#;
        let map: OrderedMap<String, i32> = serde_json::from_str(json).unwrap();
        assert_eq!(map.cardinal(), 1);
        assert_eq!(map.get(&"key".to_string()), Some(&2));
    }
}
