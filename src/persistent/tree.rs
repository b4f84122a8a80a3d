//! Height-balanced persistent binary search tree.
//!
//! This module provides [`Tree`], the node structure behind
//! [`OrderedMap`](super::OrderedMap). Every operation takes the key order
//! explicitly as a [`Comparator`], so one node type serves maps over any
//! ordering.
//!
//! # Invariants
//!
//! 1. The in-order key sequence is strictly increasing under the comparator
//!    the tree was built with.
//! 2. `height(node) = 1 + max(height(left), height(right))`, and an empty
//!    tree has height 0.
//! 3. At every node the heights of the two subtrees differ by at most 2.
//!
//! The balance bound is 2, not the classical AVL bound of 1. It decides which
//! rotations fire and therefore which insertions can reuse existing nodes.
//!
//! # Complexity
//!
//! | Operation  | Complexity |
//! |------------|------------|
//! | `add`      | O(log N)   |
//! | `find`     | O(log N)   |
//! | `cardinal` | O(N)       |
//! | `compare`  | O(N)       |
//! | `equal`    | O(N)       |

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use super::ReferenceCounter;
use super::comparator::Comparator;
use super::enumerator::Enumerator;

/// Error returned when a lookup finds no binding for the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("key not found")]
pub struct NotFound;

// =============================================================================
// Node Definition
// =============================================================================

/// A binding together with its two subtrees.
///
/// Nodes are immutable once constructed.
pub struct Node<K, V> {
    left: Tree<K, V>,
    key: K,
    value: V,
    right: Tree<K, V>,
    height: usize,
}

impl<K, V> Node<K, V> {
    /// Returns the subtree of smaller keys.
    #[inline]
    pub const fn left(&self) -> &Tree<K, V> {
        &self.left
    }

    /// Returns the key bound at this node.
    #[inline]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value bound at this node.
    #[inline]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the subtree of greater keys.
    #[inline]
    pub const fn right(&self) -> &Tree<K, V> {
        &self.right
    }

    /// Returns the height of the subtree rooted at this node.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }
}

// =============================================================================
// Tree Definition
// =============================================================================

/// A persistent height-balanced binary search tree.
///
/// Cloning a tree clones a handle; the nodes themselves are shared.
///
/// # Examples
///
/// ```rust
/// use lambda_rt::persistent::{NaturalOrder, Tree};
///
/// let tree = Tree::empty()
///     .add(1, "one", &NaturalOrder)
///     .add(2, "two", &NaturalOrder);
///
/// assert_eq!(tree.find(&2, &NaturalOrder), Ok(&"two"));
/// assert!(tree.find(&3, &NaturalOrder).is_err());
/// assert_eq!(tree.cardinal(), 2);
/// ```
pub enum Tree<K, V> {
    /// The empty tree.
    Empty,
    /// A shared, immutable node.
    Node(ReferenceCounter<Node<K, V>>),
}

impl<K, V> Tree<K, V> {
    /// Returns the empty tree.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self::Empty
    }

    /// Returns `true` if the tree has no bindings.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the height of the tree; 0 for the empty tree.
    #[inline]
    pub fn height(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Node(node) => node.height,
        }
    }

    /// Returns the root node, if any.
    #[inline]
    pub fn node(&self) -> Option<&Node<K, V>> {
        match self {
            Self::Empty => None,
            Self::Node(node) => Some(&**node),
        }
    }

    /// Returns `true` if both handles designate the same tree.
    ///
    /// Two empty trees are always the same tree.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Node(left), Self::Node(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns the number of bindings.
    ///
    /// # Complexity
    ///
    /// O(N): the count is not cached.
    pub fn cardinal(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Node(node) => node.left.cardinal() + 1 + node.right.cardinal(),
        }
    }

    /// Returns an in-order enumerator over the bindings.
    #[inline]
    pub fn enumerate(&self) -> Enumerator<'_, K, V> {
        Enumerator::new(self)
    }

    /// Returns the value bound to `key`.
    ///
    /// `key` may be any borrowed form of `K`; `comparator` must order the
    /// borrowed forms the same way it orders the keys.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no binding exists for `key`.
    pub fn find<Q, C>(&self, key: &Q, comparator: &C) -> Result<&V, NotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q> + ?Sized,
    {
        let mut current = self;
        loop {
            let Self::Node(node) = current else {
                return Err(NotFound);
            };
            current = match comparator.compare(key, node.key.borrow()) {
                Ordering::Equal => return Ok(&node.value),
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
            };
        }
    }

    /// Returns `true` if a binding exists for `key`.
    #[inline]
    pub fn contains<Q, C>(&self, key: &Q, comparator: &C) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q> + ?Sized,
    {
        self.find(key, comparator).is_ok()
    }

    /// Orders two trees by their in-order binding sequences.
    ///
    /// The enumerations are walked in lockstep. Keys are compared with
    /// `key_comparator`, then the paired values with `value_comparator`; the
    /// first non-equal result wins. A tree whose enumeration ends first is
    /// the smaller one.
    pub fn compare<C, F>(&self, other: &Self, key_comparator: &C, mut value_comparator: F) -> Ordering
    where
        C: Comparator<K> + ?Sized,
        F: FnMut(&V, &V) -> Ordering,
    {
        let mut left = self.enumerate();
        let mut right = other.enumerate();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some((left_key, left_value)), Some((right_key, right_value))) => {
                    let ordering = key_comparator
                        .compare(left_key, right_key)
                        .then_with(|| value_comparator(left_value, right_value));
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
            }
        }
    }

    /// Tests two trees for equal bindings.
    ///
    /// Keys must be equal as stored (`==`), values must satisfy `value_equal`,
    /// and both enumerations must have the same length.
    pub fn equal<F>(&self, other: &Self, mut value_equal: F) -> bool
    where
        K: PartialEq,
        F: FnMut(&V, &V) -> bool,
    {
        let mut left = self.enumerate();
        let mut right = other.enumerate();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some((left_key, left_value)), Some((right_key, right_value))) => {
                    if left_key != right_key || !value_equal(left_value, right_value) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl<K: Clone, V: Clone> Tree<K, V> {
    /// Builds a node over two subtrees whose heights are already compatible.
    #[must_use]
    pub fn create(left: Self, key: K, value: V, right: Self) -> Self {
        let height = left.height().max(right.height()) + 1;
        Self::Node(ReferenceCounter::new(Node {
            left,
            key,
            value,
            right,
            height,
        }))
    }

    /// Builds a node, rotating once or twice if one side is more than two
    /// levels taller than the other.
    ///
    /// The subtrees must each be balanced and differ in height by at most 3,
    /// which holds after a single insertion below a balanced node.
    ///
    /// # Panics
    ///
    /// Panics if a rotation needs a node where the tree is empty. That can
    /// only happen when the input subtrees violate the height invariant.
    #[must_use]
    pub fn bal(left: Self, key: K, value: V, right: Self) -> Self {
        let left_height = left.height();
        let right_height = right.height();

        if left_height > right_height + 2 {
            let Self::Node(left_node) = &left else {
                panic!("Map.bal: left-heavy tree has an empty left subtree");
            };
            if left_node.left.height() >= left_node.right.height() {
                Self::create(
                    left_node.left.clone(),
                    left_node.key.clone(),
                    left_node.value.clone(),
                    Self::create(left_node.right.clone(), key, value, right),
                )
            } else {
                let Self::Node(pivot) = &left_node.right else {
                    panic!("Map.bal: left-right rotation on an empty subtree");
                };
                Self::create(
                    Self::create(
                        left_node.left.clone(),
                        left_node.key.clone(),
                        left_node.value.clone(),
                        pivot.left.clone(),
                    ),
                    pivot.key.clone(),
                    pivot.value.clone(),
                    Self::create(pivot.right.clone(), key, value, right),
                )
            }
        } else if right_height > left_height + 2 {
            let Self::Node(right_node) = &right else {
                panic!("Map.bal: right-heavy tree has an empty right subtree");
            };
            if right_node.right.height() >= right_node.left.height() {
                Self::create(
                    Self::create(left, key, value, right_node.left.clone()),
                    right_node.key.clone(),
                    right_node.value.clone(),
                    right_node.right.clone(),
                )
            } else {
                let Self::Node(pivot) = &right_node.left else {
                    panic!("Map.bal: right-left rotation on an empty subtree");
                };
                Self::create(
                    Self::create(left, key, value, pivot.left.clone()),
                    pivot.key.clone(),
                    pivot.value.clone(),
                    Self::create(
                        pivot.right.clone(),
                        right_node.key.clone(),
                        right_node.value.clone(),
                        right_node.right.clone(),
                    ),
                )
            }
        } else {
            Self::Node(ReferenceCounter::new(Node {
                left,
                key,
                value,
                right,
                height: left_height.max(right_height) + 1,
            }))
        }
    }

    /// Returns a tree binding `key` to `value`, replacing any previous
    /// binding for `key`.
    ///
    /// When `key` is already bound to a value that `same_value` reports as
    /// identical to `value`, the original tree handle is returned and nothing
    /// is allocated. The same holds for every ancestor of an unchanged
    /// subtree, so `result.ptr_eq(self)` tells the caller that the insertion
    /// was a no-op.
    #[must_use]
    pub fn add_by<C, S>(&self, key: K, value: V, comparator: &C, same_value: &S) -> Self
    where
        C: Comparator<K> + ?Sized,
        S: Fn(&V, &V) -> bool + ?Sized,
    {
        let Self::Node(node) = self else {
            return Self::Node(ReferenceCounter::new(Node {
                left: Self::Empty,
                key,
                value,
                right: Self::Empty,
                height: 1,
            }));
        };

        match comparator.compare(&key, &node.key) {
            Ordering::Equal => {
                if same_value(&node.value, &value) {
                    self.clone()
                } else {
                    Self::Node(ReferenceCounter::new(Node {
                        left: node.left.clone(),
                        key,
                        value,
                        right: node.right.clone(),
                        height: node.height,
                    }))
                }
            }
            Ordering::Less => {
                let left = node.left.add_by(key, value, comparator, same_value);
                if left.ptr_eq(&node.left) {
                    self.clone()
                } else {
                    Self::bal(left, node.key.clone(), node.value.clone(), node.right.clone())
                }
            }
            Ordering::Greater => {
                let right = node.right.add_by(key, value, comparator, same_value);
                if right.ptr_eq(&node.right) {
                    self.clone()
                } else {
                    Self::bal(node.left.clone(), node.key.clone(), node.value.clone(), right)
                }
            }
        }
    }

    /// Returns a tree binding `key` to `value`, reusing the original tree
    /// when the binding is already present with an equal value.
    #[must_use]
    pub fn add<C>(&self, key: K, value: V, comparator: &C) -> Self
    where
        C: Comparator<K> + ?Sized,
        V: PartialEq,
    {
        self.add_by(key, value, comparator, &|stored: &V, inserted: &V| stored == inserted)
    }
}

impl<K, V> Clone for Tree<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Node(node) => Self::Node(ReferenceCounter::clone(node)),
        }
    }
}

impl<K, V> Default for Tree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::Empty
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("Empty"),
            Self::Node(node) => formatter
                .debug_struct("Node")
                .field("left", &node.left)
                .field("key", &node.key)
                .field("value", &node.value)
                .field("right", &node.right)
                .field("height", &node.height)
                .finish(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::NaturalOrder;
    use rstest::rstest;

    /// Checks the ordering, height and balance invariants and returns the
    /// number of bindings.
    fn check_invariants(tree: &Tree<i32, i32>, lower: Option<i32>, upper: Option<i32>) -> usize {
        let Tree::Node(node) = tree else {
            return 0;
        };
        if let Some(lower) = lower {
            assert!(node.key > lower);
        }
        if let Some(upper) = upper {
            assert!(node.key < upper);
        }
        let left_height = node.left.height();
        let right_height = node.right.height();
        assert_eq!(node.height, left_height.max(right_height) + 1);
        assert!(left_height.abs_diff(right_height) <= 2);
        check_invariants(&node.left, lower, Some(node.key))
            + 1
            + check_invariants(&node.right, Some(node.key), upper)
    }

    fn build(keys: impl IntoIterator<Item = i32>) -> Tree<i32, i32> {
        keys.into_iter()
            .fold(Tree::empty(), |tree, key| tree.add(key, key, &NaturalOrder))
    }

    fn leaf(key: i32) -> Tree<i32, i32> {
        Tree::create(Tree::empty(), key, key, Tree::empty())
    }

    #[rstest]
    fn test_empty_tree() {
        let tree: Tree<i32, i32> = Tree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.cardinal(), 0);
        assert_eq!(tree.find(&1, &NaturalOrder), Err(NotFound));
    }

    #[rstest]
    fn test_create_computes_height() {
        let tree = Tree::create(leaf(1), 2, 2, Tree::empty());
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.node().map(Node::key), Some(&2));
    }

    #[rstest]
    fn test_ascending_insertions_stay_balanced() {
        let tree = build(0..1000);
        assert_eq!(check_invariants(&tree, None, None), 1000);
    }

    #[rstest]
    fn test_descending_insertions_stay_balanced() {
        let tree = build((0..1000).rev());
        assert_eq!(check_invariants(&tree, None, None), 1000);
    }

    #[rstest]
    fn test_three_ascending_keys_do_not_rotate() {
        // Heights 0 and 2 differ by 2, which is within the bound.
        let tree = build([1, 2, 3]);
        let root = tree.node().unwrap();
        assert_eq!(root.key, 1);
        assert_eq!(tree.height(), 3);
    }

    #[rstest]
    fn test_fourth_ascending_key_rotates_left() {
        let tree = build([1, 2, 3, 4]);
        let root = tree.node().unwrap();
        assert_eq!(root.key, 2);
        assert_eq!(root.left.node().map(Node::key), Some(&1));
        assert_eq!(root.right.node().map(Node::key), Some(&3));
        assert_eq!(tree.height(), 3);
    }

    #[rstest]
    fn test_bal_single_right_rotation() {
        let left = Tree::create(Tree::create(leaf(1), 2, 2, Tree::empty()), 3, 3, Tree::empty());
        let tree = Tree::bal(left, 4, 4, Tree::empty());
        let root = tree.node().unwrap();
        assert_eq!(root.key, 3);
        assert_eq!(root.left.node().map(Node::key), Some(&2));
        assert_eq!(check_invariants(&tree, None, None), 4);
    }

    #[rstest]
    fn test_bal_left_right_double_rotation() {
        let left = Tree::create(Tree::empty(), 1, 1, Tree::create(leaf(2), 3, 3, Tree::empty()));
        let tree = Tree::bal(left, 4, 4, Tree::empty());
        let root = tree.node().unwrap();
        assert_eq!(root.key, 3);
        assert_eq!(check_invariants(&tree, None, None), 4);
    }

    #[rstest]
    fn test_bal_right_left_double_rotation() {
        let right = Tree::create(Tree::create(Tree::empty(), 2, 2, leaf(3)), 4, 4, Tree::empty());
        let tree = Tree::bal(Tree::empty(), 1, 1, right);
        let root = tree.node().unwrap();
        assert_eq!(root.key, 2);
        assert_eq!(check_invariants(&tree, None, None), 4);
    }

    #[rstest]
    fn test_add_identical_binding_returns_same_tree() {
        let tree = build([5, 2, 8, 1, 3]);
        let again = tree.add(3, 3, &NaturalOrder);
        assert!(again.ptr_eq(&tree));
    }

    #[rstest]
    fn test_add_new_value_shares_untouched_subtrees() {
        let tree = build([5, 2, 8, 1, 3]);
        let updated = tree.add(8, 80, &NaturalOrder);
        assert!(!updated.ptr_eq(&tree));
        let (old_root, new_root) = (tree.node().unwrap(), updated.node().unwrap());
        assert!(old_root.left.ptr_eq(&new_root.left));
        assert_eq!(updated.find(&8, &NaturalOrder), Ok(&80));
        assert_eq!(tree.find(&8, &NaturalOrder), Ok(&8));
    }

    #[rstest]
    fn test_add_by_uses_supplied_identity() {
        let tree = Tree::empty().add_by(1, 10, &NaturalOrder, &|_: &i32, _: &i32| false);
        let replaced = tree.add_by(1, 10, &NaturalOrder, &|_: &i32, _: &i32| false);
        assert!(!replaced.ptr_eq(&tree));
    }

    #[rstest]
    fn test_find_follows_search_path() {
        let tree = build(0..64);
        for key in 0..64 {
            assert_eq!(tree.find(&key, &NaturalOrder), Ok(&key));
        }
        assert_eq!(tree.find(&64, &NaturalOrder), Err(NotFound));
        assert!(!tree.contains(&-1, &NaturalOrder));
    }

    #[rstest]
    #[case(vec![1, 2, 3], vec![1, 2, 3], Ordering::Equal)]
    #[case(vec![1, 2], vec![1, 2, 3], Ordering::Less)]
    #[case(vec![1, 2, 3], vec![1, 2], Ordering::Greater)]
    #[case(vec![1, 4], vec![1, 3, 9], Ordering::Greater)]
    fn test_compare_by_keys(
        #[case] left: Vec<i32>,
        #[case] right: Vec<i32>,
        #[case] expected: Ordering,
    ) {
        let ordering = build(left).compare(&build(right), &NaturalOrder, i32::cmp);
        assert_eq!(ordering, expected);
    }

    #[rstest]
    fn test_compare_falls_back_to_values() {
        let left = Tree::empty().add(1, 'a', &NaturalOrder);
        let right = Tree::empty().add(1, 'b', &NaturalOrder);
        assert_eq!(left.compare(&right, &NaturalOrder, char::cmp), Ordering::Less);
    }

    #[rstest]
    fn test_equal_requires_same_length_and_bindings() {
        let tree = build([1, 2, 3]);
        assert!(tree.equal(&build([3, 1, 2]), |left, right| left == right));
        assert!(!tree.equal(&build([1, 2]), |left, right| left == right));
        assert!(!tree.equal(&tree.add(2, 20, &NaturalOrder), |left, right| left == right));
    }

    #[rstest]
    fn test_debug_shows_structure() {
        let tree = Tree::empty().add(1, "one", &NaturalOrder);
        assert_eq!(
            format!("{tree:?}"),
            "Node { left: Empty, key: 1, value: \"one\", right: Empty, height: 1 }"
        );
    }
}
