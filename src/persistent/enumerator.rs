//! In-order cursor over a [`Tree`].

use std::iter::FusedIterator;

use super::tree::{Node, Tree};

/// The remaining entries of an in-order traversal.
///
/// Each stacked node stands for "this node's entry, then its right subtree,
/// then everything below it on the stack". The stack is unfolded on demand by
/// descending along left children, so at most one root-to-leaf path is held
/// at a time.
///
/// # Examples
///
/// ```rust
/// use lambda_rt::persistent::{Enumerator, NaturalOrder, Tree};
///
/// let tree = Tree::empty()
///     .add(2, 'b', &NaturalOrder)
///     .add(1, 'a', &NaturalOrder);
///
/// let entries: Vec<(&i32, &char)> = Enumerator::new(&tree).collect();
/// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b')]);
/// ```
pub struct Enumerator<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Enumerator<'a, K, V> {
    /// Creates an enumerator positioned before the smallest key of `tree`.
    pub fn new(tree: &'a Tree<K, V>) -> Self {
        let mut enumerator = Self { stack: Vec::new() };
        enumerator.descend(tree);
        enumerator
    }

    /// Returns `true` once every entry has been yielded.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.stack.is_empty()
    }

    fn descend(&mut self, mut tree: &'a Tree<K, V>) {
        while let Tree::Node(node) = tree {
            self.stack.push(&**node);
            tree = node.left();
        }
    }
}

impl<'a, K, V> Iterator for Enumerator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend(node.right());
        Some((node.key(), node.value()))
    }
}

impl<K, V> FusedIterator for Enumerator<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::NaturalOrder;
    use rstest::rstest;

    #[rstest]
    fn test_enumerator_on_empty_tree_is_at_end() {
        let tree: Tree<i32, i32> = Tree::empty();
        let mut enumerator = Enumerator::new(&tree);
        assert!(enumerator.is_end());
        assert_eq!(enumerator.next(), None);
    }

    #[rstest]
    fn test_enumerator_yields_keys_in_order() {
        let tree = [5, 3, 8, 1, 4, 9, 7]
            .into_iter()
            .fold(Tree::empty(), |tree, key| tree.add(key, key * 10, &NaturalOrder));

        let keys: Vec<i32> = Enumerator::new(&tree).map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
    }

    #[rstest]
    fn test_enumerator_holds_only_a_path() {
        let tree = (0..100).fold(Tree::empty(), |tree, key| tree.add(key, (), &NaturalOrder));
        let mut enumerator = Enumerator::new(&tree);
        assert!(enumerator.stack.len() <= tree.height());
        enumerator.next();
        assert!(enumerator.stack.len() <= tree.height());
    }
}
