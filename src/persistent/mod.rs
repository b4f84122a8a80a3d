//! Persistent (immutable) ordered maps.
//!
//! This module provides a height-balanced binary search tree whose nodes are
//! never mutated after construction:
//!
//! - [`Tree`]: the raw node structure with explicit-comparator operations
//! - [`OrderedMap`]: a typed wrapper that owns its [`Comparator`]
//! - [`Enumerator`]: an in-order cursor used for ordered comparison
//!
//! # Structural Sharing
//!
//! Every update returns a new tree. Subtrees untouched by the update are
//! shared by reference with the input tree, and an update that changes
//! nothing returns the input handle itself.
//!
//! # Examples
//!
//! ```rust
//! use lambda_rt::persistent::OrderedMap;
//!
//! let map = OrderedMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Re-inserting an identical binding reuses the existing tree
//! let same = map.insert(2, "two");
//! assert!(same.ptr_eq(&map));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type for tree nodes.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`, so trees can
/// be shared between threads. Otherwise it is `std::rc::Rc`.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod comparator;
mod enumerator;
mod ordered_map;
mod tree;

pub use comparator::{Comparator, NaturalOrder, ReverseOrder};
pub use enumerator::Enumerator;
pub use ordered_map::OrderedMap;
pub use tree::{Node, NotFound, Tree};

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Tree<i32, String>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(OrderedMap<String, i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_clone_shares_allocation() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        let reference_counter_clone = reference_counter.clone();
        assert!(ReferenceCounter::ptr_eq(
            &reference_counter,
            &reference_counter_clone
        ));
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
    }
}
