#![cfg(feature = "stream")]
//! Property-based tests for Stream.
//!
//! These tests verify that every constructor yields its elements in order,
//! and that peeking never consumes.

use lambda_rt::stream::{Stream, StreamError};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

fn drain(stream: Stream<i32>) -> Vec<i32> {
    stream.into_iter().collect()
}

/// Builds a stream over `elements` from a lazy front half and a generated
/// back half.
fn mixed(elements: Vec<i32>) -> Stream<i32> {
    let middle = elements.len() / 2;
    let front = elements[..middle].to_vec();
    let mut back = elements[middle..].to_vec().into_iter();
    Stream::append(
        Stream::lazy_build(move || Stream::of_list(front)),
        Stream::from_fn(move |_| back.next()),
    )
}

proptest! {
    /// Law: of_list followed by next yields the list in order, then fails.
    #[test]
    fn prop_of_list_next_order(elements in prop::collection::vec(any::<i32>(), 0..50)) {
        let mut stream = Stream::of_list(elements.clone());
        for element in &elements {
            prop_assert_eq!(stream.next(), Ok(*element));
        }
        prop_assert_eq!(stream.next(), Err(StreamError::Exhausted));
        prop_assert_eq!(stream.count(), elements.len());
    }

    /// Law: append(a, b) drains as a ++ b.
    #[test]
    fn prop_append_order(
        left in prop::collection::vec(any::<i32>(), 0..20),
        right in prop::collection::vec(any::<i32>(), 0..20)
    ) {
        let expected: Vec<i32> = left.iter().chain(right.iter()).copied().collect();
        prop_assert_eq!(drain(Stream::append(Stream::of_list(left), Stream::of_list(right))), expected);
    }

    /// Law: peek is idempotent without an intervening consume.
    #[test]
    fn prop_peek_idempotent(elements in prop::collection::vec(any::<i32>(), 0..20), skip in 0..25usize) {
        let mut stream = mixed(elements);
        for _ in 0..skip {
            stream.junk();
        }
        let first = stream.peek();
        prop_assert_eq!(stream.peek(), first);
        let count = stream.count();
        prop_assert_eq!(stream.peek(), first);
        prop_assert_eq!(stream.count(), count);
    }

    /// Law: npeek does not change what is subsequently consumed.
    #[test]
    fn prop_npeek_is_read_only(elements in prop::collection::vec(any::<i32>(), 0..30), n in 0..40usize) {
        let mut stream = mixed(elements.clone());
        let peeked = stream.npeek(n);

        prop_assert_eq!(&peeked[..], &elements[..n.min(elements.len())]);
        prop_assert_eq!(stream.count(), 0);
        prop_assert_eq!(drain(stream), elements);
    }

    /// Law: a generator-backed stream yields what its producer returns.
    #[test]
    fn prop_from_fn_matches_producer(limit in 0..40usize) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let stream = Stream::from_fn(move |count| {
            counter.set(counter.get() + 1);
            (count < limit).then(|| i32::try_from(count).unwrap_or(i32::MAX))
        });

        let drained = drain(stream);
        prop_assert_eq!(drained.len(), limit);
        prop_assert_eq!(calls.get(), limit + 1);
    }

    /// Law: stream constructors agree with iterator collection.
    #[test]
    fn prop_mixed_stream_drains_elements(elements in prop::collection::vec(any::<i32>(), 0..40)) {
        prop_assert_eq!(drain(mixed(elements.clone())), elements.clone());
        prop_assert_eq!(drain(elements.iter().copied().collect()), elements);
    }
}
