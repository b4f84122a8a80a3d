//! Effectful element producers with a one-slot lookahead.

use std::fmt;

/// The lookahead slot of a [`Generator`].
///
/// The three states are kept distinct so that "nothing looked ahead yet"
/// can never be confused with "looked ahead and found the end".
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lookahead<T> {
    Vacant,
    Ready(T),
    Exhausted,
}

/// A producer function together with its lookahead slot.
///
/// `produce` receives the number of elements consumed from the stream so
/// far. It may have side effects; the lookahead guarantees it runs at most
/// once per logical element even when the element is peeked repeatedly.
pub(crate) struct Generator<T> {
    lookahead: Lookahead<T>,
    produce: Box<dyn FnMut(usize) -> Option<T>>,
}

impl<T> Generator<T> {
    pub(crate) fn new(produce: Box<dyn FnMut(usize) -> Option<T>>) -> Self {
        Self {
            lookahead: Lookahead::Vacant,
            produce,
        }
    }

    /// Takes the next element for resolution into a `Cons` cell.
    ///
    /// A looked-ahead element is handed over and the slot cleared. Otherwise
    /// the producer is called without caching a produced element; only the
    /// end of the sequence is remembered.
    pub(crate) fn take_next(&mut self, count: usize) -> Option<T> {
        match std::mem::replace(&mut self.lookahead, Lookahead::Vacant) {
            Lookahead::Ready(value) => Some(value),
            Lookahead::Exhausted => {
                self.lookahead = Lookahead::Exhausted;
                None
            }
            Lookahead::Vacant => {
                let produced = (self.produce)(count);
                if produced.is_none() {
                    self.lookahead = Lookahead::Exhausted;
                }
                produced
            }
        }
    }

    /// Clears a looked-ahead element, returning whether there was one.
    pub(crate) fn discard_lookahead(&mut self) -> bool {
        if matches!(self.lookahead, Lookahead::Ready(_)) {
            self.lookahead = Lookahead::Vacant;
            true
        } else {
            false
        }
    }
}

impl<T: Clone> Generator<T> {
    /// Returns the next element without consuming it, producing and caching
    /// it first if necessary.
    pub(crate) fn peek(&mut self, count: usize) -> Option<T> {
        match &self.lookahead {
            Lookahead::Ready(value) => Some(value.clone()),
            Lookahead::Exhausted => None,
            Lookahead::Vacant => {
                let produced = (self.produce)(count);
                self.lookahead = produced
                    .clone()
                    .map_or(Lookahead::Exhausted, Lookahead::Ready);
                produced
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Generator<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Generator")
            .field("lookahead", &self.lookahead)
            .finish_non_exhaustive()
    }
}
