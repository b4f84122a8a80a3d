//! Pull-based lazy streams.
//!
//! A [`Stream`] is a consuming cursor over a shared, lazily resolved node
//! structure. Elements come from eager lists, concatenations, memoized thunks
//! or effectful generators, and are materialized only when the cursor peeks
//! at them.
//!
//! # Examples
//!
//! ```rust
//! use lambda_rt::stream::Stream;
//!
//! let mut stream = Stream::append(Stream::of_list([1, 2]), Stream::lazy_singleton(|| 3));
//!
//! assert_eq!(stream.peek(), Some(1));
//! assert_eq!(stream.npeek(2), vec![1, 2]);
//! assert_eq!(stream.next(), Ok(1));
//! assert_eq!(stream.into_iter().collect::<Vec<_>>(), vec![2, 3]);
//! ```
//!
//! # Thread Safety
//!
//! Streams share their nodes through `Rc` and are neither `Send` nor `Sync`.

mod data;
mod generator;

use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;

use thiserror::Error;

use data::{Link, StreamData};

/// The failure conditions of stream consumption.
///
/// `Exhausted` and `NotEmpty` come from the cursor itself. `Parse` is the
/// channel for parsers written over streams: the element sequence was
/// readable, but not in the expected form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum StreamError {
    /// An element was requested from a stream with no elements left.
    #[error("stream failure: no element left")]
    Exhausted,
    /// A stream was asserted empty while it still had elements.
    #[error("stream failure: stream is not empty")]
    NotEmpty,
    /// A stream parser rejected the upcoming elements.
    #[error("stream error: {0}")]
    Parse(String),
}

impl StreamError {
    /// Creates a [`StreamError::Parse`] error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// A consuming cursor over a lazily resolved sequence.
///
/// The cursor owns a consumed-element `count` and a handle to the current
/// node. Every other part of the structure may be shared with other streams:
/// resolution never mutates a node except to memoize a thunk or a
/// generator's lookahead.
pub struct Stream<T> {
    count: usize,
    data: Link<T>,
}

static_assertions::assert_not_impl_any!(Stream<i32>: Send, Sync);

impl<T> Stream<T> {
    const fn from_data(data: Link<T>) -> Self {
        Self { count: 0, data }
    }

    /// Creates a stream with no elements.
    pub fn empty_stream() -> Self {
        Self::from_data(StreamData::empty())
    }

    /// Creates a stream over the given elements, in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambda_rt::stream::Stream;
    ///
    /// let mut stream = Stream::of_list(vec!["a", "b"]);
    /// assert_eq!(stream.next(), Ok("a"));
    /// ```
    pub fn of_list<I: IntoIterator<Item = T>>(elements: I) -> Self {
        let elements: Vec<T> = elements.into_iter().collect();
        let data = elements
            .into_iter()
            .rev()
            .fold(StreamData::empty(), |rest, element| StreamData::cons(element, rest));
        Self::from_data(data)
    }

    /// Creates a stream of one element.
    pub fn singleton(element: T) -> Self {
        Self::from_data(StreamData::cons(element, StreamData::empty()))
    }

    /// Prepends `element` to the current contents of `rest`.
    pub fn cons(element: T, rest: Self) -> Self {
        Self::from_data(StreamData::cons(element, rest.data))
    }

    /// Concatenates the current contents of two streams.
    pub fn append(left: Self, right: Self) -> Self {
        Self::from_data(StreamData::append(left.data, right.data))
    }

    /// Returns the number of elements consumed through this cursor.
    #[inline]
    pub const fn count(&self) -> usize {
        self.count
    }
}

impl<T: 'static> Stream<T> {
    /// Creates a stream whose elements are produced on demand.
    ///
    /// `produce` receives the number of elements consumed so far and returns
    /// `None` once the sequence ends; it is not called again after that.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambda_rt::stream::Stream;
    ///
    /// let squares = Stream::from_fn(|index| (index < 4).then(|| index * index));
    /// assert_eq!(squares.into_iter().collect::<Vec<_>>(), vec![0, 1, 4, 9]);
    /// ```
    pub fn from_fn<F>(produce: F) -> Self
    where
        F: FnMut(usize) -> Option<T> + 'static,
    {
        Self::from_data(StreamData::generator(Box::new(produce)))
    }

    /// Concatenates the stream built by `build` with `rest`, calling `build`
    /// only when the combined stream is first resolved.
    pub fn lazy_append<F>(build: F, rest: Self) -> Self
    where
        F: FnOnce() -> Self + 'static,
    {
        let rest = rest.data;
        Self::from_data(StreamData::lazy(Box::new(move || {
            StreamData::append(build().data, rest)
        })))
    }

    /// Prepends the element computed by `element` to `rest`, deferring the
    /// computation.
    pub fn lazy_cons<F>(element: F, rest: Self) -> Self
    where
        F: FnOnce() -> T + 'static,
    {
        let rest = rest.data;
        Self::from_data(StreamData::lazy(Box::new(move || {
            StreamData::cons(element(), rest)
        })))
    }

    /// Creates a one-element stream whose element is computed on demand.
    pub fn lazy_singleton<F>(element: F) -> Self
    where
        F: FnOnce() -> T + 'static,
    {
        Self::from_data(StreamData::lazy(Box::new(move || {
            StreamData::cons(element(), StreamData::empty())
        })))
    }

    /// Defers building a whole stream until it is first resolved.
    pub fn lazy_build<F>(build: F) -> Self
    where
        F: FnOnce() -> Self + 'static,
    {
        Self::from_data(StreamData::lazy(Box::new(move || build().data)))
    }
}

impl Stream<char> {
    /// Creates a stream over the characters of `text`.
    pub fn of_text(text: &str) -> Self {
        let characters: Vec<char> = text.chars().collect();
        let mut position = 0;
        Self::from_fn(move |_| {
            let character = characters.get(position).copied()?;
            position += 1;
            Some(character)
        })
    }
}

impl Stream<u8> {
    /// Creates a stream over a byte buffer.
    pub fn of_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let mut position = 0;
        Self::from_fn(move |_| {
            let byte = bytes.get(position).copied()?;
            position += 1;
            Some(byte)
        })
    }
}

impl<T: Clone> Stream<T> {
    /// Returns the next element without consuming it.
    ///
    /// Repeated peeks without an intervening [`junk`](Self::junk) return the
    /// same element and run a generator at most once.
    pub fn peek(&mut self) -> Option<T> {
        loop {
            let replacement = match &*self.data {
                StreamData::Empty => return None,
                StreamData::Cons(head, _) => return Some(head.clone()),
                StreamData::Append(..) => data::resolve(self.count, &self.data),
                StreamData::Lazy(cell) => Rc::clone(&cell.force()),
                StreamData::Generator(generator) => {
                    return generator.borrow_mut().peek(self.count);
                }
            };
            self.data = replacement;
        }
    }

    /// Discards the next element, if any.
    pub fn junk(&mut self) {
        loop {
            if let StreamData::Cons(_, tail) = &*self.data {
                self.data = Rc::clone(tail);
                self.count += 1;
                return;
            }
            if let StreamData::Generator(generator) = &*self.data
                && generator.borrow_mut().discard_lookahead()
            {
                self.count += 1;
                return;
            }
            if self.peek().is_none() {
                return;
            }
        }
    }

    /// Consumes and returns the next element.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Exhausted`] if the stream has no elements left.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<T, StreamError> {
        let element = self.peek().ok_or(StreamError::Exhausted)?;
        self.junk();
        Ok(element)
    }

    /// Asserts that the stream has no elements left.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::NotEmpty`] if an element remains.
    pub fn empty(&mut self) -> Result<(), StreamError> {
        match self.peek() {
            Some(_) => Err(StreamError::NotEmpty),
            None => Ok(()),
        }
    }

    /// Returns up to `n` upcoming elements without consuming them.
    ///
    /// The elements are materialized into the cursor's data, so later reads
    /// see the same values without re-running generators or thunks.
    pub fn npeek(&mut self, n: usize) -> Vec<T> {
        let mut elements = Vec::new();
        while elements.len() < n {
            let Some(element) = self.peek() else {
                break;
            };
            self.junk();
            elements.push(element);
        }
        self.count -= elements.len();
        self.data = elements
            .iter()
            .rev()
            .fold(Rc::clone(&self.data), |rest, element| {
                StreamData::cons(element.clone(), rest)
            });
        elements
    }

    /// Consumes every remaining element, applying `f` to each in order.
    #[allow(clippy::iter_not_returning_iterator)]
    pub fn iter<F: FnMut(T)>(&mut self, mut f: F) {
        while let Some(element) = self.peek() {
            self.junk();
            f(element);
        }
    }
}

impl<T> Default for Stream<T> {
    fn default() -> Self {
        Self::empty_stream()
    }
}

impl<T> FromIterator<T> for Stream<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::of_list(iter)
    }
}

impl<T: fmt::Debug> fmt::Debug for Stream<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Stream")
            .field("count", &self.count)
            .field("data", &self.data)
            .finish()
    }
}

/// An owning iterator that drains a [`Stream`].
pub struct StreamIntoIterator<T> {
    stream: Stream<T>,
}

impl<T> StreamIntoIterator<T> {
    /// Returns the underlying stream with the elements not yet yielded.
    pub fn into_stream(self) -> Stream<T> {
        self.stream
    }
}

impl<T: Clone> Iterator for StreamIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.stream.next().ok()
    }
}

impl<T: Clone> FusedIterator for StreamIntoIterator<T> {}

impl<T: Clone> IntoIterator for Stream<T> {
    type Item = T;
    type IntoIter = StreamIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        StreamIntoIterator { stream: self }
    }
}
