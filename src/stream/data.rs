//! Stream node representation and resolution.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use super::generator::Generator;
use crate::control::Lazy;

/// A shared handle to a stream node.
pub(crate) type Link<T> = Rc<StreamData<T>>;

/// The deferred computation of a `Lazy` node.
pub(crate) type Thunk<T> = Box<dyn FnOnce() -> Link<T>>;

/// A node of a stream's structure.
///
/// `Empty` and `Cons` are resolved forms. The other three variants describe
/// work still to be done and are rewritten into resolved forms by
/// [`resolve`] or by the cursor operations.
pub(crate) enum StreamData<T> {
    Empty,
    Cons(T, Link<T>),
    Append(Link<T>, Link<T>),
    Lazy(Lazy<Link<T>, Thunk<T>>),
    Generator(RefCell<Generator<T>>),
}

impl<T> StreamData<T> {
    pub(crate) fn empty() -> Link<T> {
        Rc::new(Self::Empty)
    }

    pub(crate) fn cons(head: T, tail: Link<T>) -> Link<T> {
        Rc::new(Self::Cons(head, tail))
    }

    pub(crate) fn append(left: Link<T>, right: Link<T>) -> Link<T> {
        Rc::new(Self::Append(left, right))
    }

    pub(crate) fn lazy(thunk: Thunk<T>) -> Link<T> {
        Rc::new(Self::Lazy(Lazy::new(thunk)))
    }

    pub(crate) fn generator(produce: Box<dyn FnMut(usize) -> Option<T>>) -> Link<T> {
        Rc::new(Self::Generator(RefCell::new(Generator::new(produce))))
    }

    /// Returns whether the node is `Empty` or `Cons`.
    pub(crate) const fn is_resolved(&self) -> bool {
        matches!(self, Self::Empty | Self::Cons(..))
    }
}

impl<T> Drop for StreamData<T> {
    // Long chains are unlinked with an explicit work list; nodes still
    // shared with another stream are left to their other owners.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach(self, &mut pending);
        while let Some(link) = pending.pop() {
            if let Some(mut node) = Rc::into_inner(link) {
                detach(&mut node, &mut pending);
            }
        }
    }
}

/// Moves the child links of `node` onto `pending`, leaving `Empty` in place.
fn detach<T>(node: &mut StreamData<T>, pending: &mut Vec<Link<T>>) {
    match node {
        StreamData::Cons(_, tail) => pending.push(mem::replace(tail, StreamData::empty())),
        StreamData::Append(left, right) => {
            pending.push(mem::replace(left, StreamData::empty()));
            pending.push(mem::replace(right, StreamData::empty()));
        }
        StreamData::Lazy(cell) => {
            if let Some(forced) = cell.get_mut() {
                pending.push(mem::replace(forced, StreamData::empty()));
            }
        }
        StreamData::Empty | StreamData::Generator(_) => {}
    }
}

/// Rewrites `data` into `Empty` or `Cons`.
///
/// `count` is the number of elements the owning cursor has consumed; it is
/// passed to a generator that has nothing looked ahead.
///
/// * `Append(a, b)` resolves `a`; an empty left side continues with `b`, a
///   `Cons(h, t)` yields `Cons(h, Append(t, b))`.
/// * `Lazy` is forced (at most once) and its result is resolved.
/// * A generator yields `Cons(x, same generator)` so that the remaining
///   elements keep coming from the same producer.
///
/// # Panics
///
/// Panics if the left operand of an append resolves to anything other than
/// `Empty` or `Cons`, or if a lazy node is forced during its own evaluation.
pub(crate) fn resolve<T: Clone>(count: usize, data: &Link<T>) -> Link<T> {
    let mut current = Rc::clone(data);
    loop {
        if current.is_resolved() {
            return current;
        }
        let next = match &*current {
            StreamData::Append(left, right) => {
                let resolved = resolve(count, left);
                match &*resolved {
                    StreamData::Empty => Rc::clone(right),
                    StreamData::Cons(head, tail) => {
                        return StreamData::cons(
                            head.clone(),
                            StreamData::append(Rc::clone(tail), Rc::clone(right)),
                        );
                    }
                    _ => panic!("Stream.get_data: append operand did not resolve"),
                }
            }
            StreamData::Lazy(cell) => Rc::clone(&cell.force()),
            StreamData::Generator(generator) => {
                let produced = generator.borrow_mut().take_next(count);
                return match produced {
                    Some(value) => StreamData::cons(value, Rc::clone(&current)),
                    None => StreamData::empty(),
                };
            }
            StreamData::Empty | StreamData::Cons(..) => unreachable!(),
        };
        current = next;
    }
}

impl<T: fmt::Debug> fmt::Debug for StreamData<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("Empty"),
            Self::Cons(head, tail) => formatter.debug_tuple("Cons").field(head).field(tail).finish(),
            Self::Append(left, right) => formatter
                .debug_tuple("Append")
                .field(left)
                .field(right)
                .finish(),
            Self::Lazy(cell) => match cell.get() {
                Some(forced) => formatter.debug_tuple("Lazy").field(&*forced).finish(),
                None => formatter.write_str("Lazy"),
            },
            Self::Generator(_) => formatter.write_str("Generator"),
        }
    }
}
