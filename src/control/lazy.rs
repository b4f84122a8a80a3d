//! Memoized suspended computations.
//!
//! This module provides the `Lazy<T, F>` cell used for deferred computation
//! throughout the runtime: lazily built stream nodes and lazy module
//! bindings. A `Lazy` runs its initializer at most once and caches the
//! produced value.
//!
//! # Examples
//!
//! ```rust
//! use lambda_rt::control::Lazy;
//! use std::cell::Cell;
//!
//! let calls = Cell::new(0);
//! let lazy = Lazy::new(|| {
//!     calls.set(calls.get() + 1);
//!     42
//! });
//!
//! assert_eq!(*lazy.force(), 42);
//! assert_eq!(*lazy.force(), 42);
//! assert_eq!(calls.get(), 1);
//! ```

use std::cell::{Ref, RefCell};
use std::fmt;

use thiserror::Error;

/// Error returned when a `Lazy` is forced while its own initializer is
/// still running, or after that initializer panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lazy value forced during its own evaluation")]
pub struct LazyUndefinedError;

/// The internal state of a `Lazy` value.
#[derive(Debug)]
pub enum LazyState<T, F> {
    /// The initializer has not run yet.
    Suspended(F),
    /// The initializer is running (or panicked while running).
    Forcing,
    /// The value has been computed.
    Forced(T),
}

/// A suspended computation that is evaluated at most once.
///
/// The interior borrow is released while the initializer runs, so an
/// initializer that reaches back into the same cell observes the
/// [`LazyState::Forcing`] state instead of a borrow conflict. That case is
/// reported by [`Lazy::try_force`] as [`LazyUndefinedError`].
///
/// # Thread Safety
///
/// This type is NOT thread-safe.
pub struct Lazy<T, F = fn() -> T> {
    state: RefCell<LazyState<T, F>>,
}

impl<T, F: FnOnce() -> T> Lazy<T, F> {
    /// Creates a suspended computation.
    ///
    /// The function will not be called until the cell is forced.
    #[inline]
    pub const fn new(initializer: F) -> Self {
        Self {
            state: RefCell::new(LazyState::Suspended(initializer)),
        }
    }

    /// Forces the computation and returns a reference to its value.
    ///
    /// # Panics
    ///
    /// Panics if the cell is forced from within its own initializer, or if
    /// a previous initializer run panicked.
    pub fn force(&self) -> Ref<'_, T> {
        match self.try_force() {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// Forces the computation, reporting re-entrant forcing as an error.
    ///
    /// # Errors
    ///
    /// Returns [`LazyUndefinedError`] if the initializer is already running
    /// further up the call stack or has panicked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambda_rt::control::Lazy;
    ///
    /// let lazy = Lazy::new(|| "ready");
    /// assert_eq!(*lazy.try_force().unwrap(), "ready");
    /// ```
    pub fn try_force(&self) -> Result<Ref<'_, T>, LazyUndefinedError> {
        let initializer = {
            let mut state = self.state.borrow_mut();
            match std::mem::replace(&mut *state, LazyState::Forcing) {
                LazyState::Forced(value) => {
                    *state = LazyState::Forced(value);
                    None
                }
                LazyState::Forcing => return Err(LazyUndefinedError),
                LazyState::Suspended(initializer) => Some(initializer),
            }
        };

        if let Some(initializer) = initializer {
            let value = initializer();
            *self.state.borrow_mut() = LazyState::Forced(value);
        }

        Ok(Ref::map(self.state.borrow(), |state| match state {
            LazyState::Forced(value) => value,
            _ => unreachable!("lazy cell left unforced after initialization"),
        }))
    }
}

impl<T> Lazy<T, fn() -> T> {
    /// Creates a cell that is already forced.
    #[inline]
    pub const fn new_forced(value: T) -> Self {
        Self::forced(value)
    }
}

impl<T, F> Lazy<T, F> {
    /// Creates a cell that is already forced, for any initializer type.
    ///
    /// Useful where the cell type names a boxed initializer that will never
    /// run.
    #[inline]
    pub const fn forced(value: T) -> Self {
        Self {
            state: RefCell::new(LazyState::Forced(value)),
        }
    }

    /// Returns the value if it has already been computed, without forcing.
    pub fn get(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.state.borrow(), |state| match state {
            LazyState::Forced(value) => Some(value),
            _ => None,
        })
        .ok()
    }

    /// Returns a mutable reference to the value if it has already been
    /// computed, without forcing.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self.state.get_mut() {
            LazyState::Forced(value) => Some(value),
            _ => None,
        }
    }

    /// Returns whether the value has been computed.
    #[inline]
    pub fn is_forced(&self) -> bool {
        matches!(&*self.state.borrow(), LazyState::Forced(_))
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Lazy<T, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            LazyState::Forced(value) => formatter.debug_tuple("Lazy").field(value).finish(),
            LazyState::Suspended(_) => formatter.debug_tuple("Lazy").field(&"<suspended>").finish(),
            LazyState::Forcing => formatter.debug_tuple("Lazy").field(&"<forcing>").finish(),
        }
    }
}
