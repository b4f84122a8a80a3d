//! Control structures for deferred evaluation.
//!
//! - [`Lazy`]: a memoized suspended computation, forced at most once
//!
//! # Examples
//!
//! ```rust
//! use lambda_rt::control::Lazy;
//!
//! let lazy = Lazy::new(|| 6 * 7);
//! assert!(!lazy.is_forced());
//! assert_eq!(*lazy.force(), 42);
//! ```

mod lazy;

pub use lazy::{Lazy, LazyState, LazyUndefinedError};
