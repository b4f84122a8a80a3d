//! # lambda-rt
//!
//! Runtime support for programs compiled from a strict, value-oriented
//! functional language onto a host without native persistent data
//! structures, laziness or recursive module bindings.
//!
//! ## Overview
//!
//! - **Control**: a memoizing [`Lazy`](control::Lazy) cell
//! - **Persistent Data Structures**: a height-balanced ordered map with
//!   structural sharing and caller-supplied key orders
//! - **Streams**: pull-based lazy streams built from lists, concatenations,
//!   thunks and generators
//! - **Recursive Modules**: placeholder construction and in-place patching for
//!   mutually recursive bindings
//!
//! ## Feature Flags
//!
//! - `control`: the `Lazy` cell
//! - `persistent`: `Tree`, `OrderedMap` and comparators
//! - `stream`: `Stream` (requires `control`)
//! - `recursive`: the recursive-binding resolver (requires `control` and
//!   `persistent`)
//! - `arc`: share map nodes with `Arc` so maps can cross threads
//! - `serde`: `Serialize` / `Deserialize` for `OrderedMap`
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use lambda_rt::prelude::*;
//!
//! let map: OrderedMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
//! let mut stream = Stream::of_list(map.values().copied().collect::<Vec<_>>());
//!
//! assert_eq!(stream.next(), Ok(1));
//! assert_eq!(stream.next(), Ok(2));
//! assert_eq!(stream.empty(), Ok(()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the public items of every enabled module.
///
/// # Usage
///
/// ```rust
/// use lambda_rt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::RuntimeError;

    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;

    #[cfg(feature = "stream")]
    pub use crate::stream::*;

    #[cfg(feature = "recursive")]
    pub use crate::recursive::*;
}

pub mod error;

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "persistent")]
pub mod persistent;

#[cfg(feature = "stream")]
pub mod stream;

#[cfg(feature = "recursive")]
pub mod recursive;

pub use error::RuntimeError;
