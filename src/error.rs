//! Errors raised by runtime values.

use thiserror::Error;

#[cfg(feature = "control")]
use crate::control::LazyUndefinedError;
#[cfg(feature = "persistent")]
use crate::persistent::NotFound;
#[cfg(feature = "recursive")]
use crate::recursive::UndefinedRecursiveModule;
#[cfg(feature = "stream")]
use crate::stream::StreamError;

/// Any failure a runtime function or lazy value can produce.
///
/// Each variant wraps the error type of the component that raised it and
/// displays as that error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    /// A lookup found no binding.
    #[cfg(feature = "persistent")]
    #[error(transparent)]
    NotFound(#[from] NotFound),

    /// A stream had no element left, or unexpectedly had one.
    #[cfg(feature = "stream")]
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A recursive binding was used before being patched.
    #[cfg(feature = "recursive")]
    #[error(transparent)]
    UndefinedRecursiveModule(#[from] UndefinedRecursiveModule),

    /// A lazy value was forced during its own evaluation.
    #[cfg(feature = "control")]
    #[error(transparent)]
    LazyUndefined(#[from] LazyUndefinedError),

    /// A failure raised by program code.
    #[error("{0}")]
    Failure(String),
}

impl RuntimeError {
    /// Creates an error carrying a program-defined message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}
