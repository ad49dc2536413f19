//! Context error handling with error trails
//!
//! Provides [`ContextError`], a wrapper that accumulates context messages as
//! an error propagates out of a stream or fold run. A failure deep inside a
//! producer pull surfaces with a trail showing which stages it crossed.
//!
//! # Examples
//!
//! ```
//! use freshet::ContextError;
//!
//! let err = ContextError::new("disk full")
//!     .context("writing page")
//!     .context("folding page stream");
//!
//! assert_eq!(err.inner(), &"disk full");
//! assert_eq!(err.context_trail().len(), 2);
//! ```
//!
//! ## With Eff
//!
//! ```
//! use freshet::{Eff, EffContext};
//!
//! # tokio_test::block_on(async {
//! let eff = Eff::<i32, _>::fail("disk full")
//!     .context("writing page")
//!     .context("folding page stream");
//!
//! let err = eff.run().await.unwrap_err();
//! assert_eq!(err.inner(), &"disk full");
//! assert_eq!(err.context_trail().len(), 2);
//! # });
//! ```

use std::error::Error as StdError;
use std::fmt;

/// An error wrapper that accumulates context as it propagates
///
/// `ContextError<E>` wraps an underlying error of type `E` and maintains a
/// trail of messages describing what was being attempted when the error
/// occurred, ordered inner to outer.
///
/// # Examples
///
/// ```
/// use freshet::ContextError;
///
/// let err = ContextError::new("connection refused")
///     .context("pulling next batch")
///     .context("running report fold");
///
/// println!("{}", err);
/// // Error: connection refused
/// //   -> pulling next batch
/// //   -> running report fold
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextError<E> {
    error: E,
    context: Vec<String>,
}

impl<E> ContextError<E> {
    /// Wrap an error with an empty context trail
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::ContextError;
    ///
    /// let err = ContextError::new("base error");
    /// assert_eq!(err.inner(), &"base error");
    /// assert_eq!(err.context_trail(), &[] as &[String]);
    /// ```
    pub fn new(error: E) -> Self {
        ContextError {
            error,
            context: Vec::new(),
        }
    }

    /// Append a context message to the trail
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::ContextError;
    ///
    /// let err = ContextError::new("parse error")
    ///     .context("decoding record")
    ///     .context("chunking input");
    ///
    /// assert_eq!(err.context_trail(), &["decoding record", "chunking input"]);
    /// ```
    pub fn context(mut self, msg: impl Into<String>) -> Self {
        self.context.push(msg.into());
        self
    }

    /// The underlying error
    pub fn inner(&self) -> &E {
        &self.error
    }

    /// Consume the wrapper, returning the underlying error
    pub fn into_inner(self) -> E {
        self.error
    }

    /// All context messages, in the order they were added
    pub fn context_trail(&self) -> &[String] {
        &self.context
    }
}

impl<E: fmt::Display> fmt::Display for ContextError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;
        for ctx in &self.context {
            write!(f, "\n  -> {}", ctx)?;
        }
        Ok(())
    }
}

impl<E: StdError + 'static> StdError for ContextError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}
