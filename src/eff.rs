//! Deferred computation type underlying producers and folds
//!
//! This module provides the [`Eff`] type, a lazy, composable computation that
//! may suspend and may fail. Everything in this crate - pulling a stream step,
//! starting or finishing a fold, opening or closing a resource - is described
//! as an `Eff` value and nothing happens until [`Eff::run`] is awaited.
//!
//! # Core Concepts
//!
//! - **Lazy**: constructing an `Eff` performs no work; running it does.
//! - **One-shot**: an `Eff` value is consumed by `run`. Re-runnable things
//!   (producers, fold starts) hold *recipes* that build a fresh `Eff` per run.
//! - **Failure as value**: errors travel in the `Result` channel, never as
//!   uncontrolled unwinding. [`Eff::protect`] converts a panicking action into
//!   a [`Panicked`] failure value.
//! - **Runtime-agnostic**: computations are boxed futures; any executor can
//!   drive them.
//!
//! # Examples
//!
//! ```
//! use freshet::Eff;
//!
//! # tokio_test::block_on(async {
//! let eff = Eff::<_, String>::pure(5)
//!     .map(|x| x * 2)
//!     .and_then(|x| Eff::pure(x + 10));
//!
//! assert_eq!(eff.run().await, Ok(20));
//! # });
//! ```

use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};

use futures::future::BoxFuture;

use crate::ContextError;

/// Function type for Eff internals
type EffFn<T, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, E>> + Send>;

/// A lazy computation that produces a `T` or fails with an `E`
///
/// `Eff<T, E>` describes a computation that:
/// - Produces a value of type `T` on success
/// - Fails with an error of type `E`
/// - Runs no code until [`run`](Eff::run) is awaited
///
/// # Type Parameters
///
/// * `T` - The type of the success value
/// * `E` - The type of the error value (defaults to `std::convert::Infallible`)
///
/// # Examples
///
/// ```
/// use freshet::Eff;
///
/// # tokio_test::block_on(async {
/// let eff: Eff<_, String> = Eff::pure(42);
/// assert_eq!(eff.run().await, Ok(42));
///
/// let eff: Eff<i32, String> = Eff::fail("error".to_string());
/// assert_eq!(eff.run().await, Err("error".to_string()));
/// # });
/// ```
pub struct Eff<T, E = Infallible> {
    run_fn: EffFn<T, E>,
}

// Manual Debug implementation since FnOnce is not Debug
impl<T, E> fmt::Debug for Eff<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eff").field("run_fn", &"<function>").finish()
    }
}

impl<T, E> Eff<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Create a pure value (no effects)
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<_, String>::pure(42);
    /// assert_eq!(eff.run().await, Ok(42));
    /// # });
    /// ```
    pub fn pure(value: T) -> Self {
        Eff {
            run_fn: Box::new(move || Box::pin(async move { Ok(value) })),
        }
    }

    /// Create a failing computation
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<i32, _>::fail("error");
    /// assert_eq!(eff.run().await, Err("error"));
    /// # });
    /// ```
    pub fn fail(error: E) -> Self {
        Eff {
            run_fn: Box::new(move || Box::pin(async move { Err(error) })),
        }
    }

    /// Lift a `Result` into an Eff
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<_, String>::from_result(Ok(42));
    /// assert_eq!(eff.run().await, Ok(42));
    /// # });
    /// ```
    pub fn from_result(result: Result<T, E>) -> Self {
        Eff {
            run_fn: Box::new(move || Box::pin(async move { result })),
        }
    }

    /// Create from a synchronous function
    ///
    /// The function is not called until the computation runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::from_fn(|| Ok::<_, String>(42));
    /// assert_eq!(eff.run().await, Ok(42));
    /// # });
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        Eff {
            run_fn: Box::new(move || {
                let result = f();
                Box::pin(async move { result })
            }),
        }
    }

    /// Create from an async function
    ///
    /// The closure is not called (and the future not constructed) until the
    /// computation runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::from_async(|| async { Ok::<_, String>(42) });
    /// assert_eq!(eff.run().await, Ok(42));
    /// # });
    /// ```
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Eff {
            run_fn: Box::new(move || Box::pin(f())),
        }
    }

    /// Capture a panicking synchronous action as a failure value
    ///
    /// Runs `f` under a panic guard; if it panics, the computation fails with
    /// a [`Panicked`] converted into `E` instead of unwinding through the
    /// caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::{Eff, Panicked};
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<i32, Panicked>::protect(|| panic!("boom"));
    /// let err = eff.run().await.unwrap_err();
    /// assert!(err.message().contains("boom"));
    /// # });
    /// ```
    pub fn protect<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
        E: From<Panicked>,
    {
        Eff::from_fn(move || {
            catch_unwind(AssertUnwindSafe(f))
                .map_err(|payload| E::from(Panicked::from_payload(payload.as_ref())))
        })
    }

    /// Chain computations
    ///
    /// If the current computation succeeds, apply the function to its result
    /// to produce the next one. If it fails, propagate the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<_, String>::pure(5).and_then(|x| Eff::pure(x * 2));
    /// assert_eq!(eff.run().await, Ok(10));
    /// # });
    /// ```
    pub fn and_then<U, F>(self, f: F) -> Eff<U, E>
    where
        F: FnOnce(T) -> Eff<U, E> + Send + 'static,
        U: Send + 'static,
    {
        Eff {
            run_fn: Box::new(move || {
                Box::pin(async move {
                    let value = (self.run_fn)().await?;
                    let next = f(value);
                    (next.run_fn)().await
                })
            }),
        }
    }

    /// Transform the success value
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<_, String>::pure(5).map(|x| x * 2);
    /// assert_eq!(eff.run().await, Ok(10));
    /// # });
    /// ```
    pub fn map<U, F>(self, f: F) -> Eff<U, E>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static,
    {
        Eff {
            run_fn: Box::new(move || Box::pin(async move { (self.run_fn)().await.map(f) })),
        }
    }

    /// Transform the error value
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<i32, _>::fail("error").map_err(|e| format!("failed: {}", e));
    /// assert_eq!(eff.run().await, Err("failed: error".to_string()));
    /// # });
    /// ```
    pub fn map_err<E2, F>(self, f: F) -> Eff<T, E2>
    where
        F: FnOnce(E) -> E2 + Send + 'static,
        E2: Send + 'static,
    {
        Eff {
            run_fn: Box::new(move || Box::pin(async move { (self.run_fn)().await.map_err(f) })),
        }
    }

    /// Recover from errors
    ///
    /// If the computation fails, apply the recovery function to the error to
    /// produce a new computation. If it succeeds, the value passes through.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<i32, _>::fail("error").or_else(|_| Eff::pure(42));
    /// assert_eq!(eff.run().await, Ok(42));
    /// # });
    /// ```
    pub fn or_else<F>(self, f: F) -> Self
    where
        F: FnOnce(E) -> Eff<T, E> + Send + 'static,
    {
        Eff {
            run_fn: Box::new(move || {
                Box::pin(async move {
                    match (self.run_fn)().await {
                        Ok(value) => Ok(value),
                        Err(err) => {
                            let recovery = f(err);
                            (recovery.run_fn)().await
                        }
                    }
                })
            }),
        }
    }

    /// Perform a side effect and return the original value
    ///
    /// The side effect receives a reference to the value; if it fails, the
    /// whole computation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<_, String>::pure(42).tap(|value| {
    ///     assert_eq!(*value, 42);
    ///     Eff::pure(())
    /// });
    /// assert_eq!(eff.run().await, Ok(42));
    /// # });
    /// ```
    #[inline]
    pub fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&T) -> Eff<(), E> + Send + 'static,
        T: Clone,
    {
        self.and_then(move |value| {
            let value_clone = value.clone();
            f(&value).map(move |_| value_clone)
        })
    }

    /// Reify the outcome into the success channel
    ///
    /// The returned computation always succeeds, carrying the original
    /// `Result` as its value.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<i32, String>::fail("nope".to_string()).attempt();
    /// assert_eq!(eff.run().await, Ok(Err("nope".to_string())));
    /// # });
    /// ```
    pub fn attempt(self) -> Eff<Result<T, E>, E> {
        Eff {
            run_fn: Box::new(move || Box::pin(async move { Ok((self.run_fn)().await) })),
        }
    }

    /// Acquire a resource, use it, and guarantee its release
    ///
    /// `release` runs on both the success and the failure path of the `use`
    /// computation. A release error never masks a use error: the use outcome
    /// is dominant and release failures are logged (with the `tracing`
    /// feature) and otherwise dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    /// use std::sync::atomic::{AtomicBool, Ordering};
    /// use std::sync::Arc;
    ///
    /// # tokio_test::block_on(async {
    /// let closed = Arc::new(AtomicBool::new(false));
    /// let closed_probe = closed.clone();
    ///
    /// let eff = Eff::bracket(
    ///     Eff::<_, String>::pure("handle"),
    ///     move |_handle| async move {
    ///         closed_probe.store(true, Ordering::SeqCst);
    ///         Ok(())
    ///     },
    ///     |handle: &&str| Eff::pure(handle.len()),
    /// );
    ///
    /// assert_eq!(eff.run().await, Ok(6));
    /// assert!(closed.load(Ordering::SeqCst));
    /// # });
    /// ```
    pub fn bracket<R, Release, RelFut, Use>(acquire: Eff<R, E>, release: Release, use_fn: Use) -> Self
    where
        R: Send + 'static,
        Release: FnOnce(R) -> RelFut + Send + 'static,
        RelFut: Future<Output = Result<(), E>> + Send + 'static,
        Use: FnOnce(&R) -> Eff<T, E> + Send + 'static,
    {
        Eff::from_async(move || async move {
            let resource = acquire.run().await?;
            let result = use_fn(&resource).run().await;
            let cleanup = release(resource).await;
            if let Err(_release_err) = cleanup {
                #[cfg(feature = "tracing")]
                tracing::warn!("bracket release failed; keeping primary outcome");
            }
            result
        })
    }

    /// Run the computation
    ///
    /// Consumes the `Eff` and resolves it to a `Result`.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::Eff;
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<_, String>::pure(42);
    /// assert_eq!(eff.run().await, Ok(42));
    /// # });
    /// ```
    pub async fn run(self) -> Result<T, E> {
        (self.run_fn)().await
    }
}

/// A captured panic, carried as an error value
///
/// Produced by [`Eff::protect`] when the guarded action panics. Holds the
/// panic message when the payload was a string, or a placeholder otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked {
    message: String,
}

impl Panicked {
    pub(crate) fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic payload of unknown type".to_string()
        };
        Panicked { message }
    }

    /// The panic message, if one was available
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panicked: {}", self.message)
    }
}

impl std::error::Error for Panicked {}

/// Extension trait for adding context to Eff errors
pub trait EffContext<T, E> {
    /// Add context to errors from this computation
    fn context(self, msg: impl Into<String> + Send + 'static) -> Eff<T, ContextError<E>>;
}

impl<T, E> EffContext<T, E> for Eff<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Add context to errors from this computation
    ///
    /// Wraps any error in a [`ContextError`] carrying the given message, so a
    /// trail of context accumulates as errors propagate outward.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::{Eff, EffContext};
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<i32, _>::fail("connection refused")
    ///     .context("pulling next batch");
    ///
    /// let err = eff.run().await.unwrap_err();
    /// assert_eq!(err.inner(), &"connection refused");
    /// assert_eq!(err.context_trail(), &["pulling next batch"]);
    /// # });
    /// ```
    fn context(self, msg: impl Into<String> + Send + 'static) -> Eff<T, ContextError<E>> {
        self.map_err(|err| ContextError::new(err).context(msg))
    }
}

// Inherent method for chaining context layers
impl<T, E> Eff<T, ContextError<E>>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Add another layer of context
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::{Eff, EffContext};
    ///
    /// # tokio_test::block_on(async {
    /// let eff = Eff::<i32, _>::fail("file not found")
    ///     .context("reading page")
    ///     .context("writing index");
    ///
    /// let err = eff.run().await.unwrap_err();
    /// assert_eq!(err.context_trail().len(), 2);
    /// # });
    /// ```
    pub fn context(self, msg: impl Into<String> + Send + 'static) -> Self {
        self.map_err(|err| err.context(msg))
    }
}
