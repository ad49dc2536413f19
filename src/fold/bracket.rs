//! Resource-scoped folds
//!
//! A bracketed fold opens a resource at initialization, threads it through
//! an effectful step, and guarantees the close action runs exactly once:
//! either at finalization or, on a step failure, immediately before the
//! error propagates. A close failure after a step failure never masks the
//! step's error.

use std::fmt;
use std::marker::PhantomData;

use crate::fold::Fold;
use crate::Eff;

/// A fold whose state is a bracketed resource
///
/// Built with [`bracket`]. The result is the final resource value, so a
/// closing `map` can extract whatever summary the resource accumulated.
pub struct BracketFold<R, A, E, Open, Step, Close> {
    open: Open,
    step_fn: Step,
    close: Close,
    _marker: PhantomData<fn(A) -> (R, E)>,
}

/// Fold over a resource with guaranteed cleanup
///
/// `open` acquires the resource when the fold starts. `step` consumes one
/// element, producing the updated resource effectfully. `close` releases
/// the resource, at the end of the run or right after a failed step.
///
/// # Examples
///
/// ```
/// use freshet::{Eff, fold::{self, FoldExt}};
/// use freshet::stream::Producer;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let closed = Arc::new(AtomicBool::new(false));
/// let probe = closed.clone();
///
/// let writer = fold::bracket(
///     || Eff::<Vec<String>, String>::pure(Vec::new()),
///     |mut lines: Vec<String>, line: String| {
///         lines.push(line);
///         Eff::pure(lines)
///     },
///     move |_lines| {
///         let probe = probe.clone();
///         Eff::from_fn(move || {
///             probe.store(true, Ordering::SeqCst);
///             Ok(())
///         })
///     },
/// );
///
/// let lines = Producer::<String, String>::emit(vec!["a".into(), "b".into()]);
/// assert_eq!(
///     writer.run_stream(lines).run().await,
///     Ok(vec!["a".to_string(), "b".to_string()])
/// );
/// assert!(closed.load(Ordering::SeqCst));
/// # });
/// ```
pub fn bracket<R, A, E, Open, Step, Close>(
    open: Open,
    step: Step,
    close: Close,
) -> BracketFold<R, A, E, Open, Step, Close>
where
    Open: Fn() -> Eff<R, E>,
    Step: Fn(R, A) -> Eff<R, E>,
    Close: Fn(R) -> Eff<(), E>,
{
    BracketFold {
        open,
        step_fn: step,
        close,
        _marker: PhantomData,
    }
}

impl<R, A, E, Open: Clone, Step: Clone, Close: Clone> Clone
    for BracketFold<R, A, E, Open, Step, Close>
{
    fn clone(&self) -> Self {
        BracketFold {
            open: self.open.clone(),
            step_fn: self.step_fn.clone(),
            close: self.close.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R, A, E, Open, Step, Close> fmt::Debug for BracketFold<R, A, E, Open, Step, Close> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BracketFold")
            .field("open", &"<action>")
            .field("step", &"<function>")
            .field("close", &"<action>")
            .finish()
    }
}

impl<R, A, E, Open, Step, Close> Fold for BracketFold<R, A, E, Open, Step, Close>
where
    R: Clone + Send + 'static,
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
    Open: Fn() -> Eff<R, E> + Send + Sync + 'static,
    Step: Fn(R, A) -> Eff<R, E> + Clone + Send + Sync + 'static,
    Close: Fn(R) -> Eff<(), E> + Clone + Send + Sync + 'static,
{
    type Item = A;
    type Out = R;
    type State = Eff<R, E>;
    type Error = E;

    fn start(&self) -> Eff<Self::State, E> {
        Eff::pure((self.open)())
    }

    fn step(&self, state: Self::State, item: A) -> Self::State {
        let step_fn = self.step_fn.clone();
        let close = self.close.clone();
        state.and_then(move |resource| {
            let on_failure = resource.clone();
            step_fn(resource, item).or_else(move |error| {
                // The step's error wins; a close failure here is dropped.
                close(on_failure)
                    .or_else(|_close_error| {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("close failed while handling a step failure");
                        Eff::pure(())
                    })
                    .and_then(move |_| Eff::fail(error))
            })
        })
    }

    fn end(&self, state: Self::State) -> Eff<R, E> {
        let close = self.close.clone();
        state.and_then(move |resource| {
            let result = resource.clone();
            close(resource).map(move |_| result)
        })
    }
}
