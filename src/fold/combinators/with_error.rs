//! Error-widening adapter

use std::fmt;
use std::marker::PhantomData;

use crate::fold::Fold;
use crate::Eff;

/// Fold returned by [`FoldExt::with_error`](crate::fold::FoldExt::with_error)
///
/// Lifts the fold's error type through `From`, so folds with different
/// error types can be composed under a common one.
pub struct WithError<F, E2> {
    inner: F,
    _marker: PhantomData<fn() -> E2>,
}

impl<F, E2> WithError<F, E2> {
    pub(crate) fn new(inner: F) -> Self {
        WithError {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, E2> Clone for WithError<F, E2> {
    fn clone(&self) -> Self {
        WithError {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F: fmt::Debug, E2> fmt::Debug for WithError<F, E2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithError")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<F, E2> Fold for WithError<F, E2>
where
    F: Fold,
    E2: From<F::Error> + Send + 'static,
{
    type Item = F::Item;
    type Out = F::Out;
    type State = F::State;
    type Error = E2;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        self.inner.start().map_err(E2::from)
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        self.inner.step(state, item)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        self.inner.end(state).map_err(E2::from)
    }
}
