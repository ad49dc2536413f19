//! Before/after action adapters

use std::fmt;

use crate::fold::Fold;
use crate::Eff;

/// Fold returned by [`FoldExt::start_with`](crate::fold::FoldExt::start_with)
///
/// Runs an action before the inner fold's own initialization.
pub struct StartWith<F, Fun> {
    inner: F,
    action: Fun,
}

impl<F, Fun> StartWith<F, Fun> {
    pub(crate) fn new(inner: F, action: Fun) -> Self {
        StartWith { inner, action }
    }
}

impl<F: Clone, Fun: Clone> Clone for StartWith<F, Fun> {
    fn clone(&self) -> Self {
        StartWith {
            inner: self.inner.clone(),
            action: self.action.clone(),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for StartWith<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartWith")
            .field("inner", &self.inner)
            .field("action", &"<action>")
            .finish()
    }
}

impl<F, Fun> Fold for StartWith<F, Fun>
where
    F: Fold,
    Fun: Fn() -> Eff<(), F::Error> + Send + Sync + 'static,
{
    type Item = F::Item;
    type Out = F::Out;
    type State = F::State;
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let inner = self.inner.start();
        (self.action)().and_then(move |_| inner)
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        self.inner.step(state, item)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        self.inner.end(state)
    }
}

/// Fold returned by [`FoldExt::end_with`](crate::fold::FoldExt::end_with)
///
/// Runs an action after the inner fold's own finalization; the inner result
/// is kept.
pub struct EndWith<F, Fun> {
    inner: F,
    action: Fun,
}

impl<F, Fun> EndWith<F, Fun> {
    pub(crate) fn new(inner: F, action: Fun) -> Self {
        EndWith { inner, action }
    }
}

impl<F: Clone, Fun: Clone> Clone for EndWith<F, Fun> {
    fn clone(&self) -> Self {
        EndWith {
            inner: self.inner.clone(),
            action: self.action.clone(),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for EndWith<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndWith")
            .field("inner", &self.inner)
            .field("action", &"<action>")
            .finish()
    }
}

impl<F, Fun> Fold for EndWith<F, Fun>
where
    F: Fold,
    Fun: Fn() -> Eff<(), F::Error> + Send + Sync + 'static,
{
    type Item = F::Item;
    type Out = F::Out;
    type State = F::State;
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        self.inner.start()
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        self.inner.step(state, item)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let after = (self.action)();
        self.inner
            .end(state)
            .and_then(move |out| after.map(move |_| out))
    }
}
