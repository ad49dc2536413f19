//! Input-adapting fold

use std::fmt;
use std::marker::PhantomData;

use crate::fold::Fold;
use crate::Eff;

/// Fold returned by [`FoldExt::contramap`](crate::fold::FoldExt::contramap)
pub struct ContraMap<F, Fun, A> {
    inner: F,
    f: Fun,
    _marker: PhantomData<fn(A)>,
}

impl<F, Fun, A> ContraMap<F, Fun, A> {
    pub(crate) fn new(inner: F, f: Fun) -> Self {
        ContraMap {
            inner,
            f,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, Fun: Clone, A> Clone for ContraMap<F, Fun, A> {
    fn clone(&self) -> Self {
        ContraMap {
            inner: self.inner.clone(),
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F: fmt::Debug, Fun, A> fmt::Debug for ContraMap<F, Fun, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContraMap")
            .field("inner", &self.inner)
            .field("f", &"<function>")
            .finish()
    }
}

impl<F, Fun, A> Fold for ContraMap<F, Fun, A>
where
    F: Fold,
    Fun: Fn(A) -> F::Item + Clone + Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
{
    type Item = A;
    type Out = F::Out;
    type State = F::State;
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        self.inner.start()
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        self.inner.step(state, (self.f)(item))
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        self.inner.end(state)
    }
}
