//! Container-lifting fold

use std::fmt;
use std::marker::PhantomData;

use crate::fold::{Fold, FoldExt};
use crate::{Eff, Monoid, Semigroup};

/// Fold returned by [`FoldExt::nest`](crate::fold::FoldExt::nest)
///
/// Consumes containers of the inner fold's element type. Each container is
/// folded on its own (start, steps, end) and the per-container results are
/// merged monoidally. The state is an [`Eff`] so the inner fold's effects
/// run lazily, once the nested fold is finalized.
pub struct Nest<F, C> {
    inner: F,
    _marker: PhantomData<fn(C)>,
}

impl<F, C> Nest<F, C> {
    pub(crate) fn new(inner: F) -> Self {
        Nest {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<F: Clone, C> Clone for Nest<F, C> {
    fn clone(&self) -> Self {
        Nest {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F: fmt::Debug, C> fmt::Debug for Nest<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nest").field("inner", &self.inner).finish()
    }
}

impl<F, C> Fold for Nest<F, C>
where
    F: Fold + Clone + Send + Sync + 'static,
    F::Out: Monoid,
    C: IntoIterator<Item = F::Item> + Clone + Send + Sync + 'static,
{
    type Item = C;
    type Out = F::Out;
    type State = Eff<F::Out, F::Error>;
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        Eff::pure(Eff::pure(F::Out::empty()))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let inner = self.inner.clone();
        state.and_then(move |acc| inner.run(item).map(move |out| acc.combine(out)))
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        state
    }
}
