//! Result-transforming adapters

use std::fmt;

use crate::fold::Fold;
use crate::Eff;

/// Fold returned by [`FoldExt::map`](crate::fold::FoldExt::map)
pub struct Map<F, Fun> {
    inner: F,
    f: Fun,
}

impl<F, Fun> Map<F, Fun> {
    pub(crate) fn new(inner: F, f: Fun) -> Self {
        Map { inner, f }
    }
}

impl<F: Clone, Fun: Clone> Clone for Map<F, Fun> {
    fn clone(&self) -> Self {
        Map {
            inner: self.inner.clone(),
            f: self.f.clone(),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for Map<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("inner", &self.inner)
            .field("f", &"<function>")
            .finish()
    }
}

impl<F, Fun, C> Fold for Map<F, Fun>
where
    F: Fold,
    Fun: Fn(F::Out) -> C + Clone + Send + Sync + 'static,
    C: Send + 'static,
{
    type Item = F::Item;
    type Out = C;
    type State = F::State;
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        self.inner.start()
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        self.inner.step(state, item)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let f = self.f.clone();
        self.inner.end(state).map(f)
    }
}

/// Fold returned by [`FoldExt::map_flatten`](crate::fold::FoldExt::map_flatten)
pub struct MapFlatten<F, Fun> {
    inner: F,
    f: Fun,
}

impl<F, Fun> MapFlatten<F, Fun> {
    pub(crate) fn new(inner: F, f: Fun) -> Self {
        MapFlatten { inner, f }
    }
}

impl<F: Clone, Fun: Clone> Clone for MapFlatten<F, Fun> {
    fn clone(&self) -> Self {
        MapFlatten {
            inner: self.inner.clone(),
            f: self.f.clone(),
        }
    }
}

impl<F: fmt::Debug, Fun> fmt::Debug for MapFlatten<F, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapFlatten")
            .field("inner", &self.inner)
            .field("f", &"<function>")
            .finish()
    }
}

impl<F, Fun, C> Fold for MapFlatten<F, Fun>
where
    F: Fold,
    Fun: Fn(F::Out) -> Eff<C, F::Error> + Clone + Send + Sync + 'static,
    C: Send + 'static,
{
    type Item = F::Item;
    type Out = C;
    type State = F::State;
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        self.inner.start()
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        self.inner.step(state, item)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let f = self.f.clone();
        self.inner.end(state).and_then(f)
    }
}
