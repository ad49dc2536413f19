//! State-observation adapters
//!
//! Four variants, differing in what the sink sees per element: the state
//! before the step, the state after it, or the element paired with either.
//! In every case the sink's result is discarded and its `end` runs before
//! the observed fold's own `end`.

use std::fmt;

use crate::fold::Fold;
use crate::Eff;

macro_rules! observe_adapter {
    ($name:ident, $ext_method:literal) => {
        /// Fold returned by
        #[doc = concat!("[`FoldExt::", $ext_method, "`](crate::fold::FoldExt::", $ext_method, ")")]
        pub struct $name<F, G> {
            inner: F,
            sink: G,
        }

        impl<F, G> $name<F, G> {
            pub(crate) fn new(inner: F, sink: G) -> Self {
                $name { inner, sink }
            }
        }

        impl<F: Clone, G: Clone> Clone for $name<F, G> {
            fn clone(&self) -> Self {
                $name {
                    inner: self.inner.clone(),
                    sink: self.sink.clone(),
                }
            }
        }

        impl<F: fmt::Debug, G: fmt::Debug> fmt::Debug for $name<F, G> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("inner", &self.inner)
                    .field("sink", &self.sink)
                    .finish()
            }
        }
    };
}

observe_adapter!(ObserveState, "observe_state");
observe_adapter!(ObserveNextState, "observe_next_state");
observe_adapter!(ObserveWithState, "observe_with_state");
observe_adapter!(ObserveWithNextState, "observe_with_next_state");

impl<F, G> Fold for ObserveState<F, G>
where
    F: Fold,
    F::State: Clone + Sync,
    G: Fold<Item = F::State, Out = (), Error = F::Error>,
{
    type Item = F::Item;
    type Out = F::Out;
    type State = (F::State, G::State);
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let inner = self.inner.start();
        let sink = self.sink.start();
        inner.and_then(move |s| sink.map(move |gs| (s, gs)))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let (s, gs) = state;
        let gs = self.sink.step(gs, s.clone());
        (self.inner.step(s, item), gs)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (s, gs) = state;
        let sink_end = self.sink.end(gs);
        let inner_end = self.inner.end(s);
        sink_end.and_then(move |_| inner_end)
    }
}

impl<F, G> Fold for ObserveNextState<F, G>
where
    F: Fold,
    F::State: Clone + Sync,
    G: Fold<Item = F::State, Out = (), Error = F::Error>,
{
    type Item = F::Item;
    type Out = F::Out;
    type State = (F::State, G::State);
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let inner = self.inner.start();
        let sink = self.sink.start();
        inner.and_then(move |s| sink.map(move |gs| (s, gs)))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let (s, gs) = state;
        let next = self.inner.step(s, item);
        let gs = self.sink.step(gs, next.clone());
        (next, gs)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (s, gs) = state;
        let sink_end = self.sink.end(gs);
        let inner_end = self.inner.end(s);
        sink_end.and_then(move |_| inner_end)
    }
}

impl<F, G> Fold for ObserveWithState<F, G>
where
    F: Fold,
    F::State: Clone + Sync,
    G: Fold<Item = (F::Item, F::State), Out = (), Error = F::Error>,
{
    type Item = F::Item;
    type Out = F::Out;
    type State = (F::State, G::State);
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let inner = self.inner.start();
        let sink = self.sink.start();
        inner.and_then(move |s| sink.map(move |gs| (s, gs)))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let (s, gs) = state;
        let gs = self.sink.step(gs, (item.clone(), s.clone()));
        (self.inner.step(s, item), gs)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (s, gs) = state;
        let sink_end = self.sink.end(gs);
        let inner_end = self.inner.end(s);
        sink_end.and_then(move |_| inner_end)
    }
}

impl<F, G> Fold for ObserveWithNextState<F, G>
where
    F: Fold,
    F::State: Clone + Sync,
    G: Fold<Item = (F::Item, F::State), Out = (), Error = F::Error>,
{
    type Item = F::Item;
    type Out = F::Out;
    type State = (F::State, G::State);
    type Error = F::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let inner = self.inner.start();
        let sink = self.sink.start();
        inner.and_then(move |s| sink.map(move |gs| (s, gs)))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let (s, gs) = state;
        let next = self.inner.step(s, item.clone());
        let gs = self.sink.step(gs, (item, next.clone()));
        (next, gs)
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (s, gs) = state;
        let sink_end = self.sink.end(gs);
        let inner_end = self.inner.end(s);
        sink_end.and_then(move |_| inner_end)
    }
}
