//! Sequential fold composition

use std::fmt;

use crate::fold::Fold;
use crate::Eff;

/// Fold returned by [`FoldExt::pipe`](crate::fold::FoldExt::pipe)
///
/// After each element, the first fold's current result (as its `end` would
/// report it) is fed as an element to the second fold. The first fold's
/// `end` is therefore effectful once per element, so its state must be
/// cloneable to keep the run going afterwards. The composed state is an
/// [`Eff`] carrying both inner states; effects accumulate lazily and run
/// when the composed fold is finalized.
pub struct Pipe<F1, F2> {
    first: F1,
    second: F2,
}

impl<F1, F2> Pipe<F1, F2> {
    pub(crate) fn new(first: F1, second: F2) -> Self {
        Pipe { first, second }
    }
}

impl<F1: Clone, F2: Clone> Clone for Pipe<F1, F2> {
    fn clone(&self) -> Self {
        Pipe {
            first: self.first.clone(),
            second: self.second.clone(),
        }
    }
}

impl<F1: fmt::Debug, F2: fmt::Debug> fmt::Debug for Pipe<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

impl<F1, F2> Fold for Pipe<F1, F2>
where
    F1: Fold + Clone + Send + Sync + 'static,
    F2: Fold<Item = F1::Out, Error = F1::Error> + Clone + Send + Sync + 'static,
    F1::State: Clone,
{
    type Item = F1::Item;
    type Out = F2::Out;
    type State = Eff<(F1::State, F2::State), F1::Error>;
    type Error = F1::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let first = self.first.start();
        let second = self.second.start();
        Eff::pure(first.and_then(move |s1| second.map(move |s2| (s1, s2))))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let first = self.first.clone();
        let second = self.second.clone();
        state.and_then(move |(s1, s2)| {
            let s1 = first.step(s1, item);
            let carried = s1.clone();
            first
                .end(s1)
                .map(move |b| (carried, second.step(s2, b)))
        })
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let second = self.second.clone();
        state.and_then(move |(_, s2)| second.end(s2))
    }
}
