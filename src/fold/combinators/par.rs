//! Product fold over paired elements

use std::fmt;

use crate::fold::Fold;
use crate::Eff;

/// Fold returned by [`FoldExt::par`](crate::fold::FoldExt::par)
///
/// Consumes `(A, B)` pairs, routing the first component to the left fold
/// and the second to the right.
pub struct Par<F1, F2> {
    left: F1,
    right: F2,
}

impl<F1, F2> Par<F1, F2> {
    pub(crate) fn new(left: F1, right: F2) -> Self {
        Par { left, right }
    }
}

impl<F1: Clone, F2: Clone> Clone for Par<F1, F2> {
    fn clone(&self) -> Self {
        Par {
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<F1: fmt::Debug, F2: fmt::Debug> fmt::Debug for Par<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Par")
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<F1, F2> Fold for Par<F1, F2>
where
    F1: Fold,
    F2: Fold<Error = F1::Error>,
{
    type Item = (F1::Item, F2::Item);
    type Out = (F1::Out, F2::Out);
    type State = (F1::State, F2::State);
    type Error = F1::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let left = self.left.start();
        let right = self.right.start();
        left.and_then(move |l| right.map(move |r| (l, r)))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let (l, r) = state;
        let (a, b) = item;
        (self.left.step(l, a), self.right.step(r, b))
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (l, r) = state;
        let left = self.left.end(l);
        let right = self.right.end(r);
        left.and_then(move |b| right.map(move |c| (b, c)))
    }
}
