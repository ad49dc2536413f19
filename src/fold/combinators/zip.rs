//! Fan-out adapters running two folds over one pass

use std::fmt;

use crate::fold::Fold;
use crate::Eff;

/// Fold returned by [`FoldExt::zip`](crate::fold::FoldExt::zip)
///
/// Both folds consume every element; the result pairs their outputs. The
/// left fold starts, steps, and ends first.
pub struct Zip<F1, F2> {
    left: F1,
    right: F2,
}

impl<F1, F2> Zip<F1, F2> {
    pub(crate) fn new(left: F1, right: F2) -> Self {
        Zip { left, right }
    }
}

impl<F1: Clone, F2: Clone> Clone for Zip<F1, F2> {
    fn clone(&self) -> Self {
        Zip {
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<F1: fmt::Debug, F2: fmt::Debug> fmt::Debug for Zip<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zip")
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<F1, F2> Fold for Zip<F1, F2>
where
    F1: Fold,
    F2: Fold<Item = F1::Item, Error = F1::Error>,
{
    type Item = F1::Item;
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
        (
            self.left.step(l, item.clone()),
            self.right.step(r, item),
        )
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (l, r) = state;
        let left = self.left.end(l);
        let right = self.right.end(r);
        left.and_then(move |b| right.map(move |c| (b, c)))
    }
}

/// Fold returned by [`FoldExt::observe`](crate::fold::FoldExt::observe)
///
/// Like [`Zip`] but only the left result is kept; the right side is a sink.
pub struct ZipLeft<F1, F2> {
    left: F1,
    right: F2,
}

impl<F1, F2> ZipLeft<F1, F2> {
    pub(crate) fn new(left: F1, right: F2) -> Self {
        ZipLeft { left, right }
    }
}

impl<F1: Clone, F2: Clone> Clone for ZipLeft<F1, F2> {
    fn clone(&self) -> Self {
        ZipLeft {
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<F1: fmt::Debug, F2: fmt::Debug> fmt::Debug for ZipLeft<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipLeft")
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<F1, F2> Fold for ZipLeft<F1, F2>
where
    F1: Fold,
    F2: Fold<Item = F1::Item, Error = F1::Error>,
{
    type Item = F1::Item;
    type Out = F1::Out;
    type State = (F1::State, F2::State);
    type Error = F1::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let left = self.left.start();
        let right = self.right.start();
        left.and_then(move |l| right.map(move |r| (l, r)))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let (l, r) = state;
        (
            self.left.step(l, item.clone()),
            self.right.step(r, item),
        )
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (l, r) = state;
        let left = self.left.end(l);
        let right = self.right.end(r);
        left.and_then(move |b| right.map(move |_| b))
    }
}

/// Fold returned by [`FoldExt::observed_by`](crate::fold::FoldExt::observed_by)
///
/// Like [`Zip`] but only the right result is kept. Both sides still run
/// fully, left first.
pub struct ZipRight<F1, F2> {
    left: F1,
    right: F2,
}

impl<F1, F2> ZipRight<F1, F2> {
    pub(crate) fn new(left: F1, right: F2) -> Self {
        ZipRight { left, right }
    }
}

impl<F1: Clone, F2: Clone> Clone for ZipRight<F1, F2> {
    fn clone(&self) -> Self {
        ZipRight {
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<F1: fmt::Debug, F2: fmt::Debug> fmt::Debug for ZipRight<F1, F2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipRight")
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<F1, F2> Fold for ZipRight<F1, F2>
where
    F1: Fold,
    F2: Fold<Item = F1::Item, Error = F1::Error>,
{
    type Item = F1::Item;
    type Out = F2::Out;
    type State = (F1::State, F2::State);
    type Error = F1::Error;

    fn start(&self) -> Eff<Self::State, Self::Error> {
        let left = self.left.start();
        let right = self.right.start();
        left.and_then(move |l| right.map(move |r| (l, r)))
    }

    fn step(&self, state: Self::State, item: Self::Item) -> Self::State {
        let (l, r) = state;
        (
            self.left.step(l, item.clone()),
            self.right.step(r, item),
        )
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error> {
        let (l, r) = state;
        let left = self.left.end(l);
        let right = self.right.end(r);
        left.and_then(move |_| right)
    }
}
