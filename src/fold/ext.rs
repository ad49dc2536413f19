//! Combinators and drivers for folds
//!
//! [`FoldExt`] is blanket-implemented for every [`Fold`]; each combinator
//! returns a small adapter struct from [`combinators`](crate::fold) so the
//! composed state type stays internal.

use crate::fold::combinators::{
    ContraMap, EndWith, Map, MapFlatten, Nest, ObserveNextState, ObserveState, ObserveWithNextState,
    ObserveWithState, Par, Pipe, StartWith, WithError, Zip, ZipLeft, ZipRight,
};
use crate::fold::Fold;
use crate::stream::{Producer, Stream};
use crate::{Eff, Monoid};

/// Extension methods available on every [`Fold`]
pub trait FoldExt: Fold + Sized {
    /// Transform the result with a pure function
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::fold::{self, FoldExt};
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let mean = fold::from_fold_left((0f64, 0u32), |(sum, n), x: f64| (sum + x, n + 1))
    ///     .map(|(sum, n)| if n == 0 { 0.0 } else { sum / n as f64 });
    /// let samples = Producer::<f64>::emit(vec![1.0, 2.0, 3.0]);
    /// assert_eq!(mean.run_stream(samples).run().await, Ok(2.0));
    /// # });
    /// ```
    fn map<C, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Out) -> C,
    {
        Map::new(self, f)
    }

    /// Transform the result with an effectful function
    fn map_flatten<C, F>(self, f: F) -> MapFlatten<Self, F>
    where
        F: Fn(Self::Out) -> Eff<C, Self::Error>,
    {
        MapFlatten::new(self, f)
    }

    /// Adapt the fold to a different element type
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::fold::{self, FoldExt};
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let total_len = fold::from_fold_left(0usize, |acc, n: usize| acc + n)
    ///     .contramap(|s: String| s.len());
    /// let words = Producer::<String>::emit(vec!["ab".to_string(), "cde".to_string()]);
    /// assert_eq!(total_len.run_stream(words).run().await, Ok(5));
    /// # });
    /// ```
    fn contramap<A, F>(self, f: F) -> ContraMap<Self, F, A>
    where
        F: Fn(A) -> Self::Item,
    {
        ContraMap::new(self, f)
    }

    /// Run another fold over the same elements, pairing the results
    ///
    /// Both folds see every element in one pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::fold::{self, FoldExt};
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let sum = fold::from_fold_left(0i64, |acc, n: i64| acc + n);
    /// let both = sum.zip(fold::count());
    /// let numbers = Producer::<i64>::emit(vec![1, 2, 3]);
    /// assert_eq!(both.run_stream(numbers).run().await, Ok((6, 3)));
    /// # });
    /// ```
    fn zip<G>(self, other: G) -> Zip<Self, G>
    where
        G: Fold<Item = Self::Item, Error = Self::Error>,
    {
        Zip::new(self, other)
    }

    /// Feed every element to a sink as well, keeping this fold's result
    fn observe<G>(self, sink: G) -> ZipLeft<Self, G>
    where
        G: Fold<Item = Self::Item, Out = (), Error = Self::Error>,
    {
        ZipLeft::new(self, sink)
    }

    /// Run another fold over the same elements, keeping the other's result
    fn observed_by<G>(self, other: G) -> ZipRight<Self, G>
    where
        G: Fold<Item = Self::Item, Error = Self::Error>,
    {
        ZipRight::new(self, other)
    }

    /// Run two folds over the two sides of paired elements
    ///
    /// Elements are `(A, B)` pairs; this fold consumes the `A`s and the other
    /// consumes the `B`s.
    fn par<G>(self, other: G) -> Par<Self, G>
    where
        G: Fold<Error = Self::Error>,
    {
        Par::new(self, other)
    }

    /// Feed this fold's running result into a second fold
    ///
    /// After each element, this fold's current result (as its `end` would
    /// report it) becomes an element of the next fold. Requires this fold's
    /// state to be cloneable so finalization does not consume the run.
    fn pipe<G>(self, next: G) -> Pipe<Self, G>
    where
        G: Fold<Item = Self::Out, Error = Self::Error>,
        Self::State: Clone,
    {
        Pipe::new(self, next)
    }

    /// Send the state *before* each step to a sink
    fn observe_state<G>(self, sink: G) -> ObserveState<Self, G>
    where
        G: Fold<Item = Self::State, Out = (), Error = Self::Error>,
    {
        ObserveState::new(self, sink)
    }

    /// Send the state *after* each step to a sink
    fn observe_next_state<G>(self, sink: G) -> ObserveNextState<Self, G>
    where
        G: Fold<Item = Self::State, Out = (), Error = Self::Error>,
    {
        ObserveNextState::new(self, sink)
    }

    /// Send each element with the state before its step to a sink
    fn observe_with_state<G>(self, sink: G) -> ObserveWithState<Self, G>
    where
        G: Fold<Item = (Self::Item, Self::State), Out = (), Error = Self::Error>,
    {
        ObserveWithState::new(self, sink)
    }

    /// Send each element with the state after its step to a sink
    fn observe_with_next_state<G>(self, sink: G) -> ObserveWithNextState<Self, G>
    where
        G: Fold<Item = (Self::Item, Self::State), Out = (), Error = Self::Error>,
    {
        ObserveWithNextState::new(self, sink)
    }

    /// Lift the fold to consume containers of its element type
    ///
    /// Each container is folded on its own and the per-container results are
    /// merged monoidally.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::fold::{self, FoldExt};
    /// use freshet::monoid::Sum;
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let sums = fold::from_monoid_map(|n: i64| Sum(n)).nest::<Vec<i64>>();
    /// let batches = Producer::<Vec<i64>>::emit(vec![vec![1, 2], vec![3], vec![]]);
    /// assert_eq!(sums.run_stream(batches).run().await, Ok(Sum(6)));
    /// # });
    /// ```
    fn nest<C>(self) -> Nest<Self, C>
    where
        C: IntoIterator<Item = Self::Item>,
        Self::Out: Monoid,
    {
        Nest::new(self)
    }

    /// Run an action before the fold's own initialization
    fn start_with<F>(self, action: F) -> StartWith<Self, F>
    where
        F: Fn() -> Eff<(), Self::Error>,
    {
        StartWith::new(self, action)
    }

    /// Run an action after the fold's own finalization
    fn end_with<F>(self, action: F) -> EndWith<Self, F>
    where
        F: Fn() -> Eff<(), Self::Error>,
    {
        EndWith::new(self, action)
    }

    /// Widen the error type via `From`
    fn with_error<E2>(self) -> WithError<Self, E2>
    where
        E2: From<Self::Error> + Send + 'static,
    {
        WithError::new(self)
    }

    /// Run the fold over an in-memory sequence
    fn run<I>(&self, items: I) -> Eff<Self::Out, Self::Error>
    where
        Self: Clone + Send + 'static,
        I: IntoIterator<Item = Self::Item>,
    {
        let this = self.clone();
        let items: Vec<Self::Item> = items.into_iter().collect();
        self.start().and_then(move |state| {
            let state = items.into_iter().fold(state, |s, a| this.step(s, a));
            this.end(state)
        })
    }

    /// Run the fold over a single element
    fn run1(&self, item: Self::Item) -> Eff<Self::Out, Self::Error>
    where
        Self: Clone + Send + 'static,
    {
        let this = self.clone();
        self.start().and_then(move |state| {
            let state = this.step(state, item);
            this.end(state)
        })
    }

    /// Drive a producer to completion through this fold
    ///
    /// Pulls iteratively, so arbitrarily long streams use constant driver
    /// memory. Initialization runs before the first pull; finalization runs
    /// once the stream is done.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::fold::{self, FoldExt};
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let sum = fold::from_fold_left(0i64, |acc, n: i64| acc + n);
    /// let numbers = Producer::<i64>::emit(vec![1, 2, 3, 4]);
    /// assert_eq!(sum.run_stream(numbers).run().await, Ok(10));
    /// # });
    /// ```
    fn run_stream(&self, producer: Producer<Self::Item, Self::Error>) -> Eff<Self::Out, Self::Error>
    where
        Self: Clone + Send + 'static,
    {
        let this = self.clone();
        Eff::from_async(move || async move {
            let mut state = this.start().run().await?;
            let mut current = producer;
            loop {
                match current.pull().run().await? {
                    Stream::Done => break,
                    Stream::One(a) => {
                        state = this.step(state, a);
                        break;
                    }
                    Stream::More(batch, next) => {
                        for a in batch {
                            state = this.step(state, a);
                        }
                        current = next;
                    }
                }
            }
            this.end(state).run().await
        })
    }
}

impl<F: Fold> FoldExt for F {}
