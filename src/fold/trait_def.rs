//! The fold abstraction

use crate::Eff;

/// A left fold with effectful initialization and finalization
///
/// A fold describes how to consume a sequence: [`start`](Fold::start)
/// produces the initial state (possibly opening a resource or failing),
/// [`step`](Fold::step) folds one element into the state as a pure function,
/// and [`end`](Fold::end) turns the final state into the result (possibly
/// closing a resource or failing).
///
/// The state type is an associated type, so composed folds keep their
/// internal bookkeeping out of caller signatures. Combinators live on
/// [`FoldExt`](crate::fold::FoldExt); constructors such as
/// [`from_fold_left`](crate::fold::from_fold_left) and
/// [`list`](crate::fold::list) build common folds without a manual impl.
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
pub trait Fold {
    /// The element type this fold consumes
    type Item: Clone + Send + Sync + 'static;
    /// The result type produced by [`end`](Fold::end)
    type Out: Send + 'static;
    /// The accumulator threaded through [`step`](Fold::step)
    type State: Send + 'static;
    /// The failure type of [`start`](Fold::start) and [`end`](Fold::end)
    type Error: Send + 'static;

    /// Produce the initial state
    fn start(&self) -> Eff<Self::State, Self::Error>;

    /// Fold one element into the state
    ///
    /// Pure by construction. Folds that need effects per element carry an
    /// [`Eff`] inside their state and chain onto it here.
    fn step(&self, state: Self::State, item: Self::Item) -> Self::State;

    /// Turn the final state into the result
    fn end(&self, state: Self::State) -> Eff<Self::Out, Self::Error>;
}
