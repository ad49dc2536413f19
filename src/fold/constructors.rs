//! Ready-made folds
//!
//! Constructors for the common cases: pure accumulator folds, monoidal
//! folds, state-machine folds, effect-per-element sinks, and the stock
//! collectors ([`list`], [`count`], [`last`]).

use std::fmt;
use std::marker::PhantomData;

use crate::fold::combinators::Map;
use crate::fold::{Fold, FoldExt};
use crate::{Eff, Monoid};

/// A fold from an initial value and a pure step function
///
/// # Examples
///
/// ```
/// use freshet::fold::{self, FoldExt};
/// use freshet::stream::Producer;
///
/// # tokio_test::block_on(async {
/// let max = fold::from_fold_left(i64::MIN, |acc: i64, n: i64| acc.max(n));
/// let numbers = Producer::<i64>::emit(vec![3, 9, 4]);
/// assert_eq!(max.run_stream(numbers).run().await, Ok(9));
/// # });
/// ```
pub fn from_fold_left<A, B, E, Fun>(init: B, f: Fun) -> FromFoldLeft<A, B, E, Fun>
where
    Fun: Fn(B, A) -> B,
{
    FromFoldLeft {
        init,
        f,
        _marker: PhantomData,
    }
}

/// Fold returned by [`from_fold_left`]
pub struct FromFoldLeft<A, B, E, Fun> {
    init: B,
    f: Fun,
    _marker: PhantomData<fn(A) -> E>,
}

impl<A, B: Clone, E, Fun: Clone> Clone for FromFoldLeft<A, B, E, Fun> {
    fn clone(&self) -> Self {
        FromFoldLeft {
            init: self.init.clone(),
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, B: fmt::Debug, E, Fun> fmt::Debug for FromFoldLeft<A, B, E, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFoldLeft")
            .field("init", &self.init)
            .field("f", &"<function>")
            .finish()
    }
}

impl<A, B, E, Fun> Fold for FromFoldLeft<A, B, E, Fun>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + 'static,
    E: Send + 'static,
    Fun: Fn(B, A) -> B + Clone + Send + Sync + 'static,
{
    type Item = A;
    type Out = B;
    type State = B;
    type Error = E;

    fn start(&self) -> Eff<B, E> {
        Eff::pure(self.init.clone())
    }

    fn step(&self, state: B, item: A) -> B {
        (self.f)(state, item)
    }

    fn end(&self, state: B) -> Eff<B, E> {
        Eff::pure(state)
    }
}

/// A fold mapping each element into a monoid and combining the results
///
/// # Examples
///
/// ```
/// use freshet::fold::{self, FoldExt};
/// use freshet::monoid::Sum;
/// use freshet::stream::Producer;
///
/// # tokio_test::block_on(async {
/// let total = fold::from_monoid_map(|s: String| Sum(s.len() as u64));
/// let words = Producer::<String>::emit(vec!["ab".to_string(), "cde".to_string()]);
/// assert_eq!(total.run_stream(words).run().await, Ok(Sum(5)));
/// # });
/// ```
pub fn from_monoid_map<A, M, E, Fun>(f: Fun) -> FromMonoidMap<A, M, E, Fun>
where
    Fun: Fn(A) -> M,
{
    FromMonoidMap {
        f,
        _marker: PhantomData,
    }
}

/// Fold returned by [`from_monoid_map`]
pub struct FromMonoidMap<A, M, E, Fun> {
    f: Fun,
    _marker: PhantomData<fn(A) -> (M, E)>,
}

impl<A, M, E, Fun: Clone> Clone for FromMonoidMap<A, M, E, Fun> {
    fn clone(&self) -> Self {
        FromMonoidMap {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, M, E, Fun> fmt::Debug for FromMonoidMap<A, M, E, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromMonoidMap")
            .field("f", &"<function>")
            .finish()
    }
}

impl<A, M, E, Fun> Fold for FromMonoidMap<A, M, E, Fun>
where
    A: Clone + Send + Sync + 'static,
    M: Monoid + Send + 'static,
    E: Send + 'static,
    Fun: Fn(A) -> M + Clone + Send + Sync + 'static,
{
    type Item = A;
    type Out = M;
    type State = M;
    type Error = E;

    fn start(&self) -> Eff<M, E> {
        Eff::pure(M::empty())
    }

    fn step(&self, state: M, item: A) -> M {
        state.combine((self.f)(item))
    }

    fn end(&self, state: M) -> Eff<M, E> {
        Eff::pure(state)
    }
}

/// A fold driving a state machine that also emits an output per element
///
/// The result pairs the final state with the last output, if any element
/// was seen.
///
/// # Examples
///
/// ```
/// use freshet::fold::{self, FoldExt};
/// use freshet::stream::Producer;
///
/// # tokio_test::block_on(async {
/// // Running total, emitting each intermediate total.
/// let running = fold::from_state_run(0i64, |acc, n: i64| (acc + n, acc + n));
/// let numbers = Producer::<i64>::emit(vec![1, 2, 3]);
/// assert_eq!(running.run_stream(numbers).run().await, Ok((6, Some(6))));
/// # });
/// ```
pub fn from_state_run<A, S, O, E, Fun>(init: S, f: Fun) -> FromState<A, S, O, E, Fun>
where
    Fun: Fn(S, A) -> (S, O),
{
    FromState {
        init,
        f,
        _marker: PhantomData,
    }
}

/// A state-machine fold keeping only the final state
pub fn from_state_exec<A, S, O, E, Fun>(
    init: S,
    f: Fun,
) -> Map<FromState<A, S, O, E, Fun>, fn((S, Option<O>)) -> S>
where
    A: Clone + Send + Sync + 'static,
    S: Clone + Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
    Fun: Fn(S, A) -> (S, O) + Clone + Send + Sync + 'static,
{
    from_state_run(init, f).map(final_state::<S, O> as fn((S, Option<O>)) -> S)
}

/// A state-machine fold keeping only the last emitted output
pub fn from_state_eval<A, S, O, E, Fun>(
    init: S,
    f: Fun,
) -> Map<FromState<A, S, O, E, Fun>, fn((S, Option<O>)) -> Option<O>>
where
    A: Clone + Send + Sync + 'static,
    S: Clone + Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
    Fun: Fn(S, A) -> (S, O) + Clone + Send + Sync + 'static,
{
    from_state_run(init, f).map(last_output::<S, O> as fn((S, Option<O>)) -> Option<O>)
}

fn final_state<S, O>(run: (S, Option<O>)) -> S {
    run.0
}

fn last_output<S, O>(run: (S, Option<O>)) -> Option<O> {
    run.1
}

/// Fold returned by [`from_state_run`]
pub struct FromState<A, S, O, E, Fun> {
    init: S,
    f: Fun,
    _marker: PhantomData<fn(A) -> (O, E)>,
}

impl<A, S: Clone, O, E, Fun: Clone> Clone for FromState<A, S, O, E, Fun> {
    fn clone(&self) -> Self {
        FromState {
            init: self.init.clone(),
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, S: fmt::Debug, O, E, Fun> fmt::Debug for FromState<A, S, O, E, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromState")
            .field("init", &self.init)
            .field("f", &"<function>")
            .finish()
    }
}

impl<A, S, O, E, Fun> Fold for FromState<A, S, O, E, Fun>
where
    A: Clone + Send + Sync + 'static,
    S: Clone + Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
    Fun: Fn(S, A) -> (S, O) + Clone + Send + Sync + 'static,
{
    type Item = A;
    type Out = (S, Option<O>);
    type State = (S, Option<O>);
    type Error = E;

    fn start(&self) -> Eff<Self::State, E> {
        Eff::pure((self.init.clone(), None))
    }

    fn step(&self, state: Self::State, item: A) -> Self::State {
        let (s, _) = state;
        let (s, o) = (self.f)(s, item);
        (s, Some(o))
    }

    fn end(&self, state: Self::State) -> Eff<Self::Out, E> {
        Eff::pure(state)
    }
}

/// A fold whose "state" is a single effect run at initialization
///
/// Elements are ignored; the result is whatever the effect produced. Useful
/// as the identity for piping and for folds that only care about setup.
pub fn from_start<A, B, E, Fun>(action: Fun) -> FromStart<A, B, E, Fun>
where
    Fun: Fn() -> Eff<B, E>,
{
    FromStart {
        action,
        _marker: PhantomData,
    }
}

/// Fold returned by [`from_start`]
pub struct FromStart<A, B, E, Fun> {
    action: Fun,
    _marker: PhantomData<fn(A) -> (B, E)>,
}

impl<A, B, E, Fun: Clone> Clone for FromStart<A, B, E, Fun> {
    fn clone(&self) -> Self {
        FromStart {
            action: self.action.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, B, E, Fun> fmt::Debug for FromStart<A, B, E, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromStart")
            .field("action", &"<action>")
            .finish()
    }
}

impl<A, B, E, Fun> Fold for FromStart<A, B, E, Fun>
where
    A: Clone + Send + Sync + 'static,
    B: Send + 'static,
    E: Send + 'static,
    Fun: Fn() -> Eff<B, E> + Send + Sync + 'static,
{
    type Item = A;
    type Out = B;
    type State = Eff<B, E>;
    type Error = E;

    fn start(&self) -> Eff<Self::State, E> {
        Eff::pure((self.action)())
    }

    fn step(&self, state: Self::State, _item: A) -> Self::State {
        state
    }

    fn end(&self, state: Self::State) -> Eff<B, E> {
        state
    }
}

/// A sink running an effect for every element
///
/// Elements are gathered during the run and their effects execute in order
/// at finalization, so the state stays cloneable and the sink can also be
/// attached to a producer with
/// [`Producer::observe`](crate::stream::Producer::observe).
///
/// # Examples
///
/// ```
/// use freshet::{Eff, fold::{self, FoldExt}};
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let total = Arc::new(AtomicI64::new(0));
/// let probe = total.clone();
/// let sink = fold::from_sink(move |n: i64| {
///     let probe = probe.clone();
///     Eff::from_fn(move || {
///         probe.fetch_add(n, Ordering::SeqCst);
///         Ok(())
///     })
/// });
/// let numbers = freshet::stream::Producer::<i64>::emit(vec![1, 2, 3]);
/// assert_eq!(sink.run_stream(numbers).run().await, Ok(()));
/// assert_eq!(total.load(Ordering::SeqCst), 6);
/// # });
/// ```
pub fn from_sink<A, E, Fun>(f: Fun) -> FromSink<A, E, Fun>
where
    Fun: Fn(A) -> Eff<(), E>,
{
    FromSink {
        f,
        _marker: PhantomData,
    }
}

/// Fold returned by [`from_sink`]
pub struct FromSink<A, E, Fun> {
    f: Fun,
    _marker: PhantomData<fn(A) -> E>,
}

impl<A, E, Fun: Clone> Clone for FromSink<A, E, Fun> {
    fn clone(&self) -> Self {
        FromSink {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, E, Fun> fmt::Debug for FromSink<A, E, Fun> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromSink")
            .field("f", &"<function>")
            .finish()
    }
}

impl<A, E, Fun> Fold for FromSink<A, E, Fun>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
    Fun: Fn(A) -> Eff<(), E> + Clone + Send + Sync + 'static,
{
    type Item = A;
    type Out = ();
    type State = Vec<A>;
    type Error = E;

    fn start(&self) -> Eff<Vec<A>, E> {
        Eff::pure(Vec::new())
    }

    fn step(&self, mut state: Vec<A>, item: A) -> Vec<A> {
        state.push(item);
        state
    }

    fn end(&self, state: Vec<A>) -> Eff<(), E> {
        let f = self.f.clone();
        Eff::from_async(move || async move {
            for item in state {
                f(item).run().await?;
            }
            Ok(())
        })
    }
}

/// A fold collecting every element into a vector
pub fn list<A, E>() -> ListFold<A, E> {
    ListFold {
        _marker: PhantomData,
    }
}

/// Fold returned by [`list`]
pub struct ListFold<A, E> {
    _marker: PhantomData<fn(A) -> E>,
}

impl<A, E> Clone for ListFold<A, E> {
    fn clone(&self) -> Self {
        ListFold {
            _marker: PhantomData,
        }
    }
}

impl<A, E> fmt::Debug for ListFold<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListFold").finish()
    }
}

impl<A, E> Fold for ListFold<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    type Item = A;
    type Out = Vec<A>;
    type State = Vec<A>;
    type Error = E;

    fn start(&self) -> Eff<Vec<A>, E> {
        Eff::pure(Vec::new())
    }

    fn step(&self, mut state: Vec<A>, item: A) -> Vec<A> {
        state.push(item);
        state
    }

    fn end(&self, state: Vec<A>) -> Eff<Vec<A>, E> {
        Eff::pure(state)
    }
}

/// A fold counting its elements
///
/// # Examples
///
/// ```
/// use freshet::fold::{self, FoldExt};
/// use freshet::stream::Producer;
///
/// # tokio_test::block_on(async {
/// let names = Producer::<&str>::emit(vec!["a", "b", "c"]);
/// assert_eq!(fold::count().run_stream(names).run().await, Ok(3));
/// # });
/// ```
pub fn count<A, E>() -> CountFold<A, E> {
    CountFold {
        _marker: PhantomData,
    }
}

/// Fold returned by [`count`]
pub struct CountFold<A, E> {
    _marker: PhantomData<fn(A) -> E>,
}

impl<A, E> Clone for CountFold<A, E> {
    fn clone(&self) -> Self {
        CountFold {
            _marker: PhantomData,
        }
    }
}

impl<A, E> fmt::Debug for CountFold<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountFold").finish()
    }
}

impl<A, E> Fold for CountFold<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    type Item = A;
    type Out = usize;
    type State = usize;
    type Error = E;

    fn start(&self) -> Eff<usize, E> {
        Eff::pure(0)
    }

    fn step(&self, state: usize, _item: A) -> usize {
        state + 1
    }

    fn end(&self, state: usize) -> Eff<usize, E> {
        Eff::pure(state)
    }
}

/// A fold keeping only the last element, if any
pub fn last<A, E>() -> LastFold<A, E> {
    LastFold {
        _marker: PhantomData,
    }
}

/// Fold returned by [`last`]
pub struct LastFold<A, E> {
    _marker: PhantomData<fn(A) -> E>,
}

impl<A, E> Clone for LastFold<A, E> {
    fn clone(&self) -> Self {
        LastFold {
            _marker: PhantomData,
        }
    }
}

impl<A, E> fmt::Debug for LastFold<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastFold").finish()
    }
}

impl<A, E> Fold for LastFold<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    type Item = A;
    type Out = Option<A>;
    type State = Option<A>;
    type Error = E;

    fn start(&self) -> Eff<Option<A>, E> {
        Eff::pure(None)
    }

    fn step(&self, _state: Option<A>, item: A) -> Option<A> {
        Some(item)
    }

    fn end(&self, state: Option<A>) -> Eff<Option<A>, E> {
        Eff::pure(state)
    }
}
