//! Core producer type and its element-wise algebra

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use crate::Eff;

type GenFn<A, E> = Arc<dyn Fn() -> Eff<Stream<A, E>, E> + Send + Sync>;

/// One observed step of a producer
///
/// Pulling a [`Producer`] yields one of three shapes: the sequence is over,
/// exactly one element remains, or a non-empty batch is available together
/// with a continuation for the rest.
///
/// Well-formed combinators never emit `More` with an empty batch; consumers
/// that encounter one anyway treat it as a defensive stop rather than loop.
pub enum Stream<A, E = Infallible> {
    /// The sequence has no more elements
    Done,
    /// Exactly one element remains, then the sequence ends
    One(A),
    /// A batch of elements, followed by the rest of the sequence
    More(Vec<A>, Producer<A, E>),
}

impl<A: fmt::Debug, E> fmt::Debug for Stream<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Done => write!(f, "Done"),
            Stream::One(a) => f.debug_tuple("One").field(a).finish(),
            Stream::More(batch, _) => f
                .debug_tuple("More")
                .field(batch)
                .field(&"<producer>")
                .finish(),
        }
    }
}

/// A lazy, re-runnable, effectful sequence of elements
///
/// A producer wraps a generator function returning an [`Eff`] that resolves to
/// the next [`Stream`] step. Nothing runs until a consumer pulls. Cloning is
/// cheap (the generator is shared behind an `Arc`), and every pull re-invokes
/// the generator, so re-running a producer repeats its effects.
///
/// # Examples
///
/// ```
/// use freshet::stream::Producer;
///
/// # tokio_test::block_on(async {
/// let p = Producer::<i32>::emit(vec![1, 2, 3]);
/// assert_eq!(p.clone().into_list().run().await, Ok(vec![1, 2, 3]));
/// // A clone replays the same sequence.
/// assert_eq!(p.into_list().run().await, Ok(vec![1, 2, 3]));
/// # });
/// ```
pub struct Producer<A, E = Infallible> {
    gen: GenFn<A, E>,
}

impl<A, E> Clone for Producer<A, E> {
    fn clone(&self) -> Self {
        Producer {
            gen: Arc::clone(&self.gen),
        }
    }
}

impl<A, E> fmt::Debug for Producer<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("gen", &"<generator>")
            .finish()
    }
}

impl<A, E> Producer<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Create a producer from a generator function
    ///
    /// The generator runs once per pull; it must be safe to invoke any number
    /// of times.
    pub fn new<F>(gen: F) -> Self
    where
        F: Fn() -> Eff<Stream<A, E>, E> + Send + Sync + 'static,
    {
        Producer { gen: Arc::new(gen) }
    }

    /// Run the generator, resolving one step of the sequence
    pub fn pull(&self) -> Eff<Stream<A, E>, E> {
        (self.gen)()
    }

    /// The empty producer
    pub fn done() -> Self {
        Producer::new(|| Eff::pure(Stream::Done))
    }

    /// A producer of exactly one element
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let p = Producer::<&str>::one("hello");
    /// assert_eq!(p.into_list().run().await, Ok(vec!["hello"]));
    /// # });
    /// ```
    pub fn one(value: A) -> Self {
        Producer::new(move || Eff::pure(Stream::One(value.clone())))
    }

    /// A producer of a guaranteed-non-empty batch
    pub fn one_or_more(head: A, rest: Vec<A>) -> Self {
        let mut batch = Vec::with_capacity(1 + rest.len());
        batch.push(head);
        batch.extend(rest);
        Producer::new(move || Eff::pure(Stream::More(batch.clone(), Producer::done())))
    }

    /// A producer over the elements of a vector
    ///
    /// Empty input gives [`Producer::done`], a single element gives
    /// [`Producer::one`], and anything longer is emitted as one batch.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let p = Producer::<i32>::emit(vec![1, 2, 3]);
    /// assert_eq!(p.into_list().run().await, Ok(vec![1, 2, 3]));
    /// # });
    /// ```
    pub fn emit(values: Vec<A>) -> Self {
        let mut iter = values.into_iter();
        match (iter.next(), iter.next()) {
            (None, _) => Producer::done(),
            (Some(a), None) => Producer::one(a),
            (Some(a), Some(b)) => {
                let mut batch = vec![a, b];
                batch.extend(iter);
                Producer::new(move || Eff::pure(Stream::More(batch.clone(), Producer::done())))
            }
        }
    }

    /// A single-element producer whose element comes from an effect
    ///
    /// The recipe runs once per pull, so a clone of this producer re-runs the
    /// effect.
    pub fn eval<F>(recipe: F) -> Self
    where
        F: Fn() -> Eff<A, E> + Send + Sync + 'static,
    {
        Producer::new(move || recipe().map(Stream::One))
    }

    /// An infinite producer that re-runs an effect for every element
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::{Eff, stream::Producer};
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// # tokio_test::block_on(async {
    /// let counter = Arc::new(AtomicI32::new(0));
    /// let source = counter.clone();
    /// let ticks = Producer::<i32>::repeat_eval(move || {
    ///     let source = source.clone();
    ///     Eff::from_fn(move || Ok(source.fetch_add(1, Ordering::SeqCst)))
    /// });
    ///
    /// // Zip against a finite producer to take the first three ticks.
    /// let taken = ticks.zip(Producer::emit(vec![(), (), ()])).map(|(n, _)| n);
    /// assert_eq!(taken.into_list().run().await, Ok(vec![0, 1, 2]));
    /// # });
    /// ```
    pub fn repeat_eval<F>(recipe: F) -> Self
    where
        F: Fn() -> Eff<A, E> + Clone + Send + Sync + 'static,
    {
        Producer::new(move || {
            let again = Producer::repeat_eval(recipe.clone());
            recipe().map(move |a| Stream::More(vec![a], again))
        })
    }

    /// An infinite producer repeating a single value
    pub fn repeat_value(value: A) -> Self {
        Producer::new(move || {
            let again = Producer::repeat_value(value.clone());
            Eff::pure(Stream::More(vec![value.clone()], again))
        })
    }

    /// Cycle this producer forever
    ///
    /// Each pass re-runs the producer's effects. An empty producer stays
    /// empty rather than looping.
    pub fn repeat(self) -> Self {
        Producer::new(move || {
            let restart = self.clone();
            self.pull().and_then(move |step| match step {
                Stream::Done => Eff::pure(Stream::Done),
                Stream::One(a) => Eff::pure(Stream::More(vec![a], restart.repeat())),
                Stream::More(batch, next) => {
                    Eff::pure(Stream::More(batch, next.append(restart.repeat())))
                }
            })
        })
    }

    /// Concatenate this producer with itself `n` times
    ///
    /// `fill(0)` is the empty producer. Each pass re-runs the producer's
    /// effects.
    pub fn fill(self, n: usize) -> Self {
        Producer::new(move || {
            if n == 0 {
                Eff::pure(Stream::Done)
            } else {
                self.clone().append(self.clone().fill(n - 1)).pull()
            }
        })
    }

    /// This producer followed by another
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let p = Producer::<i32>::emit(vec![1, 2]).append(Producer::emit(vec![3]));
    /// assert_eq!(p.into_list().run().await, Ok(vec![1, 2, 3]));
    /// # });
    /// ```
    pub fn append(self, other: Producer<A, E>) -> Self {
        Producer::new(move || {
            let tail = other.clone();
            self.pull().and_then(move |step| match step {
                Stream::Done => tail.pull(),
                Stream::One(a) => Eff::pure(Stream::More(vec![a], tail)),
                Stream::More(batch, next) => Eff::pure(Stream::More(batch, next.append(tail))),
            })
        })
    }

    /// Transform every element with a pure function
    pub fn map<B, F>(self, f: F) -> Producer<B, E>
    where
        B: Clone + Send + Sync + 'static,
        F: Fn(A) -> B + Clone + Send + Sync + 'static,
    {
        Producer::new(move || {
            let f = f.clone();
            self.pull().map(move |step| match step {
                Stream::Done => Stream::Done,
                Stream::One(a) => Stream::One(f(a)),
                Stream::More(batch, next) => {
                    let mapped: Vec<B> = batch.into_iter().map(|a| f(a)).collect();
                    Stream::More(mapped, next.map(f.clone()))
                }
            })
        })
    }

    /// Expand every element into its own producer, concatenated in order
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let p = Producer::<i32>::emit(vec![1, 2, 3])
    ///     .flat_map(|n| Producer::emit(vec![n, n * 10]));
    /// assert_eq!(p.into_list().run().await, Ok(vec![1, 10, 2, 20, 3, 30]));
    /// # });
    /// ```
    pub fn flat_map<B, F>(self, f: F) -> Producer<B, E>
    where
        B: Clone + Send + Sync + 'static,
        F: Fn(A) -> Producer<B, E> + Clone + Send + Sync + 'static,
    {
        // Elements that expand to nothing are skipped in a loop rather than
        // by recursing into the continuation's pull, so a long run of empty
        // expansions costs constant depth.
        Producer::new(move || {
            let f = f.clone();
            let source = self.clone();
            Eff::from_async(move || async move {
                let mut current = source;
                loop {
                    match current.pull().run().await? {
                        Stream::Done => return Ok(Stream::Done),
                        Stream::One(a) => return f(a).pull().run().await,
                        Stream::More(batch, next) => {
                            let mut elems = batch.into_iter();
                            loop {
                                let a = match elems.next() {
                                    Some(a) => a,
                                    None => break,
                                };
                                match f(a).pull().run().await? {
                                    Stream::Done => continue,
                                    Stream::One(b) => {
                                        let tail = requeue(elems.collect(), next);
                                        return Ok(Stream::More(
                                            vec![b],
                                            tail.flat_map(f.clone()),
                                        ));
                                    }
                                    Stream::More(expanded, inner) => {
                                        let tail = requeue(elems.collect(), next);
                                        return Ok(Stream::More(
                                            expanded,
                                            inner.append(tail.flat_map(f.clone())),
                                        ));
                                    }
                                }
                            }
                            current = next;
                        }
                    }
                }
            })
        })
    }

    /// Keep only the elements satisfying a predicate
    ///
    /// A batch whose elements are all dropped is skipped entirely, never
    /// surfaced as an empty batch. Consecutive all-dropped batches are
    /// skipped in a loop, so depth stays constant however many there are.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&A) -> bool + Clone + Send + Sync + 'static,
    {
        Producer::new(move || {
            let predicate = predicate.clone();
            let source = self.clone();
            Eff::from_async(move || async move {
                let mut current = source;
                loop {
                    match current.pull().run().await? {
                        Stream::Done => return Ok(Stream::Done),
                        Stream::One(a) => {
                            return Ok(if predicate(&a) {
                                Stream::One(a)
                            } else {
                                Stream::Done
                            })
                        }
                        Stream::More(batch, next) => {
                            let kept: Vec<A> =
                                batch.into_iter().filter(|a| predicate(a)).collect();
                            if kept.is_empty() {
                                current = next;
                            } else {
                                return Ok(Stream::More(kept, next.filter(predicate.clone())));
                            }
                        }
                    }
                }
            })
        })
    }

    /// Pair elements of two producers positionally, stopping at the shorter
    ///
    /// Batches of different sizes are split at the shorter length and the
    /// remainder is pushed back in front of the longer side's continuation,
    /// so pairing is strictly positional regardless of how either side was
    /// batched.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let p = Producer::<i32>::emit(vec![1, 2, 3]).zip(Producer::emit(vec!["a", "b"]));
    /// assert_eq!(p.into_list().run().await, Ok(vec![(1, "a"), (2, "b")]));
    /// # });
    /// ```
    pub fn zip<B>(self, other: Producer<B, E>) -> Producer<(A, B), E>
    where
        B: Clone + Send + Sync + 'static,
    {
        Producer::new(move || {
            let right = other.clone();
            self.pull()
                .and_then(move |left_step| {
                    right
                        .pull()
                        .and_then(move |right_step| zip_step(left_step, right_step))
                })
        })
    }

    /// Split off the first element, returning it with a producer of the rest
    ///
    /// Runs effects up to (and including) the pull that resolves the first
    /// element. Returns `None` when the producer is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let (head, rest) = Producer::<i32>::emit(vec![1, 2, 3]).peek().run().await?;
    /// assert_eq!(head, Some(1));
    /// assert_eq!(rest.into_list().run().await?, vec![2, 3]);
    /// # Ok::<(), std::convert::Infallible>(())
    /// # });
    /// ```
    pub fn peek(self) -> Eff<(Option<A>, Producer<A, E>), E> {
        self.pull().and_then(|step| match step {
            Stream::Done => Eff::pure((None, Producer::done())),
            Stream::One(a) => Eff::pure((Some(a), Producer::done())),
            Stream::More(batch, next) => {
                let mut iter = batch.into_iter();
                match iter.next() {
                    None => next.peek(),
                    Some(head) => Eff::pure((Some(head), requeue(iter.collect(), next))),
                }
            }
        })
    }

    /// Collect every element into a vector
    ///
    /// Drives the producer iteratively, so memory for the driver is constant
    /// regardless of stream length (the collected vector itself grows, of
    /// course). Must not be called on an infinite producer.
    pub fn into_list(self) -> Eff<Vec<A>, E> {
        Eff::from_async(move || async move {
            let mut out = Vec::new();
            let mut current = self;
            loop {
                match current.pull().run().await? {
                    Stream::Done => break,
                    Stream::One(a) => {
                        out.push(a);
                        break;
                    }
                    Stream::More(batch, next) => {
                        out.extend(batch);
                        current = next;
                    }
                }
            }
            Ok(out)
        })
    }

    /// Run the producer to completion, keeping only the final element
    pub fn last(self) -> Eff<Option<A>, E> {
        Eff::from_async(move || async move {
            let mut last = None;
            let mut current = self;
            loop {
                match current.pull().run().await? {
                    Stream::Done => break,
                    Stream::One(a) => {
                        last = Some(a);
                        break;
                    }
                    Stream::More(batch, next) => {
                        if let Some(a) = batch.into_iter().last() {
                            last = Some(a);
                        }
                        current = next;
                    }
                }
            }
            Ok(last)
        })
    }
}

/// Push unconsumed elements back in front of a continuation
fn requeue<A, E>(rest: Vec<A>, next: Producer<A, E>) -> Producer<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    if rest.is_empty() {
        next
    } else {
        Producer::emit(rest).append(next)
    }
}

/// Resolve one zip step from a step of each side
///
/// `One` is treated as a batch of one with an empty continuation. A `More`
/// with an empty batch is treated as terminal.
fn zip_step<A, B, E>(left: Stream<A, E>, right: Stream<B, E>) -> Eff<Stream<(A, B), E>, E>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    match (left, right) {
        (Stream::Done, _) | (_, Stream::Done) => Eff::pure(Stream::Done),
        (Stream::One(a), Stream::One(b)) => Eff::pure(Stream::One((a, b))),
        (Stream::One(a), Stream::More(bs, _)) => Eff::pure(match bs.into_iter().next() {
            Some(b) => Stream::One((a, b)),
            None => Stream::Done,
        }),
        (Stream::More(batch, _), Stream::One(b)) => Eff::pure(match batch.into_iter().next() {
            Some(a) => Stream::One((a, b)),
            None => Stream::Done,
        }),
        (Stream::More(mut left_batch, left_next), Stream::More(mut right_batch, right_next)) => {
            if left_batch.is_empty() || right_batch.is_empty() {
                return Eff::pure(Stream::Done);
            }
            let n = left_batch.len().min(right_batch.len());
            let left_rest = left_batch.split_off(n);
            let right_rest = right_batch.split_off(n);
            let pairs: Vec<(A, B)> = left_batch.into_iter().zip(right_batch).collect();
            let next = if !left_rest.is_empty() {
                Producer::emit(left_rest).append(left_next).zip(right_next)
            } else if !right_rest.is_empty() {
                left_next.zip(Producer::emit(right_rest).append(right_next))
            } else {
                left_next.zip(right_next)
            };
            Eff::pure(Stream::More(pairs, next))
        }
    }
}
