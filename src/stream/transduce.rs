//! Shape-changing stream operations
//!
//! Chunking, sliding windows, flattening, and observation sinks. These
//! re-batch or re-group elements; the element-wise algebra lives on
//! [`Producer`] itself.

use crate::fold::Fold;
use crate::stream::{Producer, Stream};
use crate::Eff;

impl<A, E> Producer<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Regroup elements into fixed-size chunks
    ///
    /// Every chunk has exactly `size` elements except possibly the last,
    /// which holds the remainder. `size == 0` gives the empty producer.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let p = Producer::<i32>::emit(vec![1, 2, 3, 4, 5]).chunks(2);
    /// assert_eq!(
    ///     p.into_list().run().await,
    ///     Ok(vec![vec![1, 2], vec![3, 4], vec![5]])
    /// );
    /// # });
    /// ```
    pub fn chunks(self, size: usize) -> Producer<Vec<A>, E> {
        chunk_from(self, size, Vec::new())
    }

    /// Overlapping windows of `size` consecutive elements
    ///
    /// Windows advance one element at a time. A stream shorter than `size`
    /// yields its elements as one partial window; once any full window has
    /// been emitted, no partial window follows. `size == 0` gives the empty
    /// producer.
    ///
    /// # Examples
    ///
    /// ```
    /// use freshet::stream::Producer;
    ///
    /// # tokio_test::block_on(async {
    /// let p = Producer::<i32>::emit(vec![1, 2, 3, 4]).sliding(3);
    /// assert_eq!(
    ///     p.into_list().run().await,
    ///     Ok(vec![vec![1, 2, 3], vec![2, 3, 4]])
    /// );
    /// # });
    /// ```
    pub fn sliding(self, size: usize) -> Producer<Vec<A>, E> {
        sliding_from(self, size, Vec::new(), false)
    }

    /// Pass every element through a result-less fold, unchanged
    ///
    /// The sink's `start` runs on the first pull, its `step` sees each
    /// element as it flows past, and its `end` runs when the stream
    /// completes. The observed producer yields exactly the same elements.
    pub fn observe<F>(self, sink: F) -> Producer<A, E>
    where
        F: Fold<Item = A, Out = (), Error = E> + Clone + Send + Sync + 'static,
        F::State: Clone + Sync,
    {
        Producer::new(move || {
            let source = self.clone();
            let sink = sink.clone();
            sink.start()
                .and_then(move |state| observe_from(source, sink, state).pull())
        })
    }
}

impl<A, E> Producer<Producer<A, E>, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Concatenate a producer of producers in order
    pub fn flatten(self) -> Producer<A, E> {
        self.flat_map(|inner| inner)
    }
}

impl<A, E> Producer<Vec<A>, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Concatenate a producer of vectors into their elements, in order
    ///
    /// Inverse of [`Producer::chunks`] up to batching.
    pub fn flatten_vec(self) -> Producer<A, E> {
        self.flat_map(Producer::emit)
    }
}

/// Chunking continuation carrying the elements buffered so far
///
/// Invariant: `buffer.len() < size` on entry (except through the public
/// entry point with `size == 0`, handled explicitly).
fn chunk_from<A, E>(source: Producer<A, E>, size: usize, buffer: Vec<A>) -> Producer<Vec<A>, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    Producer::new(move || {
        if size == 0 {
            return Eff::pure(Stream::Done);
        }
        let buffer = buffer.clone();
        source.pull().and_then(move |step| match step {
            Stream::Done => Eff::pure(flush_chunks(buffer, size)),
            Stream::One(a) => {
                let mut buffer = buffer;
                buffer.push(a);
                Eff::pure(flush_chunks(buffer, size))
            }
            Stream::More(batch, next) => {
                let mut buffer = buffer;
                buffer.extend(batch);
                let mut groups: Vec<Vec<A>> = Vec::new();
                while buffer.len() >= size {
                    let rest = buffer.split_off(size);
                    groups.push(std::mem::replace(&mut buffer, rest));
                }
                let tail = chunk_from(next, size, buffer);
                if groups.is_empty() {
                    tail.pull()
                } else {
                    Eff::pure(Stream::More(groups, tail))
                }
            }
        })
    })
}

/// Split a final buffer into full chunks plus a trailing partial chunk
fn flush_chunks<A, E>(mut buffer: Vec<A>, size: usize) -> Stream<Vec<A>, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    let mut groups: Vec<Vec<A>> = Vec::new();
    while buffer.len() > size {
        let rest = buffer.split_off(size);
        groups.push(std::mem::replace(&mut buffer, rest));
    }
    if !buffer.is_empty() {
        groups.push(buffer);
    }
    step_of(groups)
}

/// The stream step holding exactly the given elements
fn step_of<A, E>(mut items: Vec<A>) -> Stream<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    match items.len() {
        0 => Stream::Done,
        1 => match items.pop() {
            Some(a) => Stream::One(a),
            None => Stream::Done,
        },
        _ => Stream::More(items, Producer::done()),
    }
}

/// Sliding-window continuation
///
/// `window` holds the elements of the next window gathered so far; `emitted`
/// records whether any full window has been produced, which suppresses the
/// trailing partial window.
fn sliding_from<A, E>(
    source: Producer<A, E>,
    size: usize,
    window: Vec<A>,
    emitted: bool,
) -> Producer<Vec<A>, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
{
    Producer::new(move || {
        if size == 0 {
            return Eff::pure(Stream::Done);
        }
        let window = window.clone();
        source.clone().peek().and_then(move |(head, rest)| match head {
            None => {
                if !emitted && !window.is_empty() {
                    Eff::pure(Stream::One(window))
                } else {
                    Eff::pure(Stream::Done)
                }
            }
            Some(a) => {
                let mut window = window;
                window.push(a);
                if window.len() == size {
                    let full = window.clone();
                    window.remove(0);
                    Eff::pure(Stream::More(
                        vec![full],
                        sliding_from(rest, size, window, true),
                    ))
                } else {
                    sliding_from(rest, size, window, emitted).pull()
                }
            }
        })
    })
}

/// Observation continuation threading the sink's state alongside the stream
fn observe_from<A, E, F>(source: Producer<A, E>, sink: F, state: F::State) -> Producer<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Send + 'static,
    F: Fold<Item = A, Out = (), Error = E> + Clone + Send + Sync + 'static,
    F::State: Clone + Sync,
{
    Producer::new(move || {
        let sink = sink.clone();
        let state = state.clone();
        source.pull().and_then(move |step| match step {
            Stream::Done => sink.end(state).map(|_| Stream::Done),
            Stream::One(a) => {
                let state = sink.step(state, a.clone());
                sink.end(state).map(move |_| Stream::One(a))
            }
            Stream::More(batch, next) => {
                let state = batch
                    .iter()
                    .cloned()
                    .fold(state, |state, a| sink.step(state, a));
                Eff::pure(Stream::More(batch, observe_from(next, sink, state)))
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fold;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_chunks_even_split() {
        let p = Producer::<i32>::emit(vec![1, 2, 3, 4]).chunks(2);
        assert_eq!(
            p.into_list().run().await,
            Ok(vec![vec![1, 2], vec![3, 4]])
        );
    }

    #[tokio::test]
    async fn test_chunks_partial_last() {
        let p = Producer::<i32>::emit(vec![1, 2, 3, 4, 5]).chunks(2);
        assert_eq!(
            p.into_list().run().await,
            Ok(vec![vec![1, 2], vec![3, 4], vec![5]])
        );
    }

    #[tokio::test]
    async fn test_chunks_spanning_batches() {
        // Chunk boundaries ignore how the source was batched.
        let p = Producer::<i32>::emit(vec![1])
            .append(Producer::emit(vec![2, 3, 4]))
            .append(Producer::one(5))
            .chunks(3);
        assert_eq!(
            p.into_list().run().await,
            Ok(vec![vec![1, 2, 3], vec![4, 5]])
        );
    }

    #[tokio::test]
    async fn test_chunks_size_zero_is_done() {
        let p = Producer::<i32>::emit(vec![1, 2, 3]).chunks(0);
        assert_eq!(p.into_list().run().await, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_chunks_of_empty_is_empty() {
        let p = Producer::<i32>::done().chunks(2);
        assert_eq!(p.into_list().run().await, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_sliding_overlapping_windows() {
        let p = Producer::<i32>::emit(vec![1, 2, 3, 4]).sliding(2);
        assert_eq!(
            p.into_list().run().await,
            Ok(vec![vec![1, 2], vec![2, 3], vec![3, 4]])
        );
    }

    #[tokio::test]
    async fn test_sliding_short_stream_partial_window() {
        let p = Producer::<i32>::emit(vec![1, 2]).sliding(3);
        assert_eq!(p.into_list().run().await, Ok(vec![vec![1, 2]]));
    }

    #[tokio::test]
    async fn test_sliding_exact_length_no_trailing_partial() {
        let p = Producer::<i32>::emit(vec![1, 2, 3]).sliding(3);
        assert_eq!(p.into_list().run().await, Ok(vec![vec![1, 2, 3]]));
    }

    #[tokio::test]
    async fn test_sliding_size_zero_is_done() {
        let p = Producer::<i32>::emit(vec![1, 2]).sliding(0);
        assert_eq!(p.into_list().run().await, Ok(vec![]));
    }

    #[tokio::test]
    async fn test_flatten_concatenates() {
        let p = Producer::<Producer<i32>>::emit(vec![
            Producer::emit(vec![1, 2]),
            Producer::done(),
            Producer::one(3),
        ])
        .flatten();
        assert_eq!(p.into_list().run().await, Ok(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_flatten_vec_undoes_chunks() {
        let p = Producer::<i32>::emit(vec![1, 2, 3, 4, 5]).chunks(2).flatten_vec();
        assert_eq!(p.into_list().run().await, Ok(vec![1, 2, 3, 4, 5]));
    }

    #[tokio::test]
    async fn test_observe_leaves_elements_unchanged() {
        let seen = Arc::new(AtomicI32::new(0));
        let probe = seen.clone();
        let sink = fold::from_sink(move |n: i32| {
            let probe = probe.clone();
            Eff::from_fn(move || {
                probe.fetch_add(n, Ordering::SeqCst);
                Ok(())
            })
        });
        let p = Producer::<i32>::emit(vec![1, 2, 3]).observe(sink);
        assert_eq!(p.into_list().run().await, Ok(vec![1, 2, 3]));
        assert_eq!(seen.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_observe_empty_stream_still_ends_sink() {
        let counted = Arc::new(AtomicI32::new(0));
        let probe = counted.clone();
        let sink = fold::from_sink(move |_n: i32| {
            let probe = probe.clone();
            Eff::from_fn(move || {
                probe.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        });
        let p = Producer::<i32>::done().observe(sink);
        assert_eq!(p.into_list().run().await, Ok(vec![]));
        assert_eq!(counted.load(Ordering::SeqCst), 0);
    }
}
