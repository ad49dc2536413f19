//! Pull-based, batched, effectful streams
//!
//! A [`Producer`] is a *description* of a possibly-infinite sequence: nothing
//! runs until it is pulled. Each pull resolves to one [`Stream`] step - the
//! sequence is finished (`Done`), has exactly one element left (`One`), or
//! yields a non-empty batch plus a continuation (`More`).
//!
//! Producers are cheap to clone and re-runnable; re-running repeats whatever
//! effects the generator performs (there is no memoization). Consumption is
//! single-pass and strictly left-to-right, driven either by the iterative
//! collectors here ([`Producer::into_list`], [`Producer::last`]) or by a
//! [`Fold`](crate::fold::Fold) via
//! [`run_stream`](crate::fold::FoldExt::run_stream).
//!
//! # Examples
//!
//! ```
//! use freshet::stream::Producer;
//!
//! # tokio_test::block_on(async {
//! let evens = Producer::<i32>::emit(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * 10);
//!
//! assert_eq!(evens.into_list().run().await, Ok(vec![20, 40, 60]));
//! # });
//! ```

mod producer;
mod transduce;

pub use producer::{Producer, Stream};
