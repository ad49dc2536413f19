//! Composable left folds
//!
//! A [`Fold`] packages how to consume a sequence: effectful initialization,
//! a pure per-element step, and effectful finalization. Folds compose in one
//! pass - fan out two folds over the same elements ([`FoldExt::zip`]), feed
//! one fold's running result into another ([`FoldExt::pipe`]), route the
//! sides of paired elements to different folds ([`FoldExt::par`]), or attach
//! observation sinks without changing the result.
//!
//! Drive a fold over an in-memory sequence with [`FoldExt::run`] or over a
//! [`Producer`](crate::stream::Producer) with [`FoldExt::run_stream`].
//!
//! # Examples
//!
//! ```
//! use freshet::fold::{self, FoldExt};
//! use freshet::stream::Producer;
//!
//! # tokio_test::block_on(async {
//! let sum = fold::from_fold_left(0i64, |acc, n: i64| acc + n);
//! let stats = sum.zip(fold::count());
//!
//! let numbers = Producer::<i64>::emit(vec![3, 1, 4, 1, 5]);
//! assert_eq!(stats.run_stream(numbers).run().await, Ok((14, 5)));
//! # });
//! ```

mod bracket;
pub mod combinators;
mod constructors;
mod ext;
mod sink;
mod trait_def;

pub use bracket::{bracket, BracketFold};
pub use constructors::{
    count, from_fold_left, from_monoid_map, from_sink, from_start, from_state_eval,
    from_state_exec, from_state_run, last, list, CountFold, FromFoldLeft, FromMonoidMap,
    FromSink, FromStart, FromState, LastFold, ListFold,
};
pub use ext::FoldExt;
pub use sink::Sink;
pub use trait_def::Fold;

#[cfg(test)]
mod tests;
