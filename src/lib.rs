//! # Freshet
//!
//! > *"A freshet is the rush of water that swells a stream"*
//!
//! A Rust library for lazy, effect-aware streaming and composable folds.
//!
//! ## Philosophy
//!
//! **Freshet** separates *describing* a data flow from *running* it:
//! - **Producers** describe possibly-infinite sequences, pulled one batched
//!   step at a time inside a deferred computation ([`Eff`]).
//! - **Folds** describe how to reduce a sequence to a value, and compose
//!   (fanout, piping, observation, resource bracketing) without ever
//!   traversing the input more than once.
//!
//! Nothing runs until a driver like [`FoldExt::run_stream`](fold::FoldExt::run_stream)
//! or [`Producer::into_list`](stream::Producer::into_list) is awaited.
//!
//! ## Quick Example
//!
//! ```rust
//! use freshet::stream::Producer;
//! use freshet::fold::{self, FoldExt};
//!
//! # tokio_test::block_on(async {
//! let numbers = Producer::<i32>::emit(vec![1, 2, 3, 4, 5]);
//!
//! // Two folds over one traversal: sum and count, paired.
//! let sum = fold::from_fold_left(0i64, |acc, n: i32| acc + i64::from(n));
//! let stats = sum.zip(fold::count());
//!
//! let result = stats.run_stream(numbers).run().await;
//! assert_eq!(result, Ok((15, 5)));
//! # });
//! ```
//!
//! ## Modules
//!
//! - [`eff`] - the deferred computation type everything else runs inside
//! - [`stream`] - pull-based, batched producers and their algebra
//! - [`fold`] - composable left-folds, sinks, and resource-scoped folds
//! - [`semigroup`] / [`monoid`] - combination traits used by monoidal folds

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod context;
pub mod eff;
pub mod fold;
pub mod monoid;
pub mod semigroup;
pub mod stream;

// Re-exports
pub use context::ContextError;
pub use eff::{Eff, EffContext, Panicked};
pub use monoid::Monoid;
pub use semigroup::Semigroup;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::ContextError;
    pub use crate::eff::{Eff, EffContext, Panicked};
    pub use crate::fold::{Fold, FoldExt, Sink};
    pub use crate::monoid::Monoid;
    pub use crate::semigroup::Semigroup;
    pub use crate::stream::{Producer, Stream};
}
