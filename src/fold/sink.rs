//! Marker trait for result-less folds

use crate::fold::Fold;

/// A fold whose result is `()`
///
/// Sinks exist for their effects: logging, counters, writing a side
/// channel. Anything satisfying `Fold<Out = ()>` is a sink, so this trait
/// is blanket-implemented and never implemented by hand. Attach one with
/// [`FoldExt::observe`](crate::fold::FoldExt::observe) or
/// [`Producer::observe`](crate::stream::Producer::observe).
pub trait Sink: Fold<Out = ()> {}

impl<F> Sink for F where F: Fold<Out = ()> {}
