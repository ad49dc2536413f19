//! Adapter structs returned by [`FoldExt`](crate::fold::FoldExt)
//!
//! One file per concern. Each adapter implements [`Fold`](crate::fold::Fold)
//! by delegating to its inner fold(s); the composed state type never appears
//! in caller signatures.

mod around;
mod contramap;
mod map;
mod nest;
mod observe_state;
mod par;
mod pipe;
mod with_error;
mod zip;

pub use around::{EndWith, StartWith};
pub use contramap::ContraMap;
pub use map::{Map, MapFlatten};
pub use nest::Nest;
pub use observe_state::{
    ObserveNextState, ObserveState, ObserveWithNextState, ObserveWithState,
};
pub use par::Par;
pub use pipe::Pipe;
pub use with_error::WithError;
pub use zip::{Zip, ZipLeft, ZipRight};
