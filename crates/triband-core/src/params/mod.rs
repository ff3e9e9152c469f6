//! Parameters - identities, declared ranges, lock-free store and snapshots
//!
//! - [`ParamId`] / [`ParamSpec`]: the 25 named parameters with their ranges
//! - [`ParameterStore`]: atomic storage written by the control thread
//! - [`ParamSnapshot`]: the plain-data copy the engine reads once per block

mod atomic;
mod format;
mod id;
mod snapshot;
mod store;

pub use atomic::AtomicF32;
pub use format::format_value;
pub use id::*;
pub use snapshot::{BandSettings, ParamSnapshot};
pub use store::{nearest_ratio_index, BandFlag, ParameterStore};
