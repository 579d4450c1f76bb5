//! freqcache: bounded in-memory LFU cache with O(1) operations.
//!
//! Evicts the least frequently used entry when full, breaking frequency ties
//! by least-recent touch. Built for fronting lookups of immutable records:
//! miss → fetch from the backing store → insert; invalidate with `remove`
//! whenever the authoritative record changes.

pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
#[cfg(feature = "concurrency")]
pub mod sync;
pub mod traits;

pub use policy::lfu::LfuCache;
#[cfg(feature = "concurrency")]
pub use sync::SharedLfuCache;
