//! Convenience re-exports for the common surface.

pub use crate::policy::lfu::LfuCache;
#[cfg(feature = "concurrency")]
pub use crate::sync::SharedLfuCache;
pub use crate::traits::{CoreCache, LfuCacheTrait, MutableCache, ReadOnlyCache};
