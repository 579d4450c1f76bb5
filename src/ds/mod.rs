pub mod frequency_buckets;
pub mod slot_arena;

pub use frequency_buckets::FrequencyLedger;
pub use slot_arena::{SlotArena, SlotId};
