//! Effect sink backends.

pub mod memory;

pub use memory::{EffectTotals, InMemoryEffectLedger};
