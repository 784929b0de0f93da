//! Infrastructure adapters for effect delivery.

pub mod effects;

pub use effects::{EffectTotals, InMemoryEffectLedger};
