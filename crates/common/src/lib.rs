//! Shared types used across the rockfall crates.

mod types;

pub use types::{DirtyBuffers, EffectId, Region};
