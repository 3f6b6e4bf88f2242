//! Developer tooling: effect inspector, host frame clock, update timing.
//!
//! # Invariants
//! - Inspection is read-only.
//! - Frame time is measured here, by the host, and handed to the kernel as a
//!   plain delta.

mod clock;
mod inspector;

pub use clock::{FrameClock, UpdateSample, UpdateTimer};
pub use inspector::{EffectInspector, EffectSummary, ParticleInfo};
