//! Rockfall kernel: a fixed-size particle pool advanced by explicit Euler
//! integration under constant gravity, recycling expired particles.
//!
//! # Invariants
//! - Pool arrays share one length and are indexed in lockstep; particles are
//!   reset, never added or removed, except by an explicit resize.
//! - A particle with negative age is dormant and fully transparent.
//! - Respawn resets position, velocity, opacity, rotation and age together.
//! - The kernel holds no timers; the host passes the frame delta in.

pub mod effect;
pub mod emitter;
pub mod pool;
pub mod scene;

pub use effect::{EffectSettings, Rockfall};
pub use emitter::{Emitter, EmitterOptions};
pub use pool::{ParticlePool, SeedParams, StepParams, StepStats};
pub use scene::{EffectScene, SceneError};

/// Frame steps shorter than this are ignored.
pub const MIN_DELTA_TIME: f32 = 1e-4;

/// Gravitational acceleration in m/s², before scene scaling.
pub const GRAVITY: f32 = 9.8;
