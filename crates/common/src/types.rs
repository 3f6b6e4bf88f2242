use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one effect instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub Uuid);

impl EffectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.8}", &self.0.to_string()[..8])
    }
}

/// Axis-aligned sampling volume: `center ± half_extents` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Region {
    /// Slack for float rounding in `contains`.
    const TOLERANCE: f32 = 1e-4;

    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Draw a uniformly distributed point inside the region.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let u = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        self.center + self.half_extents * u
    }

    pub fn contains(&self, p: Vec3) -> bool {
        let limit = self.half_extents.abs() + Vec3::splat(Self::TOLERANCE);
        (p - self.center).abs().cmple(limit).all()
    }
}

/// Needs-upload markers for the per-particle render buffers.
///
/// The simulation only raises flags; whoever owns the GPU side decides when
/// and how the bytes move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyBuffers {
    pub position: bool,
    pub opacity: bool,
    pub rotation: bool,
    pub size: bool,
}

impl DirtyBuffers {
    pub const CLEAN: Self = Self {
        position: false,
        opacity: false,
        rotation: false,
        size: false,
    };

    /// Attributes rewritten by every simulation step.
    pub const DYNAMIC: Self = Self {
        position: true,
        opacity: true,
        rotation: true,
        size: false,
    };

    pub const ALL: Self = Self {
        position: true,
        opacity: true,
        rotation: true,
        size: true,
    };

    pub fn merge(self, other: Self) -> Self {
        Self {
            position: self.position || other.position,
            opacity: self.opacity || other.opacity,
            rotation: self.rotation || other.rotation,
            size: self.size || other.size,
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::CLEAN
    }
}
