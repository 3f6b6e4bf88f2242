use glam::Vec3;
use rockfall_common::Region;
use serde::{Deserialize, Serialize};

/// Vertical squash applied to the spawn volume.
const VERTICAL_SPREAD_FACTOR: f32 = 0.3;

/// Offset added to any intensity supplied through [`EmitterOptions`].
const INTENSITY_BIAS: f32 = 0.1;

/// Size multiplier used when the effect is placed in a GIS scene.
pub const GIS_ZOOM: f32 = 1000.0;

/// Sparse emitter update. Absent (or non-finite) fields keep their
/// previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmitterOptions {
    /// Tilt of the emission direction away from straight down, in radians.
    pub origin_pitch: Option<f32>,
    /// Heading of the emission direction around the vertical axis, in radians.
    pub origin_yaw: Option<f32>,
    /// Half-extent of the spawn volume, in scene units.
    pub spread: Option<f32>,
    /// Half-extent of the random velocity added to the emission velocity.
    pub velocity_spread: Option<f32>,
    /// Emission speed.
    pub origin_intensity: Option<f32>,
    /// World-space center of the spawn volume.
    pub origin_position: Option<Vec3>,
    /// Switch the GIS size multiplier on or off.
    pub is_gis: Option<bool>,
}

/// Current emitter state and the emission velocity derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    scene_scale: f32,
    origin_pitch: f32,
    origin_yaw: f32,
    origin_intensity: f32,
    origin_position: Vec3,
    position_spread: f32,
    velocity_spread: f32,
    gis_zoom: f32,
    emit_velocity: Vec3,
}

impl Emitter {
    /// Create an emitter at its defaults. A non-positive or non-finite
    /// `scene_scale` is replaced by `1.0`.
    pub fn new(scene_scale: f32) -> Self {
        let scene_scale = if scene_scale.is_finite() && scene_scale > 0.0 {
            scene_scale
        } else {
            1.0
        };
        let mut emitter = Self {
            scene_scale,
            origin_pitch: 0.0,
            origin_yaw: 0.0,
            origin_intensity: 0.5,
            origin_position: Vec3::ZERO,
            position_spread: scene_scale,
            velocity_spread: scene_scale,
            gis_zoom: 1.0,
            emit_velocity: Vec3::ZERO,
        };
        emitter.recompute_emission();
        emitter
    }

    /// Apply the fields present in `opts`, then rederive the emission velocity.
    pub fn apply(&mut self, opts: &EmitterOptions) {
        if let Some(pitch) = finite(opts.origin_pitch) {
            self.origin_pitch = pitch;
        }
        if let Some(yaw) = finite(opts.origin_yaw) {
            self.origin_yaw = yaw;
        }
        if let Some(spread) = finite(opts.spread) {
            self.position_spread = spread * self.scene_scale;
        }
        if let Some(spread) = finite(opts.velocity_spread) {
            self.velocity_spread = spread * self.scene_scale;
        }
        if let Some(intensity) = finite(opts.origin_intensity) {
            self.origin_intensity = intensity + INTENSITY_BIAS;
        }
        if let Some(is_gis) = opts.is_gis {
            self.gis_zoom = if is_gis { GIS_ZOOM } else { 1.0 };
        }
        if let Some(origin) = opts.origin_position.filter(|p| p.is_finite()) {
            self.origin_position = origin;
        }
        self.recompute_emission();
    }

    fn recompute_emission(&mut self) {
        let (sin_p, cos_p) = self.origin_pitch.sin_cos();
        let (sin_y, cos_y) = self.origin_yaw.sin_cos();
        // Pitch 0 emits straight down the -Z axis.
        let direction = Vec3::new(sin_p * cos_y, sin_p * sin_y, -cos_p);
        self.emit_velocity = direction * self.origin_intensity * self.scene_scale;
    }

    /// Volume new particles appear in, flattened along the vertical axis.
    pub fn spawn_region(&self) -> Region {
        let s = self.position_spread;
        Region::new(
            self.origin_position,
            Vec3::new(s, s, s * VERTICAL_SPREAD_FACTOR),
        )
    }

    /// Volume initial velocities are drawn from.
    pub fn velocity_region(&self) -> Region {
        Region::new(self.emit_velocity, Vec3::splat(self.velocity_spread))
    }

    pub fn set_velocity_spread(&mut self, value: f32) {
        if value.is_finite() {
            self.velocity_spread = value * self.scene_scale;
        }
    }

    /// Velocity spread in unscaled units, as it was set.
    pub fn velocity_spread(&self) -> f32 {
        self.velocity_spread / self.scene_scale
    }

    pub fn emit_velocity(&self) -> Vec3 {
        self.emit_velocity
    }

    pub fn origin_position(&self) -> Vec3 {
        self.origin_position
    }

    pub fn origin_pitch(&self) -> f32 {
        self.origin_pitch
    }

    pub fn origin_yaw(&self) -> f32 {
        self.origin_yaw
    }

    pub fn origin_intensity(&self) -> f32 {
        self.origin_intensity
    }

    pub fn position_spread(&self) -> f32 {
        self.position_spread
    }

    pub fn gis_zoom(&self) -> f32 {
        self.gis_zoom
    }

    pub fn scene_scale(&self) -> f32 {
        self.scene_scale
    }
}

fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}
