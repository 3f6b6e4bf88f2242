use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rockfall_common::{DirtyBuffers, EffectId};
use serde::{Deserialize, Serialize};

use crate::emitter::{Emitter, EmitterOptions};
use crate::pool::{ParticlePool, SeedParams, StepParams, StepStats};
use crate::{GRAVITY, MIN_DELTA_TIME};

/// Construction-time parameters of a rockfall effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    pub particle_count: usize,
    /// Seconds a particle stays alive before it is recycled.
    pub lifetime: f32,
    /// Scene units per metre. Scales gravity, spreads and emission speed.
    pub scene_scale: f32,
    pub stone_size: f32,
    pub random_stone_scale: f32,
    /// RNG seed. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            particle_count: 2000,
            lifetime: 1.5,
            scene_scale: 1.0,
            stone_size: 1.2,
            random_stone_scale: 0.3,
            seed: None,
        }
    }
}

/// A falling-rock particle effect.
///
/// Owns its pool, emitter and random source; nothing is shared between
/// instances. The host calls [`Rockfall::update`] once per frame with the
/// frame's delta time, then uploads whatever the returned flags mark dirty.
#[derive(Debug)]
pub struct Rockfall {
    id: EffectId,
    settings: EffectSettings,
    emitter: Emitter,
    pool: ParticlePool,
    rng: StdRng,
    running: bool,
    visible: bool,
    dirty: DirtyBuffers,
    last_step: StepStats,
}

impl Rockfall {
    pub fn new(mut settings: EffectSettings, options: &EmitterOptions) -> Self {
        let defaults = EffectSettings::default();
        if !(settings.lifetime.is_finite() && settings.lifetime > 0.0) {
            tracing::warn!(lifetime = settings.lifetime, "invalid lifetime, using default");
            settings.lifetime = defaults.lifetime;
        }
        if !(settings.scene_scale.is_finite() && settings.scene_scale > 0.0) {
            tracing::warn!(scene_scale = settings.scene_scale, "invalid scene scale, using default");
            settings.scene_scale = defaults.scene_scale;
        }

        let mut emitter = Emitter::new(settings.scene_scale);
        emitter.apply(options);

        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let pool = ParticlePool::seed(
            settings.particle_count,
            &seed_params(&settings, &emitter),
            &mut rng,
        );

        let id = EffectId::new();
        tracing::info!(
            %id,
            particles = settings.particle_count,
            lifetime = settings.lifetime,
            "rockfall created"
        );

        Self {
            id,
            settings,
            emitter,
            pool,
            rng,
            running: true,
            visible: true,
            dirty: DirtyBuffers::ALL,
            last_step: StepStats::default(),
        }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Does nothing while stopped or when `dt` is below [`MIN_DELTA_TIME`]
    /// (or not finite); the returned flags are then clean.
    pub fn update(&mut self, dt: f32) -> DirtyBuffers {
        if !self.running || !dt.is_finite() || dt < MIN_DELTA_TIME {
            return DirtyBuffers::CLEAN;
        }
        let _span = tracing::trace_span!("rockfall_update", id = %self.id).entered();

        let params = StepParams {
            acceleration: self.acceleration(),
            lifetime: self.settings.lifetime,
            spawn: self.emitter.spawn_region(),
            velocity: self.emitter.velocity_region(),
        };
        let stats = self.pool.advance(dt, &params, &mut self.rng);
        self.last_step = stats;

        tracing::trace!(
            dt,
            alive = stats.alive,
            dormant = stats.dormant,
            respawned = stats.respawned,
            "rockfall step"
        );

        self.dirty = self.dirty.merge(DirtyBuffers::DYNAMIC);
        DirtyBuffers::DYNAMIC
    }

    /// Return the accumulated dirty flags and clear them.
    pub fn take_dirty(&mut self) -> DirtyBuffers {
        std::mem::take(&mut self.dirty)
    }

    pub fn dirty(&self) -> DirtyBuffers {
        self.dirty
    }

    /// Counters from the most recent update that actually stepped.
    pub fn last_step(&self) -> StepStats {
        self.last_step
    }

    /// Resume updates.
    pub fn play(&mut self) {
        self.running = true;
    }

    /// Freeze all particles in place. Ages stop advancing.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hide from the drawing stage. Updates keep running.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Change the lifetime used from the next update on. Non-positive or
    /// non-finite values are ignored.
    ///
    /// Shrinking the lifetime clamps pending dormant ages to `-value`; live
    /// particles past the new lifetime respawn on the next update.
    pub fn set_lifetime(&mut self, value: f32) {
        if value.is_finite() && value > 0.0 {
            if value < self.settings.lifetime {
                self.pool.clamp_dormant_ages(value);
            }
            self.settings.lifetime = value;
        } else {
            tracing::debug!(value, "ignoring invalid lifetime");
        }
    }

    pub fn lifetime(&self) -> f32 {
        self.settings.lifetime
    }

    /// Reallocate the pool with `count` particles and reseed all of them.
    pub fn set_particle_count(&mut self, count: usize) {
        self.settings.particle_count = count;
        self.pool = ParticlePool::seed(
            count,
            &seed_params(&self.settings, &self.emitter),
            &mut self.rng,
        );
        self.dirty = DirtyBuffers::ALL;
        tracing::info!(id = %self.id, particles = count, "rockfall pool reseeded");
    }

    pub fn particle_count(&self) -> usize {
        self.pool.len()
    }

    pub fn set_velocity_spread(&mut self, value: f32) {
        self.emitter.set_velocity_spread(value);
    }

    pub fn velocity_spread(&self) -> f32 {
        self.emitter.velocity_spread()
    }

    /// Apply a sparse emitter update; unset fields keep their values.
    pub fn set_options(&mut self, options: &EmitterOptions) {
        self.emitter.apply(options);
        tracing::debug!(
            id = %self.id,
            emit_velocity = ?self.emitter.emit_velocity(),
            "rockfall options applied"
        );
    }

    /// Constant acceleration applied to live particles.
    pub fn acceleration(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, -GRAVITY * self.settings.scene_scale)
    }

    /// Point size multiplier for the drawing stage.
    pub fn point_scale(&self) -> f32 {
        self.emitter.gis_zoom()
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Release the particle buffers.
    pub fn destroy(self) {
        tracing::info!(id = %self.id, particles = self.pool.len(), "rockfall destroyed");
    }

    #[cfg(test)]
    pub(crate) fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }
}

fn seed_params(settings: &EffectSettings, emitter: &Emitter) -> SeedParams {
    SeedParams {
        spawn: emitter.spawn_region(),
        velocity: emitter.velocity_region(),
        lifetime: settings.lifetime,
        stone_size: settings.stone_size,
        random_stone_scale: settings.random_stone_scale,
    }
}
