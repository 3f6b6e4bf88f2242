use glam::Vec3;
use rand::Rng;
use rockfall_common::Region;
use std::f32::consts::FRAC_PI_2;

/// Inputs for seeding a fresh pool.
#[derive(Debug, Clone, Copy)]
pub struct SeedParams {
    pub spawn: Region,
    pub velocity: Region,
    pub lifetime: f32,
    /// Base render size of every particle.
    pub stone_size: f32,
    /// Relative size variance, `0.3` means ±30%.
    pub random_stone_scale: f32,
}

/// Inputs for one simulation step.
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    pub acceleration: Vec3,
    pub lifetime: f32,
    pub spawn: Region,
    pub velocity: Region,
}

/// Counters from one call to [`ParticlePool::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub alive: usize,
    pub dormant: usize,
    pub respawned: usize,
}

/// Fixed-capacity struct-of-arrays particle storage.
///
/// Every array has the same length and index `i` in each refers to the same
/// particle. Particles are recycled in place; the arrays never grow or
/// shrink once seeded.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    ages: Vec<f32>,
    opacities: Vec<f32>,
    rotations: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticlePool {
    /// Allocate `count` particles, all dormant with staggered ages.
    pub fn seed<R: Rng + ?Sized>(count: usize, params: &SeedParams, rng: &mut R) -> Self {
        let mut pool = Self {
            positions: Vec::with_capacity(count),
            velocities: Vec::with_capacity(count),
            ages: Vec::with_capacity(count),
            opacities: Vec::with_capacity(count),
            rotations: Vec::with_capacity(count),
            sizes: Vec::with_capacity(count),
        };
        let variance = params.stone_size * params.random_stone_scale;
        for _ in 0..count {
            pool.positions.push(params.spawn.sample(rng));
            pool.velocities.push(params.velocity.sample(rng));
            pool.ages.push(staggered_age(params.lifetime, rng));
            pool.opacities.push(0.0);
            pool.rotations.push(initial_rotation(rng));
            pool.sizes
                .push(params.stone_size + rng.random_range(-1.0..1.0) * variance);
        }
        pool
    }

    /// Advance every particle by `dt` seconds.
    ///
    /// Dormant particles only age. Live particles integrate velocity, then
    /// position, then spin; a particle whose age reaches `lifetime` is
    /// respawned dormant at a fresh random state within the same call.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        params: &StepParams,
        rng: &mut R,
    ) -> StepStats {
        let mut stats = StepStats::default();
        let dv = params.acceleration * dt;

        for i in 0..self.ages.len() {
            self.ages[i] += dt;
            if self.ages[i] < 0.0 {
                self.opacities[i] = 0.0;
                stats.dormant += 1;
                continue;
            }
            self.opacities[i] = 1.0;

            self.velocities[i] += dv;
            self.positions[i] += self.velocities[i] * dt;
            self.rotations[i] += dt;

            if self.ages[i] >= params.lifetime {
                self.respawn(i, params, rng);
                stats.respawned += 1;
                stats.dormant += 1;
            } else {
                stats.alive += 1;
            }
        }
        stats
    }

    fn respawn<R: Rng + ?Sized>(&mut self, i: usize, params: &StepParams, rng: &mut R) {
        self.positions[i] = params.spawn.sample(rng);
        self.velocities[i] = params.velocity.sample(rng);
        self.opacities[i] = 0.0;
        self.rotations[i] = initial_rotation(rng);
        self.ages[i] = staggered_age(params.lifetime, rng);
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions as a flat `3 × N` array, the layout render buffers expect.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn ages(&self) -> &[f32] {
        &self.ages
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    pub fn rotations(&self) -> &[f32] {
        &self.rotations
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn alive_count(&self) -> usize {
        self.ages.iter().filter(|&&age| age >= 0.0).count()
    }

    pub fn dormant_count(&self) -> usize {
        self.len() - self.alive_count()
    }

    /// Pull dormant ages below `-lifetime` up to `-lifetime`, so a shorter
    /// lifetime also shortens the wait of particles already scheduled.
    pub fn clamp_dormant_ages(&mut self, lifetime: f32) {
        for age in &mut self.ages {
            *age = age.max(-lifetime);
        }
    }

    /// Deterministic FNV-1a hash over the full pool state.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&(self.len() as u64).to_le_bytes());
        mix(bytemuck::cast_slice(&self.positions));
        mix(bytemuck::cast_slice(&self.velocities));
        mix(bytemuck::cast_slice(&self.ages));
        mix(bytemuck::cast_slice(&self.opacities));
        mix(bytemuck::cast_slice(&self.rotations));
        mix(bytemuck::cast_slice(&self.sizes));
        h
    }

    #[cfg(test)]
    pub(crate) fn ages_mut(&mut self) -> &mut [f32] {
        &mut self.ages
    }
}

/// Age in `[-lifetime, 0)`, so respawned particles reappear out of sync.
fn staggered_age<R: Rng + ?Sized>(lifetime: f32, rng: &mut R) -> f32 {
    rng.random_range(-lifetime..0.0)
}

fn initial_rotation<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(-FRAC_PI_2..FRAC_PI_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const LIFETIME: f32 = 1.0;

    fn seed_params() -> SeedParams {
        SeedParams {
            spawn: Region::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 1.0, 0.3)),
            velocity: Region::new(Vec3::new(0.0, 0.0, -0.5), Vec3::ONE),
            lifetime: LIFETIME,
            stone_size: 1.2,
            random_stone_scale: 0.3,
        }
    }

    fn step_params() -> StepParams {
        let seed = seed_params();
        StepParams {
            acceleration: Vec3::new(0.0, 0.0, -9.8),
            lifetime: LIFETIME,
            spawn: seed.spawn,
            velocity: seed.velocity,
        }
    }

    #[test]
    fn seeded_pool_is_dormant_and_staggered() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = ParticlePool::seed(500, &seed_params(), &mut rng);

        assert_eq!(pool.len(), 500);
        assert_eq!(pool.positions_flat().len(), 1500);
        assert_eq!(pool.dormant_count(), 500);
        for i in 0..pool.len() {
            assert!((-LIFETIME..0.0).contains(&pool.ages()[i]));
            assert_eq!(pool.opacities()[i], 0.0);
            assert!(pool.rotations()[i].abs() <= FRAC_PI_2);
            assert!((0.84..=1.56).contains(&pool.sizes()[i]));
        }
    }

    #[test]
    fn arrays_keep_their_length_across_steps() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = ParticlePool::seed(2000, &seed_params(), &mut rng);
        let params = step_params();
        for _ in 0..200 {
            pool.advance(1.0 / 60.0, &params, &mut rng);
        }
        assert_eq!(pool.len(), 2000);
        assert_eq!(pool.positions().len(), 2000);
        assert_eq!(pool.velocities().len(), 2000);
        assert_eq!(pool.opacities().len(), 2000);
        assert_eq!(pool.rotations().len(), 2000);
        assert_eq!(pool.sizes().len(), 2000);
    }

    #[test]
    fn opacity_tracks_dormancy_every_frame() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = ParticlePool::seed(300, &seed_params(), &mut rng);
        let params = step_params();
        for _ in 0..120 {
            pool.advance(0.05, &params, &mut rng);
            for i in 0..pool.len() {
                let dormant = pool.ages()[i] < 0.0;
                assert_eq!(dormant, pool.opacities()[i] == 0.0, "particle {i}");
                assert!(pool.ages()[i] >= -LIFETIME && pool.ages()[i] < LIFETIME);
            }
        }
    }

    #[test]
    fn live_particle_integrates_with_forward_euler() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = ParticlePool::seed(1, &seed_params(), &mut rng);
        pool.ages_mut()[0] = 0.2;
        let p0 = pool.positions()[0];
        let v0 = pool.velocities()[0];
        let r0 = pool.rotations()[0];
        let params = step_params();
        let dt = 0.1;

        let stats = pool.advance(dt, &params, &mut rng);

        let v1 = v0 + params.acceleration * dt;
        assert_eq!(stats.alive, 1);
        assert!((pool.velocities()[0] - v1).length() < 1e-5);
        assert!((pool.positions()[0] - (p0 + v1 * dt)).length() < 1e-5);
        assert!((pool.rotations()[0] - (r0 + dt)).abs() < 1e-6);
        assert_eq!(pool.opacities()[0], 1.0);
    }

    #[test]
    fn expired_particle_respawns_inside_regions() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = ParticlePool::seed(64, &seed_params(), &mut rng);
        for age in pool.ages_mut() {
            *age = 0.95;
        }
        let params = step_params();

        let stats = pool.advance(0.1, &params, &mut rng);

        assert_eq!(stats.respawned, 64);
        for i in 0..pool.len() {
            assert!((-LIFETIME..0.0).contains(&pool.ages()[i]));
            assert_eq!(pool.opacities()[i], 0.0);
            assert!(params.spawn.contains(pool.positions()[i]));
            assert!(params.velocity.contains(pool.velocities()[i]));
            assert!(pool.rotations()[i].abs() <= FRAC_PI_2);
        }
    }

    #[test]
    fn sizes_are_fixed_after_seeding() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut pool = ParticlePool::seed(100, &seed_params(), &mut rng);
        let sizes = pool.sizes().to_vec();
        let params = step_params();
        for _ in 0..100 {
            pool.advance(0.1, &params, &mut rng);
        }
        assert_eq!(pool.sizes(), sizes.as_slice());
    }

    #[test]
    fn same_seed_same_state_hash() {
        let params = step_params();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = ParticlePool::seed(256, &seed_params(), &mut rng);
            for _ in 0..30 {
                pool.advance(1.0 / 30.0, &params, &mut rng);
            }
            pool.state_hash()
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn clamp_only_touches_long_waits() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = ParticlePool::seed(4, &seed_params(), &mut rng);
        pool.ages_mut().copy_from_slice(&[-0.9, -0.2, 0.3, 0.7]);

        pool.clamp_dormant_ages(0.5);
        assert_eq!(pool.ages(), &[-0.5, -0.2, 0.3, 0.7]);
        assert_eq!(pool.dormant_count(), 2);
    }

    #[test]
    fn empty_pool_is_fine() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pool = ParticlePool::seed(0, &seed_params(), &mut rng);
        assert!(pool.is_empty());
        let stats = pool.advance(0.1, &step_params(), &mut rng);
        assert_eq!(stats, StepStats::default());
    }
}
