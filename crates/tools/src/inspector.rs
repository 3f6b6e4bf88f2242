use glam::Vec3;
use rockfall_common::EffectId;
use rockfall_kernel::Rockfall;

/// Effect inspector for developer tooling.
///
/// Provides read-only queries against an effect for debugging and
/// development UI.
pub struct EffectInspector;

impl EffectInspector {
    /// Produce a summary of the effect state.
    pub fn summary(effect: &Rockfall) -> EffectSummary {
        let pool = effect.pool();
        let alive = pool.alive_count();
        EffectSummary {
            id: effect.id(),
            particle_count: pool.len(),
            alive,
            dormant: pool.len() - alive,
            lifetime: effect.lifetime(),
            running: effect.is_running(),
            visible: effect.is_visible(),
        }
    }

    /// Full state of one particle.
    pub fn inspect_particle(effect: &Rockfall, index: usize) -> Option<ParticleInfo> {
        let pool = effect.pool();
        if index >= pool.len() {
            return None;
        }
        Some(ParticleInfo {
            index,
            position: pool.positions()[index],
            velocity: pool.velocities()[index],
            age: pool.ages()[index],
            opacity: pool.opacities()[index],
            rotation: pool.rotations()[index],
            size: pool.sizes()[index],
        })
    }

    /// Mean position of the live particles, if any.
    pub fn alive_centroid(effect: &Rockfall) -> Option<Vec3> {
        let pool = effect.pool();
        let (sum, n) = pool
            .positions()
            .iter()
            .zip(pool.ages())
            .filter(|(_, age)| **age >= 0.0)
            .fold((Vec3::ZERO, 0usize), |(sum, n), (p, _)| (sum + *p, n + 1));
        (n > 0).then(|| sum / n as f32)
    }
}

/// Summary of effect state for the inspector.
#[derive(Debug, Clone)]
pub struct EffectSummary {
    pub id: EffectId,
    pub particle_count: usize,
    pub alive: usize,
    pub dormant: usize,
    pub lifetime: f32,
    pub running: bool,
    pub visible: bool,
}

impl std::fmt::Display for EffectSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rockfall [{}]: particles={} alive={} dormant={} lifetime={:.2}s running={} visible={}",
            self.id,
            self.particle_count,
            self.alive,
            self.dormant,
            self.lifetime,
            self.running,
            self.visible
        )
    }
}

/// Detailed info about a single particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleInfo {
    pub index: usize,
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub opacity: f32,
    pub rotation: f32,
    pub size: f32,
}

impl std::fmt::Display for ParticleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Particle #{} pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) age={:+.3} opacity={} rot={:+.2} size={:.2}",
            self.index,
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.age,
            self.opacity,
            self.rotation,
            self.size,
        )
    }
}
