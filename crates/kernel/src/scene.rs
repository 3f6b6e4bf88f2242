use rockfall_common::{DirtyBuffers, EffectId};
use std::collections::BTreeMap;

use crate::effect::Rockfall;

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no effect with id {0} in scene")]
    UnknownEffect(EffectId),
}

/// Host-side scene node owning a set of independent effects.
///
/// Effects are iterated in id order so a frame touches them in the same
/// sequence on every platform.
#[derive(Debug, Default)]
pub struct EffectScene {
    effects: BTreeMap<EffectId, Rockfall>,
    frame: u64,
}

impl EffectScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an effect. Returns its id.
    pub fn add(&mut self, effect: Rockfall) -> EffectId {
        let id = effect.id();
        self.effects.insert(id, effect);
        tracing::debug!(%id, total = self.effects.len(), "effect attached");
        id
    }

    pub fn get(&self, id: EffectId) -> Option<&Rockfall> {
        self.effects.get(&id)
    }

    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut Rockfall> {
        self.effects.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = EffectId> + '_ {
        self.effects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rockfall> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame: update every effect with the same `dt`.
    pub fn update(&mut self, dt: f32) -> Vec<(EffectId, DirtyBuffers)> {
        self.frame += 1;
        self.effects
            .iter_mut()
            .map(|(id, effect)| (*id, effect.update(dt)))
            .collect()
    }

    /// Detach an effect and release its buffers.
    pub fn destroy(&mut self, id: EffectId) -> Result<(), SceneError> {
        let effect = self
            .effects
            .remove(&id)
            .ok_or(SceneError::UnknownEffect(id))?;
        effect.destroy();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EffectSettings, EmitterOptions};

    fn effect(seed: u64) -> Rockfall {
        Rockfall::new(
            EffectSettings {
                particle_count: 32,
                seed: Some(seed),
                ..EffectSettings::default()
            },
            &EmitterOptions::default(),
        )
    }

    #[test]
    fn scene_starts_empty() {
        let scene = EffectScene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.frame(), 0);
    }

    #[test]
    fn add_and_destroy() {
        let mut scene = EffectScene::new();
        let id = scene.add(effect(1));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());

        scene.destroy(id).unwrap();
        assert!(scene.is_empty());
        assert!(scene.get(id).is_none());
    }

    #[test]
    fn destroy_unknown_effect_errors() {
        let mut scene = EffectScene::new();
        let err = scene.destroy(EffectId::new()).unwrap_err();
        assert!(matches!(err, SceneError::UnknownEffect(_)));
    }

    #[test]
    fn update_reaches_every_effect() {
        let mut scene = EffectScene::new();
        let a = scene.add(effect(1));
        let b = scene.add(effect(2));
        scene.get_mut(b).unwrap().stop();

        let flags = scene.update(0.1);
        assert_eq!(scene.frame(), 1);
        assert_eq!(flags.len(), 2);
        for (id, dirty) in flags {
            if id == a {
                assert_eq!(dirty, DirtyBuffers::DYNAMIC);
            } else {
                assert!(dirty.is_clean());
            }
        }
    }

    #[test]
    fn effects_are_independent() {
        let mut scene = EffectScene::new();
        let a = scene.add(effect(5));
        let b = scene.add(effect(5));
        let hash_b = scene.get(b).unwrap().pool().state_hash();

        scene.get_mut(a).unwrap().update(0.2);
        assert_eq!(scene.get(b).unwrap().pool().state_hash(), hash_b);
    }

    #[test]
    fn ids_iterate_in_order() {
        let mut scene = EffectScene::new();
        for seed in 0..10 {
            scene.add(effect(seed));
        }
        let ids: Vec<EffectId> = scene.ids().collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
