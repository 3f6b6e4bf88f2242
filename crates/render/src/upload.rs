use rockfall_common::DirtyBuffers;
use rockfall_kernel::ParticlePool;

/// One vertex attribute whose bytes must be re-sent to the GPU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeUpload<'a> {
    /// Attribute name as bound in the point shader.
    pub name: &'static str,
    /// Components per particle.
    pub item_size: usize,
    pub bytes: &'a [u8],
}

/// Collect byte views of every attribute `dirty` marks for upload.
pub fn attribute_uploads<'a>(pool: &'a ParticlePool, dirty: DirtyBuffers) -> Vec<AttributeUpload<'a>> {
    let mut uploads = Vec::with_capacity(4);
    if dirty.position {
        uploads.push(AttributeUpload {
            name: "position",
            item_size: 3,
            bytes: bytemuck::cast_slice(pool.positions_flat()),
        });
    }
    if dirty.opacity {
        uploads.push(AttributeUpload {
            name: "opacity",
            item_size: 1,
            bytes: bytemuck::cast_slice(pool.opacities()),
        });
    }
    if dirty.rotation {
        uploads.push(AttributeUpload {
            name: "rotation",
            item_size: 1,
            bytes: bytemuck::cast_slice(pool.rotations()),
        });
    }
    if dirty.size {
        uploads.push(AttributeUpload {
            name: "size",
            item_size: 1,
            bytes: bytemuck::cast_slice(pool.sizes()),
        });
    }
    tracing::trace!(count = uploads.len(), "attribute uploads collected");
    uploads
}

#[cfg(test)]
mod tests {
    use super::*;
    use rockfall_kernel::{EffectSettings, EmitterOptions, Rockfall};

    fn effect() -> Rockfall {
        Rockfall::new(
            EffectSettings {
                particle_count: 10,
                seed: Some(3),
                ..EffectSettings::default()
            },
            &EmitterOptions::default(),
        )
    }

    #[test]
    fn fresh_effect_uploads_everything() {
        let mut fx = effect();
        let dirty = fx.take_dirty();
        let uploads = attribute_uploads(fx.pool(), dirty);

        let names: Vec<&str> = uploads.iter().map(|u| u.name).collect();
        assert_eq!(names, ["position", "opacity", "rotation", "size"]);
        assert_eq!(uploads[0].bytes.len(), 10 * 3 * 4);
        assert_eq!(uploads[3].bytes.len(), 10 * 4);
    }

    #[test]
    fn step_uploads_skip_static_sizes() {
        let mut fx = effect();
        fx.take_dirty();
        fx.update(0.016);
        let uploads = attribute_uploads(fx.pool(), fx.dirty());

        assert_eq!(uploads.len(), 3);
        assert!(uploads.iter().all(|u| u.name != "size"));
    }

    #[test]
    fn clean_flags_upload_nothing() {
        let fx = effect();
        assert!(attribute_uploads(fx.pool(), DirtyBuffers::CLEAN).is_empty());
    }
}
