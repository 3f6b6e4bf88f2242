use glam::Vec3;
use rockfall_kernel::Rockfall;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(30.0, 0.0, 0.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads effect state and a view configuration, then produces
/// output. It never mutates the effect.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the given effect.
    fn render(&self, effect: &Rockfall, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of an effect's particles.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Particle rows printed per frame.
    pub max_rows: usize,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self { max_rows: 8 }
    }
}

impl DebugTextRenderer {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, effect: &Rockfall, view: &RenderView) -> String {
        let pool = effect.pool();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Rockfall [{}] (particles={}, alive={}, lifetime={:.2}s) ===\n",
            effect.id(),
            pool.len(),
            pool.alive_count(),
            effect.lifetime()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} point_scale={}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            effect.point_scale()
        ));
        if !effect.is_visible() {
            out.push_str("  (hidden)\n");
            return out;
        }

        for i in 0..pool.len().min(self.max_rows) {
            let p = pool.positions()[i];
            out.push_str(&format!(
                "  [{i:>5}] pos=({:.2}, {:.2}, {:.2}) age={:+.3} opacity={:.0} rot={:+.2} size={:.2}\n",
                p.x,
                p.y,
                p.z,
                pool.ages()[i],
                pool.opacities()[i],
                pool.rotations()[i],
                pool.sizes()[i]
            ));
        }
        if pool.len() > self.max_rows {
            out.push_str(&format!("  ... {} more\n", pool.len() - self.max_rows));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rockfall_kernel::{EffectSettings, EmitterOptions};

    fn effect(count: usize) -> Rockfall {
        Rockfall::new(
            EffectSettings {
                particle_count: count,
                seed: Some(11),
                ..EffectSettings::default()
            },
            &EmitterOptions::default(),
        )
    }

    #[test]
    fn debug_renderer_empty_effect() {
        let fx = effect(0);
        let output = DebugTextRenderer::default().render(&fx, &RenderView::default());

        assert!(output.contains("particles=0"));
        assert!(!output.contains("pos="));
    }

    #[test]
    fn debug_renderer_truncates_rows() {
        let fx = effect(20);
        let output = DebugTextRenderer::new(3).render(&fx, &RenderView::default());

        assert_eq!(output.matches("pos=").count(), 3);
        assert!(output.contains("... 17 more"));
    }

    #[test]
    fn one_line_per_row() {
        let fx = effect(20);
        let output = DebugTextRenderer::new(3).render(&fx, &RenderView::default());

        // header + camera + 3 rows + overflow line
        assert_eq!(output.lines().count(), 6);
        assert!(output.ends_with('\n'));
        assert!(output.lines().nth(2).unwrap().starts_with("  [    0] pos="));
    }

    #[test]
    fn hidden_effect_renders_header_only() {
        let mut fx = effect(5);
        fx.hide();
        let output = DebugTextRenderer::default().render(&fx, &RenderView::default());

        assert!(output.contains("(hidden)"));
        assert!(!output.contains("pos="));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert_eq!(view.target, Vec3::ZERO);
    }
}
